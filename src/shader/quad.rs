/// Geometry-specialized shader variants.
///
/// Render-to-texture passes draw a fixed screen quad, optionally with a
/// texture-coordinate stream. Instead of subclassing the program, a variant
/// is composed: a `QuadShader` owns a compiled `ShaderProgram` plus an
/// ordered list of `ScopeBinding` components, each contributing its own
/// prepare/clear pair. The same `ShaderScope` drives every variant.

use std::sync::{Arc, Mutex};

use glam::Vec2;

use crate::device::{BufferHandle, BufferTarget, GlDevice, NULL_HANDLE};
use crate::error::Result;
use crate::render_bail;
use crate::shader::{ShaderBind, ShaderProgram};

/// Unit quad in clip space, drawn as two triangles
const QUAD_POSITIONS: [Vec2; 4] = [
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 1.0),
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

const QUAD_TEXCOORDS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
];

// ===== SCOPE BINDING CAPABILITY =====

/// One attachable prepare/clear component of a shader variant
pub trait ScopeBinding: Send + Sync {
    /// Claim device state for the scope (buffer binds, attribute arrays)
    fn prepare(&self, device: &mut dyn GlDevice);

    /// Release what `prepare` claimed
    fn clear(&self, device: &mut dyn GlDevice);
}

// ===== QUAD GEOMETRY =====

/// Fixed quad vertex/index buffer pair feeding a position attribute
pub struct QuadGeometry {
    device: Arc<Mutex<dyn GlDevice>>,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    position_location: u32,
}

impl QuadGeometry {
    /// Upload the quad once; the buffers live until the component drops
    pub fn new(device: Arc<Mutex<dyn GlDevice>>, position_location: u32) -> Self {
        let (vertex_buffer, index_buffer) = {
            let mut dev = device.lock().unwrap();

            let vertex_buffer = dev.create_buffer();
            dev.bind_buffer(BufferTarget::Vertex, vertex_buffer);
            dev.buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(QUAD_POSITIONS.as_slice()));

            let index_buffer = dev.create_buffer();
            dev.bind_buffer(BufferTarget::Index, index_buffer);
            dev.buffer_data(BufferTarget::Index, bytemuck::cast_slice(QUAD_INDICES.as_slice()));

            dev.bind_buffer(BufferTarget::Vertex, NULL_HANDLE);
            dev.bind_buffer(BufferTarget::Index, NULL_HANDLE);

            (vertex_buffer, index_buffer)
        };

        Self {
            device,
            vertex_buffer,
            index_buffer,
            position_location,
        }
    }
}

impl ScopeBinding for QuadGeometry {
    fn prepare(&self, device: &mut dyn GlDevice) {
        device.bind_buffer(BufferTarget::Vertex, self.vertex_buffer);
        device.bind_buffer(BufferTarget::Index, self.index_buffer);
        device.vertex_attrib_pointer(self.position_location, 2);
        device.enable_vertex_attrib(self.position_location);
    }

    fn clear(&self, device: &mut dyn GlDevice) {
        device.disable_vertex_attrib(self.position_location);
        device.bind_buffer(BufferTarget::Index, NULL_HANDLE);
        device.bind_buffer(BufferTarget::Vertex, NULL_HANDLE);
    }
}

impl Drop for QuadGeometry {
    fn drop(&mut self) {
        let mut device = self.device.lock().unwrap();
        device.delete_buffer(self.vertex_buffer);
        device.delete_buffer(self.index_buffer);
    }
}

// ===== QUAD TEXTURE COORDINATES =====

/// Fixed texture-coordinate buffer feeding a texcoord attribute
pub struct QuadTexCoords {
    device: Arc<Mutex<dyn GlDevice>>,
    texcoord_buffer: BufferHandle,
    texcoord_location: u32,
}

impl QuadTexCoords {
    pub fn new(device: Arc<Mutex<dyn GlDevice>>, texcoord_location: u32) -> Self {
        let texcoord_buffer = {
            let mut dev = device.lock().unwrap();

            let texcoord_buffer = dev.create_buffer();
            dev.bind_buffer(BufferTarget::Vertex, texcoord_buffer);
            dev.buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(QUAD_TEXCOORDS.as_slice()));
            dev.bind_buffer(BufferTarget::Vertex, NULL_HANDLE);

            texcoord_buffer
        };

        Self {
            device,
            texcoord_buffer,
            texcoord_location,
        }
    }
}

impl ScopeBinding for QuadTexCoords {
    fn prepare(&self, device: &mut dyn GlDevice) {
        device.bind_buffer(BufferTarget::Vertex, self.texcoord_buffer);
        device.vertex_attrib_pointer(self.texcoord_location, 2);
        device.enable_vertex_attrib(self.texcoord_location);
    }

    fn clear(&self, device: &mut dyn GlDevice) {
        device.disable_vertex_attrib(self.texcoord_location);
        device.bind_buffer(BufferTarget::Vertex, NULL_HANDLE);
    }
}

impl Drop for QuadTexCoords {
    fn drop(&mut self) {
        self.device.lock().unwrap().delete_buffer(self.texcoord_buffer);
    }
}

// ===== QUAD SHADER VARIANT =====

/// A compiled program plus its attached prepare/clear components
///
/// Components prepare in attachment order and clear in reverse, so a
/// texcoord stream layered over the quad geometry unwinds before it.
pub struct QuadShader {
    program: ShaderProgram,
    bindings: Vec<Box<dyn ScopeBinding>>,
}

impl QuadShader {
    /// Layer quad geometry over a valid program.
    ///
    /// # Arguments
    ///
    /// * `program` - A valid compiled program; ownership moves in
    /// * `position_location` - Attribute location fed by the quad positions
    ///
    /// # Errors
    ///
    /// Returns an error if `program` is invalid.
    pub fn new(program: ShaderProgram, position_location: u32) -> Result<Self> {
        if !program.is_valid() {
            render_bail!(
                "nebulagl::QuadShader",
                "cannot build a quad variant over an invalid program"
            );
        }

        let geometry = QuadGeometry::new(Arc::clone(program.device()), position_location);

        Ok(Self {
            program,
            bindings: vec![Box::new(geometry)],
        })
    }

    /// Layer quad geometry and a texture-coordinate stream over a valid
    /// program.
    ///
    /// # Errors
    ///
    /// Returns an error if `program` is invalid.
    pub fn textured(
        program: ShaderProgram,
        position_location: u32,
        texcoord_location: u32,
    ) -> Result<Self> {
        let mut shader = Self::new(program, position_location)?;
        let texcoords = QuadTexCoords::new(Arc::clone(shader.program.device()), texcoord_location);
        shader.bindings.push(Box::new(texcoords));
        Ok(shader)
    }

    // ===== ACCESSORS =====

    /// The underlying compiled program
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Mutable access for slot definitions after construction
    pub fn program_mut(&mut self) -> &mut ShaderProgram {
        &mut self.program
    }
}

impl ShaderBind for QuadShader {
    fn activate(&self) {
        self.program.activate();
    }

    fn prepare(&self) {
        let mut device = self.program.device().lock().unwrap();
        for binding in &self.bindings {
            binding.prepare(&mut *device);
        }
    }

    fn clear(&self) {
        let mut device = self.program.device().lock().unwrap();
        for binding in self.bindings.iter().rev() {
            binding.clear(&mut *device);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "quad_tests.rs"]
mod tests;
