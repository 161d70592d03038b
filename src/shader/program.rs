/// Compiled and linked GPU program with a logical variable-slot table.
///
/// A ShaderProgram is built from one or more source fragments per stage.
/// Compilation is vertex-then-fragment and fail-fast: once the vertex unit
/// cannot compile there is nothing a fragment unit could link against, so
/// the fragment stage is skipped entirely. Link status is not re-queried
/// after a successful pair of compiles; a link failure surfaces later as a
/// zero-behavior program.
///
/// The slot table maps small logical indices chosen by the caller to raw
/// device variable locations, so rendering code can address uniforms and
/// attributes by stable index instead of by name every frame.

use std::sync::{Arc, Mutex};

use crate::device::{GlDevice, ProgramHandle, ShaderHandle, ShaderStage, NULL_HANDLE};
use crate::error::Error;
use crate::render_error;
use crate::shader::ShaderBind;

/// Location stored for slots the table grew over but never bound
const UNSET_LOCATION: i32 = -1;

// ===== SHADER PROGRAM =====

/// Linked vertex+fragment program with a slot→location table
///
/// Check `is_valid()` before use; on a stage-compile failure the object is
/// permanently invalid, holds no program handle, and `last_error()` carries
/// the device diagnostic text.
pub struct ShaderProgram {
    device: Arc<Mutex<dyn GlDevice>>,
    program: ProgramHandle,
    variables: Vec<i32>,
    valid: bool,
    last_error: Option<Error>,
}

impl ShaderProgram {
    /// Build a program from ordered source fragments per stage.
    ///
    /// Each stage's fragments are compiled as a single concatenated unit.
    ///
    /// # Arguments
    ///
    /// * `device` - Device context the program compiles through
    /// * `vertex` - Vertex-stage source fragments, in order
    /// * `fragment` - Fragment-stage source fragments, in order
    pub fn new(device: Arc<Mutex<dyn GlDevice>>, vertex: &[&str], fragment: &[&str]) -> Self {
        let mut program = Self {
            device,
            program: NULL_HANDLE,
            variables: Vec::new(),
            valid: false,
            last_error: None,
        };
        program.init(vertex, fragment);
        program
    }

    /// Build a program from one source fragment per stage
    pub fn from_sources(device: Arc<Mutex<dyn GlDevice>>, vertex: &str, fragment: &str) -> Self {
        Self::new(device, &[vertex], &[fragment])
    }

    fn init(&mut self, vertex: &[&str], fragment: &[&str]) {
        let device = Arc::clone(&self.device);
        let mut device = device.lock().unwrap();

        let v = match self.compile(&mut *device, ShaderStage::Vertex, vertex) {
            Some(shader) => shader,
            // fragment stage skipped entirely: nothing could link anyway
            None => return,
        };
        let f = match self.compile(&mut *device, ShaderStage::Fragment, fragment) {
            Some(shader) => shader,
            None => {
                device.delete_shader(v);
                return;
            }
        };

        self.program = device.create_program();
        device.attach_shader(self.program, v);
        device.attach_shader(self.program, f);

        device.link_program(self.program);

        // a linked program retains what it needs from its stage objects
        device.delete_shader(v);
        device.delete_shader(f);

        self.valid = true;
    }

    /// Compile one stage; `None` marks the program invalid with the device
    /// diagnostic recorded
    fn compile(
        &mut self,
        device: &mut dyn GlDevice,
        stage: ShaderStage,
        fragments: &[&str],
    ) -> Option<ShaderHandle> {
        let shader = device.create_shader(stage);
        device.shader_source(shader, fragments);
        device.compile_shader(shader);

        if !device.compile_status(shader) {
            let log = device.shader_info_log(shader);
            render_error!(
                "nebulagl::ShaderProgram",
                "{:?} shader failed to compile: {}",
                stage,
                log
            );
            device.delete_shader(shader);
            self.last_error = Some(Error::CompileFailed { stage, log });
            return None;
        }
        Some(shader)
    }

    // ===== VARIABLE SLOT TABLE =====

    /// Record a raw device location at a logical slot index.
    ///
    /// Grows the table to cover `slot` if needed; the table never shrinks,
    /// and redefining a slot overwrites it (last write wins).
    pub fn define_variable(&mut self, slot: usize, location: i32) {
        if self.variables.len() <= slot {
            self.variables.resize(slot + 1, UNSET_LOCATION);
        }
        self.variables[slot] = location;
    }

    /// Resolve a uniform name through the device and record it at `slot`.
    ///
    /// An unknown name stores the device's negative location verbatim;
    /// detecting that is the caller's responsibility.
    pub fn define_uniform(&mut self, slot: usize, name: &str) {
        let location = self.device.lock().unwrap().uniform_location(self.program, name);
        self.define_variable(slot, location);
    }

    /// Resolve an attribute name through the device and record it at `slot`.
    pub fn define_attribute(&mut self, slot: usize, name: &str) {
        let location = self
            .device
            .lock()
            .unwrap()
            .attribute_location(self.program, name);
        self.define_variable(slot, location);
    }

    /// Location previously stored at `slot`.
    ///
    /// Asking for a slot the table never grew to is a caller error.
    pub fn variable(&self, slot: usize) -> i32 {
        assert!(
            slot < self.variables.len(),
            "undefined shader variable slot {}",
            slot
        );
        self.variables[slot]
    }

    // ===== ACCESSORS =====

    /// Whether both stages compiled and linking was attempted
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Raw program handle for interop (`NULL_HANDLE` if invalid or taken)
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Why construction failed, if it did
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Get the device reference (needed by variants for buffer creation)
    pub fn device(&self) -> &Arc<Mutex<dyn GlDevice>> {
        &self.device
    }

    // ===== OWNERSHIP TRANSFER =====

    /// Move the program handle out, transferring exclusive ownership.
    ///
    /// The wrapper is left empty and invalid, so its own destruction
    /// releases nothing; the caller now owns the handle's lifetime.
    pub fn take_program(&mut self) -> ProgramHandle {
        let program = self.program;
        self.program = NULL_HANDLE;
        self.valid = false;
        program
    }
}

impl ShaderBind for ShaderProgram {
    fn activate(&self) {
        self.device.lock().unwrap().use_program(self.program);
    }

    // a plain program claims nothing beyond being current
    fn prepare(&self) {}

    fn clear(&self) {}
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.valid {
            self.device.lock().unwrap().delete_program(self.program);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
