/// Mock GlDevice for unit tests (no GPU required)
///
/// Tracks every allocation, deletion, bind and attachment so tests can
/// assert exactly which handles survive a negotiation or a drop. Behavior
/// that varies by hardware (framebuffer completeness, compile failures,
/// variable locations) is scripted through public fields.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::device::{
    AttachmentPoint, BufferHandle, BufferTarget, DeviceErrorCode, FramebufferHandle,
    FramebufferStatus, GlDevice, ProgramHandle, RenderbufferFormat, RenderbufferHandle,
    ShaderHandle, ShaderStage, TextureHandle,
};

/// Error code the mock raises on an incomplete-status query when
/// `error_on_incomplete` is set (mirrors GL_INVALID_OPERATION)
pub const SPURIOUS_QUERY_ERROR: DeviceErrorCode = 0x0502;

/// Scriptable in-memory GlDevice
///
/// Handles are numbered from 1 across all categories, so every handle a test
/// observes is unique and nonzero.
#[derive(Debug, Default)]
pub struct MockGlDevice {
    next_handle: u32,

    // ===== LIVE HANDLE SETS =====
    pub live_framebuffers: FxHashSet<FramebufferHandle>,
    pub live_renderbuffers: FxHashSet<RenderbufferHandle>,
    pub live_shaders: FxHashSet<ShaderHandle>,
    pub live_programs: FxHashSet<ProgramHandle>,
    pub live_buffers: FxHashSet<BufferHandle>,

    // ===== CALL COUNTERS =====
    pub framebuffers_created: u32,
    pub framebuffers_deleted: u32,
    pub renderbuffers_created: u32,
    pub renderbuffers_deleted: u32,
    pub shaders_created: u32,
    pub shaders_deleted: u32,
    pub programs_created: u32,
    pub programs_deleted: u32,
    pub buffers_created: u32,
    pub buffers_deleted: u32,
    pub vertex_compiles: u32,
    pub fragment_compiles: u32,
    pub status_checks: u32,
    pub errors_polled: u32,

    // ===== SCRIPTED BEHAVIOR =====
    /// One entry per completeness query, front first; `Complete` once empty
    pub status_script: VecDeque<FramebufferStatus>,
    /// Fail every vertex-stage compile
    pub fail_vertex_compile: bool,
    /// Fail every fragment-stage compile
    pub fail_fragment_compile: bool,
    /// Record link attempts as failed (links still have no queryable status)
    pub fail_link: bool,
    /// Info log text reported for failed compiles
    pub info_log: String,
    /// Raise a spurious error on every incomplete-status query
    pub error_on_incomplete: bool,
    /// Pending error-slot value
    pub pending_error: Option<DeviceErrorCode>,

    // ===== RECORDED STATE =====
    pub bound_framebuffer: FramebufferHandle,
    pub bound_renderbuffer: RenderbufferHandle,
    pub bound_vertex_buffer: BufferHandle,
    pub bound_index_buffer: BufferHandle,
    /// (framebuffer, texture) per color attachment call
    pub color_attachments: Vec<(FramebufferHandle, TextureHandle)>,
    /// (framebuffer, point, renderbuffer) per depth/stencil attachment call
    pub renderbuffer_attachments: Vec<(FramebufferHandle, AttachmentPoint, RenderbufferHandle)>,
    /// (renderbuffer, format, width, height) per storage allocation
    pub storage_allocations: Vec<(RenderbufferHandle, RenderbufferFormat, u32, u32)>,
    /// (program, shader) per attach call
    pub attached_shaders: Vec<(ProgramHandle, ShaderHandle)>,
    /// Success flag per link attempt
    pub link_attempts: Vec<bool>,
    /// Every program made current, in order
    pub use_program_calls: Vec<ProgramHandle>,
    /// (target, byte length) per upload
    pub uploads: Vec<(BufferTarget, usize)>,
    /// Attribute locations enabled, in order
    pub enabled_attribs: Vec<u32>,
    /// Attribute locations disabled, in order
    pub disabled_attribs: Vec<u32>,
    /// (location, components) per attribute-pointer call
    pub attrib_pointers: Vec<(u32, u32)>,
    /// Fragment count supplied per shader object
    pub source_fragments: FxHashMap<ShaderHandle, usize>,

    // ===== VARIABLE LOCATIONS =====
    /// Uniform name → location table; unseeded names resolve to -1
    pub uniform_locations: FxHashMap<String, i32>,
    /// Attribute name → location table; unseeded names resolve to -1
    pub attribute_locations: FxHashMap<String, i32>,

    shader_stages: FxHashMap<ShaderHandle, ShaderStage>,
}

impl MockGlDevice {
    /// Create a new mock device with no scripted failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the location the device "assigned" a uniform name at link
    pub fn define_uniform_location(&mut self, name: &str, location: i32) {
        self.uniform_locations.insert(name.to_string(), location);
    }

    /// Seed the location the device "assigned" an attribute name at link
    pub fn define_attribute_location(&mut self, name: &str, location: i32) {
        self.attribute_locations.insert(name.to_string(), location);
    }

    /// Live renderbuffer handles in ascending order
    pub fn live_renderbuffers_sorted(&self) -> Vec<RenderbufferHandle> {
        let mut handles: Vec<_> = self.live_renderbuffers.iter().copied().collect();
        handles.sort_unstable();
        handles
    }

    fn alloc_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GlDevice for MockGlDevice {
    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> FramebufferHandle {
        let handle = self.alloc_handle();
        self.live_framebuffers.insert(handle);
        self.framebuffers_created += 1;
        handle
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.live_framebuffers.remove(&framebuffer);
        self.framebuffers_deleted += 1;
    }

    fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.bound_framebuffer = framebuffer;
    }

    fn attach_color_texture(&mut self, texture: TextureHandle) {
        self.color_attachments.push((self.bound_framebuffer, texture));
    }

    fn attach_renderbuffer(&mut self, point: AttachmentPoint, renderbuffer: RenderbufferHandle) {
        self.renderbuffer_attachments
            .push((self.bound_framebuffer, point, renderbuffer));
    }

    fn framebuffer_status(&mut self) -> FramebufferStatus {
        self.status_checks += 1;
        let status = self
            .status_script
            .pop_front()
            .unwrap_or(FramebufferStatus::Complete);
        if status != FramebufferStatus::Complete && self.error_on_incomplete {
            self.pending_error = Some(SPURIOUS_QUERY_ERROR);
        }
        status
    }

    // ===== RENDERBUFFERS =====

    fn create_renderbuffer(&mut self) -> RenderbufferHandle {
        let handle = self.alloc_handle();
        self.live_renderbuffers.insert(handle);
        self.renderbuffers_created += 1;
        handle
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        self.live_renderbuffers.remove(&renderbuffer);
        self.renderbuffers_deleted += 1;
    }

    fn bind_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        self.bound_renderbuffer = renderbuffer;
    }

    fn renderbuffer_storage(&mut self, format: RenderbufferFormat, width: u32, height: u32) {
        self.storage_allocations
            .push((self.bound_renderbuffer, format, width, height));
    }

    // ===== ERROR SLOT =====

    fn poll_error(&mut self) -> Option<DeviceErrorCode> {
        self.errors_polled += 1;
        self.pending_error.take()
    }

    // ===== SHADER STAGES =====

    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle {
        let handle = self.alloc_handle();
        self.live_shaders.insert(handle);
        self.shaders_created += 1;
        self.shader_stages.insert(handle, stage);
        handle
    }

    fn shader_source(&mut self, shader: ShaderHandle, fragments: &[&str]) {
        self.source_fragments.insert(shader, fragments.len());
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        match self.shader_stages.get(&shader) {
            Some(ShaderStage::Vertex) => self.vertex_compiles += 1,
            Some(ShaderStage::Fragment) => self.fragment_compiles += 1,
            None => {}
        }
    }

    fn compile_status(&self, shader: ShaderHandle) -> bool {
        match self.shader_stages.get(&shader) {
            Some(ShaderStage::Vertex) => !self.fail_vertex_compile,
            Some(ShaderStage::Fragment) => !self.fail_fragment_compile,
            None => false,
        }
    }

    fn shader_info_log(&self, _shader: ShaderHandle) -> String {
        self.info_log.clone()
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.live_shaders.remove(&shader);
        self.shaders_deleted += 1;
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self) -> ProgramHandle {
        let handle = self.alloc_handle();
        self.live_programs.insert(handle);
        self.programs_created += 1;
        handle
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        self.attached_shaders.push((program, shader));
    }

    fn link_program(&mut self, _program: ProgramHandle) {
        self.link_attempts.push(!self.fail_link);
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.live_programs.remove(&program);
        self.programs_deleted += 1;
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.use_program_calls.push(program);
    }

    fn uniform_location(&self, _program: ProgramHandle, name: &str) -> i32 {
        self.uniform_locations.get(name).copied().unwrap_or(-1)
    }

    fn attribute_location(&self, _program: ProgramHandle, name: &str) -> i32 {
        self.attribute_locations.get(name).copied().unwrap_or(-1)
    }

    // ===== BUFFERS =====

    fn create_buffer(&mut self) -> BufferHandle {
        let handle = self.alloc_handle();
        self.live_buffers.insert(handle);
        self.buffers_created += 1;
        handle
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.live_buffers.remove(&buffer);
        self.buffers_deleted += 1;
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle) {
        match target {
            BufferTarget::Vertex => self.bound_vertex_buffer = buffer,
            BufferTarget::Index => self.bound_index_buffer = buffer,
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        self.uploads.push((target, data.len()));
    }

    // ===== VERTEX ATTRIBUTES =====

    fn vertex_attrib_pointer(&mut self, location: u32, components: u32) {
        self.attrib_pointers.push((location, components));
    }

    fn enable_vertex_attrib(&mut self, location: u32) {
        self.enabled_attribs.push(location);
    }

    fn disable_vertex_attrib(&mut self, location: u32) {
        self.disabled_attribs.push(location);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
