/// GlDevice trait - the external device API boundary
///
/// Every call is a direct, blocking operation against a single-threaded-
/// affine graphics context. Fallibility is communicated through status
/// values (`FramebufferStatus`, compile status, the error slot), never
/// through panics or results crossing this boundary.

use std::fmt;

use crate::render_error;

// ============================================================================
// Handles
// ============================================================================

/// Opaque framebuffer identifier (0 = null)
pub type FramebufferHandle = u32;
/// Opaque renderbuffer identifier (0 = null)
pub type RenderbufferHandle = u32;
/// Opaque 2D texture identifier, owned by the caller (0 = null)
pub type TextureHandle = u32;
/// Opaque shader-stage object identifier (0 = null)
pub type ShaderHandle = u32;
/// Opaque linked-program identifier (0 = null)
pub type ProgramHandle = u32;
/// Opaque buffer identifier (0 = null)
pub type BufferHandle = u32;
/// Raw device error code drained from the error slot
pub type DeviceErrorCode = u32;

/// The null handle for every resource category
pub const NULL_HANDLE: u32 = 0;

// ============================================================================
// Enums
// ============================================================================

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

/// Depth/stencil attachment point of the bound framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentPoint {
    Depth,
    Stencil,
}

/// Storage format requested for a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderbufferFormat {
    /// Combined depth+stencil storage
    DepthStencil,
    /// 16-bit depth component
    Depth16,
    /// 8-bit stencil index
    Stencil8,
}

/// Buffer binding target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attribute data
    Vertex,
    /// Index (element) data
    Index,
}

/// Completeness status reported for the bound framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    /// The attachment combination is usable
    Complete,
    /// An attachment is present but unusable
    IncompleteAttachment,
    /// No attachment where one is required
    MissingAttachment,
    /// The combination of attachments is not supported by the device
    Unsupported,
    /// A status code this crate does not classify
    Unknown(u32),
}

impl fmt::Display for FramebufferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferStatus::Complete => write!(f, "Complete"),
            FramebufferStatus::IncompleteAttachment => write!(f, "Incomplete attachment"),
            FramebufferStatus::MissingAttachment => write!(f, "Missing attachment"),
            FramebufferStatus::Unsupported => write!(f, "Unsupported framebuffer"),
            FramebufferStatus::Unknown(code) => write!(f, "Unknown status 0x{:x}", code),
        }
    }
}

// ============================================================================
// GlDevice trait
// ============================================================================

/// GL-style device API
///
/// Implemented by context bindings (and by `MockGlDevice` in tests). Resource
/// wrappers hold the device as an explicit `Arc<Mutex<dyn GlDevice>>` context
/// object; there is no ambient global device.
///
/// Handles returned here are raw and exclusively owned by whoever allocated
/// them until deleted or explicitly transferred.
pub trait GlDevice: Send {
    // ===== FRAMEBUFFERS =====

    /// Allocate a framebuffer object
    fn create_framebuffer(&mut self) -> FramebufferHandle;

    /// Release a framebuffer object
    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle);

    /// Make `framebuffer` the current framebuffer (`NULL_HANDLE` restores
    /// the default target)
    fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle);

    /// Attach a 2D color texture to the current framebuffer's color point
    fn attach_color_texture(&mut self, texture: TextureHandle);

    /// Attach a renderbuffer to a depth/stencil point of the current
    /// framebuffer
    fn attach_renderbuffer(&mut self, point: AttachmentPoint, renderbuffer: RenderbufferHandle);

    /// Query the completeness status of the current framebuffer
    fn framebuffer_status(&mut self) -> FramebufferStatus;

    // ===== RENDERBUFFERS =====

    /// Allocate a renderbuffer object
    fn create_renderbuffer(&mut self) -> RenderbufferHandle;

    /// Release a renderbuffer object
    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle);

    /// Make `renderbuffer` the current renderbuffer
    fn bind_renderbuffer(&mut self, renderbuffer: RenderbufferHandle);

    /// Allocate storage for the current renderbuffer
    fn renderbuffer_storage(&mut self, format: RenderbufferFormat, width: u32, height: u32);

    // ===== ERROR SLOT =====

    /// Drain the device's sticky error slot
    ///
    /// Returns the pending error code, clearing it, or `None` when no error
    /// is pending.
    fn poll_error(&mut self) -> Option<DeviceErrorCode>;

    // ===== SHADER STAGES =====

    /// Allocate a shader-stage object
    fn create_shader(&mut self, stage: ShaderStage) -> ShaderHandle;

    /// Supply the ordered source fragments of a shader-stage object
    fn shader_source(&mut self, shader: ShaderHandle, fragments: &[&str]);

    /// Compile a shader-stage object
    fn compile_shader(&mut self, shader: ShaderHandle);

    /// Whether the last compile of `shader` succeeded
    fn compile_status(&self, shader: ShaderHandle) -> bool;

    /// Diagnostic text produced by the last compile of `shader`
    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    /// Release a shader-stage object
    fn delete_shader(&mut self, shader: ShaderHandle);

    // ===== PROGRAMS =====

    /// Allocate a program object
    fn create_program(&mut self) -> ProgramHandle;

    /// Attach a compiled shader-stage object to a program
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);

    /// Link the attached stages of a program
    fn link_program(&mut self, program: ProgramHandle);

    /// Release a program object
    fn delete_program(&mut self, program: ProgramHandle);

    /// Make `program` the current program (`NULL_HANDLE` unbinds)
    fn use_program(&mut self, program: ProgramHandle);

    /// Resolve a uniform name to its device-assigned location (negative when
    /// unknown)
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32;

    /// Resolve an attribute name to its device-assigned location (negative
    /// when unknown)
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> i32;

    // ===== BUFFERS =====

    /// Allocate a buffer object
    fn create_buffer(&mut self) -> BufferHandle;

    /// Release a buffer object
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Bind a buffer to a target (`NULL_HANDLE` unbinds)
    fn bind_buffer(&mut self, target: BufferTarget, buffer: BufferHandle);

    /// Upload data to the buffer bound at `target`
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);

    // ===== VERTEX ATTRIBUTES =====

    /// Describe the float components fed to an attribute location from the
    /// bound vertex buffer
    fn vertex_attrib_pointer(&mut self, location: u32, components: u32);

    /// Enable an attribute array
    fn enable_vertex_attrib(&mut self, location: u32);

    /// Disable an attribute array
    fn disable_vertex_attrib(&mut self, location: u32);
}

// ============================================================================
// Unexpected-error tier
// ============================================================================

/// Drain the error slot; abort on an unexpected device error.
///
/// An error pending outside the sanctioned incomplete-framebuffer discard
/// path indicates a setup defect (wrong context, mismatched handle, API
/// misuse), not a runtime condition to recover from.
pub fn check_device_error(device: &mut dyn GlDevice, site: &str) {
    if let Some(code) = device.poll_error() {
        render_error!(
            "nebulagl::device",
            "unexpected device error 0x{:x} at {}",
            code,
            site
        );
        std::process::abort();
    }
}
