/*!
# Nebula GL

Off-screen render targets and compiled shader programs over a GL-style
device boundary.

The device API is consumed through the `GlDevice` trait (similar to a thin
C binding layer) so the same resource code runs against a real context or a
simulated device in tests. Two resource wrappers sit on top of it:

- **RenderTarget**: a framebuffer bound to a caller-owned color texture.
  Attachment format support varies by hardware, so construction negotiates
  the richest depth/stencil configuration the device will accept.
- **ShaderProgram**: a compiled and linked vertex+fragment program with a
  table mapping logical slot indices to device variable locations.

A scoped activation guard (`ShaderScope`) binds any shader-like resource as
current for a lexical scope and restores claimed device state on every exit
path. Quad-geometry shader variants are built by composing prepare/clear
components over a plain program.
*/

// Internal modules
mod error;
pub mod log;
pub mod device;
pub mod target;
pub mod shader;

// Main nebulagl namespace module
pub mod nebulagl {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: render_* macros are NOT re-exported here - they are internal only
    }

    // Device boundary sub-module
    pub mod device {
        pub use crate::device::*;
    }

    // Render target sub-module
    pub mod target {
        pub use crate::target::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export math library at crate root
pub use glam;
