//! Error types for the Nebula GL core
//!
//! Failures of the two resource wrappers are communicated through validity
//! state (see `RenderTarget` and `ShaderProgram`); the variants here classify
//! those failures for callers that need more than a boolean, and carry the
//! checked-precondition errors returned by the shader variant constructors.

use std::fmt;

use crate::device::{FramebufferStatus, ShaderStage};

/// Result type for Nebula GL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nebula GL errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A shader stage failed to compile; carries the device info log
    CompileFailed {
        /// Stage that failed
        stage: ShaderStage,
        /// Diagnostic text produced by the device
        log: String,
    },

    /// Framebuffer negotiation exhausted every attachment configuration;
    /// carries the terminal completeness status
    FramebufferIncomplete(FramebufferStatus),

    /// Invalid resource usage (building a variant over an invalid program, etc.)
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CompileFailed { stage, log } => {
                write!(f, "{:?} shader failed to compile: {}", stage, log)
            }
            Error::FramebufferIncomplete(status) => {
                write!(f, "Framebuffer incomplete: {}", status)
            }
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
