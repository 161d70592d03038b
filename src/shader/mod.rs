/// Shader module - compiled programs, scoped activation, quad variants

// Module declarations
pub mod program;
pub mod scope;
pub mod quad;

// Re-export everything from program.rs
pub use program::*;

// Re-export from other modules
pub use scope::*;
pub use quad::*;
