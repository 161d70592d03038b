/// Target module - off-screen render targets

// Module declarations
pub mod render_target;

// Re-export everything from render_target.rs
pub use render_target::*;
