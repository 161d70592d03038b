/// Device module - the GL-style device API boundary

// Module declarations
pub mod gl_device;

// Re-export everything from gl_device.rs
pub use gl_device::*;

// Mock device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
