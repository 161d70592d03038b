/// Scoped activation protocol.
///
/// Rendering code binds a shader-like resource as the device's current
/// program for the duration of a lexical scope. The guard below owns the
/// whole protocol: activation and extra binding happen exactly once at
/// construction, cleanup happens exactly once on every exit path, including
/// early returns and propagating panics inside the scope.

use std::sync::Arc;

// ===== SHADER BIND CAPABILITY =====

/// Capability consumed by `ShaderScope`
///
/// Implemented by `ShaderProgram` and every geometry-specialized variant;
/// variants differ only in what `prepare`/`clear` do.
pub trait ShaderBind: Send + Sync {
    /// Make this resource the device's current program
    fn activate(&self);

    /// Resource-specific extra binding beyond activation (index buffers,
    /// attribute arrays, ...)
    fn prepare(&self);

    /// Undo whatever `prepare` claimed that the next activation will not
    /// implicitly replace
    fn clear(&self);
}

// ===== SCOPE GUARD =====

/// Binds a shader-like resource for the duration of a lexical scope
///
/// Construction activates the resource and runs `prepare`; dropping the
/// guard runs `clear`. The guard keeps a shared reference so the resource
/// cannot be destroyed while the scope is open.
///
/// The current program is exclusive process-wide device state: nesting two
/// scopes over the same resource category is undefined and callers must
/// not do it.
pub struct ShaderScope<T: ShaderBind + ?Sized> {
    shader: Arc<T>,
}

impl<T: ShaderBind + ?Sized> ShaderScope<T> {
    /// Open a scope over `shader`: activate it, then prepare it
    pub fn new(shader: &Arc<T>) -> Self {
        shader.activate();
        shader.prepare();
        Self {
            shader: Arc::clone(shader),
        }
    }

    /// The scoped resource
    pub fn shader(&self) -> &T {
        &self.shader
    }
}

impl<T: ShaderBind + ?Sized> Drop for ShaderScope<T> {
    fn drop(&mut self) {
        self.shader.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
