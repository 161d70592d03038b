/// Off-screen render target with depth/stencil capability negotiation.
///
/// A RenderTarget wraps a device framebuffer bound to a caller-owned 2D
/// color texture. Which depth/stencil attachment combinations a device
/// accepts is not known up front, so construction walks a fixed ladder of
/// configurations, richest first, and keeps the first one the device
/// reports complete. A target that exhausts the ladder is permanently
/// invalid and holds no device handles.

use std::sync::{Arc, Mutex};

use bitflags::bitflags;

use crate::device::{
    check_device_error, AttachmentPoint, FramebufferHandle, FramebufferStatus, GlDevice,
    RenderbufferFormat, RenderbufferHandle, TextureHandle, NULL_HANDLE,
};
use crate::error::Error;
use crate::{render_debug, render_error, render_info};

bitflags! {
    /// Depth/stencil attachments requested by one negotiation attempt
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct AttachmentFlags: u32 {
        const DEPTH_STENCIL = 0x1;
        const DEPTH = 0x2;
        const STENCIL = 0x4;
    }
}

/// Fallback ladder, richest configuration first
const TRY_FLAGS: [AttachmentFlags; 5] = [
    AttachmentFlags::DEPTH_STENCIL,
    AttachmentFlags::DEPTH.union(AttachmentFlags::STENCIL),
    AttachmentFlags::DEPTH,
    AttachmentFlags::STENCIL,
    AttachmentFlags::empty(),
];

// ===== RENDER TARGET =====

/// Framebuffer with negotiated depth/stencil attachments
///
/// Construction runs negotiation synchronously; check `is_valid()` before
/// handing `fbo()` to rendering code. Dimensions are immutable; a resize
/// means constructing a new RenderTarget.
pub struct RenderTarget {
    device: Arc<Mutex<dyn GlDevice>>,
    fbo: FramebufferHandle,
    renderbuffers: Vec<RenderbufferHandle>,
    width: u32,
    height: u32,
    valid: bool,
    last_error: Option<Error>,
}

impl RenderTarget {
    /// Create a render target over a caller-owned color texture.
    ///
    /// The color texture stays owned by the caller; the target owns the
    /// framebuffer and any renderbuffers the winning configuration needed.
    ///
    /// # Arguments
    ///
    /// * `device` - Device context the target allocates through
    /// * `color_texture` - Pre-existing 2D color texture handle
    /// * `width` - Target width in pixels
    /// * `height` - Target height in pixels
    pub fn new(
        device: Arc<Mutex<dyn GlDevice>>,
        color_texture: TextureHandle,
        width: u32,
        height: u32,
    ) -> Self {
        let mut target = Self {
            device,
            fbo: NULL_HANDLE,
            renderbuffers: Vec::new(),
            width,
            height,
            valid: true,
            last_error: None,
        };
        target.negotiate(color_texture);
        target
    }

    /// Walk the fallback ladder until the device reports complete
    fn negotiate(&mut self, color_texture: TextureHandle) {
        let device = Arc::clone(&self.device);
        let mut device = device.lock().unwrap();

        check_device_error(&mut *device, "RenderTarget negotiation (enter)");

        let mut status = FramebufferStatus::Unknown(0);
        for (attempt, &flags) in TRY_FLAGS.iter().enumerate() {
            render_debug!(
                "nebulagl::RenderTarget",
                "framebuffer generate attempt {}",
                attempt + 1
            );
            status = self.generate(&mut *device, color_texture, flags);
            if status == FramebufferStatus::Complete {
                render_info!(
                    "nebulagl::RenderTarget",
                    "framebuffer complete with {:?} ({} renderbuffer(s))",
                    flags,
                    self.renderbuffers.len()
                );
                break;
            }
        }

        if status != FramebufferStatus::Complete {
            self.valid = false;
            render_error!(
                "nebulagl::RenderTarget",
                "framebuffer negotiation failed: {}",
                status
            );
            self.last_error = Some(Error::FramebufferIncomplete(status));
        }

        check_device_error(&mut *device, "RenderTarget negotiation (exit)");
    }

    /// One full allocate-attach-query cycle for a single configuration.
    ///
    /// On an incomplete report every handle the attempt created is
    /// discarded; nothing carries over into the next attempt.
    fn generate(
        &mut self,
        device: &mut dyn GlDevice,
        color_texture: TextureHandle,
        flags: AttachmentFlags,
    ) -> FramebufferStatus {
        self.fbo = device.create_framebuffer();
        device.bind_framebuffer(self.fbo);
        device.attach_color_texture(color_texture);

        if flags.contains(AttachmentFlags::DEPTH_STENCIL) {
            let rb = device.create_renderbuffer();
            device.bind_renderbuffer(rb);
            device.renderbuffer_storage(RenderbufferFormat::DepthStencil, self.width, self.height);
            device.bind_renderbuffer(NULL_HANDLE);
            device.attach_renderbuffer(AttachmentPoint::Stencil, rb);
            device.attach_renderbuffer(AttachmentPoint::Depth, rb);
            self.renderbuffers.push(rb);
        } else {
            if flags.contains(AttachmentFlags::DEPTH) {
                debug_assert!(self.renderbuffers.is_empty());
                let rb = device.create_renderbuffer();
                device.bind_renderbuffer(rb);
                device.renderbuffer_storage(RenderbufferFormat::Depth16, self.width, self.height);
                device.attach_renderbuffer(AttachmentPoint::Depth, rb);
                self.renderbuffers.push(rb);
            }
            if flags.contains(AttachmentFlags::STENCIL) {
                let rb = device.create_renderbuffer();
                device.bind_renderbuffer(rb);
                device.renderbuffer_storage(RenderbufferFormat::Stencil8, self.width, self.height);
                device.bind_renderbuffer(NULL_HANDLE);
                device.attach_renderbuffer(AttachmentPoint::Stencil, rb);
                self.renderbuffers.push(rb);
            }
        }

        let status = device.framebuffer_status();
        if status != FramebufferStatus::Complete {
            // some drivers raise a spurious error on an incomplete-status
            // query; drain it before it leaks into later calls
            device.poll_error();

            device.bind_framebuffer(NULL_HANDLE);
            device.delete_framebuffer(self.fbo);
            for &rb in &self.renderbuffers {
                device.delete_renderbuffer(rb);
            }
            self.fbo = NULL_HANDLE;
            self.renderbuffers.clear();
        }
        status
    }

    // ===== ACCESSORS =====

    /// Whether negotiation produced a complete framebuffer
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Raw framebuffer handle for interop (`NULL_HANDLE` if invalid)
    pub fn fbo(&self) -> FramebufferHandle {
        self.fbo
    }

    /// Target width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Renderbuffers owned by the winning configuration (0, 1 or 2 entries)
    pub fn renderbuffers(&self) -> &[RenderbufferHandle] {
        &self.renderbuffers
    }

    /// Why negotiation failed, if it did
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }
}

impl Drop for RenderTarget {
    fn drop(&mut self) {
        if !self.valid {
            return;
        }

        let mut device = self.device.lock().unwrap();
        device.delete_framebuffer(self.fbo);
        for &rb in &self.renderbuffers {
            device.delete_renderbuffer(rb);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "render_target_tests.rs"]
mod tests;
