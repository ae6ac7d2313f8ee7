//! Blitting intensities to the framebuffer
//!
//! There is no color mapping step at render time: an intensity byte IS the
//! palette index the device displays, so a blit is a full row-major copy of
//! the grid into the framebuffer. Partial or dirty-rectangle updates are
//! deliberately absent; the whole frame is rewritten every time.

use crate::buffer::FireBuffer;

/// Copy the buffer's intensities into the device framebuffer.
///
/// The framebuffer must be exactly `width * height` bytes, the layout
/// established by mode entry. That is a precondition, not a runtime check.
pub fn blit(buffer: &FireBuffer, framebuffer: &mut [u8]) {
    debug_assert_eq!(
        framebuffer.len(),
        buffer.width() * buffer.height(),
        "framebuffer size doesn't match grid dimensions"
    );
    framebuffer.copy_from_slice(buffer.cells());
}
