//! Shared VRAM atlas and alpha compositing.
//!
//! The console's video memory is a single 1024x512 framebuffer of 16-bit
//! units, addressed by the mesh format as 32 texture pages laid out 16
//! wide and 2 tall. In 4-bit mode each stored unit holds 4 logical
//! pixels, so the atlas this crate exposes is 4096x512 RGBA pixels and
//! each page covers 256x256 of them.
//!
//! The atlas is an explicit object: every texture is composited into it
//! by a caller-ordered [`VramAtlas::composite`] call, and later calls
//! blend over earlier ones at their declared placements. There is no
//! conflict detection.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::error::{Result, TimError};
use crate::texture::TimTexture;

/// Width of one texture page in 16-bit framebuffer units
pub const PAGE_WIDTH_UNITS: u32 = 64;
/// Height of one texture page in rows
pub const PAGE_HEIGHT: u32 = 256;
/// Width of one texture page in 4-bit-mode atlas pixels
pub const PAGE_WIDTH_PIXELS: u32 = PAGE_WIDTH_UNITS * 4;
/// Pages per atlas row
pub const ATLAS_PAGES_X: u32 = 16;
/// Page rows in the atlas
pub const ATLAS_PAGES_Y: u32 = 2;
/// Total page count
pub const PAGE_COUNT: u32 = ATLAS_PAGES_X * ATLAS_PAGES_Y;
/// Atlas width in pixels
pub const ATLAS_WIDTH: u32 = PAGE_WIDTH_PIXELS * ATLAS_PAGES_X;
/// Atlas height in pixels
pub const ATLAS_HEIGHT: u32 = PAGE_HEIGHT * ATLAS_PAGES_Y;

/// Atlas-pixel X offset of a texture page (pages tile 16 wide, 2 tall)
pub fn page_x(page: u32) -> u32 {
    (page * PAGE_WIDTH_PIXELS) % ATLAS_WIDTH
}

/// Atlas-pixel Y offset of a texture page
pub fn page_y(page: u32) -> u32 {
    if page >= ATLAS_PAGES_X { PAGE_HEIGHT } else { 0 }
}

/// The shared atlas all texture pages are composited into.
///
/// Starts fully transparent black. Composites are applied in the order
/// the caller issues them; determinism is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct VramAtlas {
    image: RgbaImage,
}

impl VramAtlas {
    /// Create an empty, fully transparent atlas
    pub fn new() -> Self {
        Self {
            image: RgbaImage::new(ATLAS_WIDTH, ATLAS_HEIGHT),
        }
    }

    /// Borrow the composited pixels
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consume the atlas and return the composited pixels
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Decode a texture's first palette and composite it at the
    /// placement declared in its pixel section header.
    ///
    /// Fully opaque source pixels overwrite the destination, fully
    /// transparent ones leave it untouched, and anything in between
    /// blends channel-wise with `dst = (src*a + dst*(255-a)) / 255`,
    /// keeping the larger of the two alphas.
    pub fn composite(&mut self, texture: &TimTexture) -> Result<()> {
        let decoded = texture.decode_rgba(0)?;

        // Framebuffer X is in 16-bit units; 4 logical pixels each.
        let dst_x = u32::from(texture.pixels.fb_x) * 4;
        let dst_y = u32::from(texture.pixels.fb_y);

        if dst_x + decoded.width() > ATLAS_WIDTH || dst_y + decoded.height() > ATLAS_HEIGHT {
            return Err(TimError::PlacementOutOfRange {
                x: dst_x,
                y: dst_y,
                width: decoded.width(),
                height: decoded.height(),
                atlas_width: ATLAS_WIDTH,
                atlas_height: ATLAS_HEIGHT,
            });
        }

        debug!(
            "compositing {}x{} texture at atlas ({dst_x}, {dst_y})",
            decoded.width(),
            decoded.height()
        );

        for (x, y, src) in decoded.enumerate_pixels() {
            blend_over(self.image.get_pixel_mut(dst_x + x, dst_y + y), *src);
        }

        Ok(())
    }
}

impl Default for VramAtlas {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard alpha compositing of one source pixel over a destination
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let alpha = u32::from(src[3]);
    if alpha == 255 {
        *dst = src;
    } else if alpha > 0 {
        for channel in 0..3 {
            let blended =
                (u32::from(src[channel]) * alpha + u32::from(dst[channel]) * (255 - alpha)) / 255;
            dst[channel] = blended as u8;
        }
        dst[3] = dst[3].max(src[3]);
    }
}
