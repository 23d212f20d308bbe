//! TIM file parsing and indexed-pixel decoding.
//!
//! A TIM file is a small header followed by two length-prefixed sections:
//! a colour lookup table (CLUT) of 15-bit colour entries and a block of
//! packed palette indices. In 4-bit mode every stored 16-bit framebuffer
//! unit holds four logical pixels, two indices per byte with the low
//! nibble first.

use image::RgbaImage;
use psx_data::{ByteRead, Cursor};

use crate::error::{Result, TimError};

/// Magic byte every TIM file starts with
pub const TIM_MAGIC: u8 = 0x10;
/// The only version byte this crate understands
pub const TIM_VERSION: u8 = 0x00;

/// Pixel storage mode, from the low three bits of the header flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    /// 4-bit palette indices, 16-entry palettes
    Clut4,
    /// 8-bit palette indices, 256-entry palettes
    Clut8,
    /// Direct 15-bit colour
    Direct15,
    /// Direct 24-bit colour
    Direct24,
    /// Mixed contents
    Mixed,
}

impl PixelMode {
    /// Decode the pixel mode from the header flag word
    pub fn from_flag(flag: u32) -> Option<Self> {
        match flag & 0x07 {
            0 => Some(Self::Clut4),
            1 => Some(Self::Clut8),
            2 => Some(Self::Direct15),
            3 => Some(Self::Direct24),
            4 => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// Colour lookup table section
#[derive(Debug, Clone)]
pub struct ClutSection {
    /// Framebuffer X placement of the table itself
    pub fb_x: u16,
    /// Framebuffer Y placement of the table itself
    pub fb_y: u16,
    /// Entries per palette row
    pub width: u16,
    /// Number of palette rows
    pub height: u16,
    /// Raw 15-bit colour entries, `width * height` of them
    pub entries: Vec<u16>,
}

/// Indexed pixel section
#[derive(Debug, Clone)]
pub struct PixelSection {
    /// Framebuffer X placement, in 16-bit units
    pub fb_x: u16,
    /// Framebuffer Y placement, in rows
    pub fb_y: u16,
    /// Stored width in 16-bit units (4 logical pixels each in 4-bit mode)
    pub width: u16,
    /// Height in rows
    pub height: u16,
    /// Packed palette indices, two per byte, low nibble first
    pub data: Vec<u8>,
}

/// A parsed TIM texture file
#[derive(Debug, Clone)]
pub struct TimTexture {
    /// Raw header flag word
    pub flag: u32,
    /// Colour lookup table
    pub clut: ClutSection,
    /// Packed pixel data
    pub pixels: PixelSection,
}

/// Red component of a CLUT entry, raw 5 bits
pub fn clut_red(entry: u16) -> u8 {
    (entry & 0x1F) as u8
}

/// Green component of a CLUT entry, raw 5 bits
pub fn clut_green(entry: u16) -> u8 {
    ((entry >> 5) & 0x1F) as u8
}

/// Blue component of a CLUT entry, raw 5 bits
pub fn clut_blue(entry: u16) -> u8 {
    ((entry >> 10) & 0x1F) as u8
}

/// Semitransparency (STP) bit of a CLUT entry.
///
/// Decoded for callers that want it but intentionally not applied when
/// expanding to RGBA; only the all-zero entry maps to transparent.
pub fn clut_stp(entry: u16) -> bool {
    entry & 0x8000 != 0
}

/// Expand a raw 5-bit channel to 8 bits, rounding to nearest
fn expand_channel(raw: u8) -> u8 {
    (f32::from(raw) * 255.0 / 31.0).round() as u8
}

impl TimTexture {
    /// Parse a TIM file from a byte buffer.
    ///
    /// Validates the magic and version bytes, then reads the CLUT and
    /// pixel sections. The pixel section starts exactly at the CLUT
    /// section's declared byte size, not at the end of the entries that
    /// were read.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(input);

        let id = cursor.read_u8()?;
        if id != TIM_MAGIC {
            return Err(TimError::WrongMagic {
                expected: TIM_MAGIC,
                actual: id,
            });
        }
        let version = cursor.read_u8()?;
        if version != TIM_VERSION {
            return Err(TimError::WrongVersion(version));
        }
        cursor.skip(2)?; // reserved
        let flag = cursor.read_u32_le()?;

        let clut_start = cursor.position();
        let clut_size = cursor.read_u32_le()? as usize;
        let fb_x = cursor.read_u16_le()?;
        let fb_y = cursor.read_u16_le()?;
        let width = cursor.read_u16_le()?;
        let height = cursor.read_u16_le()?;

        // Entry count is implied by the declared palette geometry.
        let mut entries = Vec::with_capacity(usize::from(width) * usize::from(height));
        for _ in 0..usize::from(width) * usize::from(height) {
            entries.push(cursor.read_u16_le()?);
        }
        let clut = ClutSection {
            fb_x,
            fb_y,
            width,
            height,
            entries,
        };

        // The pixel section begins at the CLUT section's declared size,
        // which may include padding beyond the entries themselves.
        cursor.seek_to(clut_start + clut_size)?;

        cursor.read_u32_le()?; // pixel section size, data length is implied by geometry
        let fb_x = cursor.read_u16_le()?;
        let fb_y = cursor.read_u16_le()?;
        let width = cursor.read_u16_le()?;
        let height = cursor.read_u16_le()?;
        let data = cursor.read_bytes(usize::from(width) * 2 * usize::from(height))?;

        Ok(Self {
            flag,
            clut,
            pixels: PixelSection {
                fb_x,
                fb_y,
                width,
                height,
                data,
            },
        })
    }

    /// Load and parse a TIM file from the filesystem
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let input = std::fs::read(path)?;
        Self::parse(&input)
    }

    /// Pixel storage mode declared by the header flag
    pub fn pixel_mode(&self) -> Option<PixelMode> {
        PixelMode::from_flag(self.flag)
    }

    /// Width of the decoded image in logical pixels
    pub fn width(&self) -> u32 {
        u32::from(self.pixels.width) * 4
    }

    /// Height of the decoded image in rows
    pub fn height(&self) -> u32 {
        u32::from(self.pixels.height)
    }

    /// Decode the indexed pixel data into an RGBA image using one palette.
    ///
    /// Each 5-bit channel expands to 8 bits by `round(c * 255 / 31)`. A
    /// raw entry of exactly `0x0000` becomes fully transparent; every
    /// other entry is fully opaque regardless of its STP bit.
    pub fn decode_rgba(&self, palette: usize) -> Result<RgbaImage> {
        match self.pixel_mode() {
            Some(PixelMode::Clut4) => {}
            _ => return Err(TimError::UnsupportedPixelMode(self.flag & 0x07)),
        }

        let width = self.width();
        let height = self.height();
        let palette_base = palette * usize::from(self.clut.width);

        let mut image = RgbaImage::new(width, height);
        for i in 0..(width as usize * height as usize) {
            let byte = self.pixels.data[i / 2];
            let index = if i % 2 == 1 {
                usize::from(byte >> 4)
            } else {
                usize::from(byte & 0x0F)
            };

            let entry = *self.clut.entries.get(palette_base + index).ok_or(
                TimError::PaletteOutOfRange {
                    palette,
                    index: palette_base + index,
                    entries: self.clut.entries.len(),
                },
            )?;

            let alpha = if entry == 0x0000 { 0x00 } else { 0xFF };
            let pixel = image::Rgba([
                expand_channel(clut_red(entry)),
                expand_channel(clut_green(entry)),
                expand_channel(clut_blue(entry)),
                alpha,
            ]);
            image.put_pixel(i as u32 % width, i as u32 / width, pixel);
        }

        Ok(image)
    }
}
