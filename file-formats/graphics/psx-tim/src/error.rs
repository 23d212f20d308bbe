use psx_data::DataError;
use thiserror::Error;

/// Errors that the TIM parser and atlas compositor can produce
#[derive(Debug, Error)]
pub enum TimError {
    /// Invalid magic byte in the file header
    #[error("Unexpected magic value {actual:#04x}, expected {expected:#04x}. The file is not a TIM image.")]
    WrongMagic {
        /// Magic byte the format requires
        expected: u8,
        /// Magic byte found in the file
        actual: u8,
    },

    /// Unsupported version byte in the file header
    #[error("Unsupported TIM version {0:#04x}")]
    WrongVersion(u8),

    /// A section ran past the end of the file
    #[error(transparent)]
    Truncated(#[from] DataError),

    /// Pixel mode this pipeline does not composite (only 4-bit CLUT data carries pixels it can decode)
    #[error("Unsupported pixel mode {0} (only 4-bit CLUT images are decoded)")]
    UnsupportedPixelMode(u32),

    /// A palette lookup landed outside the colour lookup table
    #[error("CLUT entry {index} of palette {palette} is outside the table ({entries} entries)")]
    PaletteOutOfRange {
        /// Requested palette number
        palette: usize,
        /// Entry index within the whole CLUT
        index: usize,
        /// Total number of CLUT entries
        entries: usize,
    },

    /// The declared framebuffer placement does not fit inside the atlas
    #[error(
        "Placement at ({x}, {y}) of a {width}x{height} image exceeds the {atlas_width}x{atlas_height} atlas"
    )]
    PlacementOutOfRange {
        /// Destination X in atlas pixels
        x: u32,
        /// Destination Y in atlas pixels
        y: u32,
        /// Decoded image width in atlas pixels
        width: u32,
        /// Decoded image height in atlas pixels
        height: u32,
        /// Atlas width in pixels
        atlas_width: u32,
        /// Atlas height in pixels
        atlas_height: u32,
    },

    /// I/O error while loading from the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for TIM operations
pub type Result<T> = std::result::Result<T, TimError>;
