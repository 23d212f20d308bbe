//! Shared primitives for decoding PlayStation-era binary asset files.
//!
//! The companion crates (`psx-tmd` for geometry, `psx-tim` for textures)
//! parse tightly packed little-endian layouts with variable-stride records.
//! This crate holds the two concerns they have in common:
//!
//! - [`reader`]: a bounds-checked cursor over a byte slice, so no decoder
//!   ever walks past the end of its input.
//! - [`fixed`]: conversion of the console's 16-bit fixed-point encodings
//!   (packed normals, animation weights) into `f32`.

pub mod error;
pub mod fixed;
pub mod reader;

pub use error::{DataError, Result};
pub use reader::{ByteRead, Cursor};
