//! Parser and compositor for PlayStation TIM texture files.
//!
//! TIM is the console's native texture format: a palette of 15-bit
//! colours followed by packed palette indices, placed into video memory
//! at a position declared in the file itself. This crate decodes 4-bit
//! CLUT images to RGBA and composites any number of them into a shared
//! [`VramAtlas`] mirroring the console's framebuffer page layout, which
//! is how the mesh format's UV coordinates address textures.
//!
//! # Examples
//!
//! ```no_run
//! use psx_tim::{TimTexture, VramAtlas};
//!
//! let tim = TimTexture::from_file("FACE.TIM")?;
//! let mut atlas = VramAtlas::new();
//! atlas.composite(&tim)?;
//! atlas.into_image().save("atlas.png").unwrap();
//! # Ok::<(), psx_tim::TimError>(())
//! ```

pub mod atlas;
pub mod error;
pub mod texture;

pub use atlas::VramAtlas;
pub use error::{Result, TimError};
pub use texture::{PixelMode, TimTexture};
