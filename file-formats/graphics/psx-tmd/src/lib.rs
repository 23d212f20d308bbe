//! Parser for PlayStation TMD model files and their vertex-displacement
//! animation companions.
//!
//! A TMD file holds one or more objects, each with packed vertex,
//! normal and primitive tables. The primitive tables decode into
//! render-agnostic [`WorkPrimitive`]s with resolved positions, colours
//! and atlas-space UVs. Two companion formats animate the mesh: VDF
//! files carry per-vertex displacement keys, DAT files carry the weight
//! timeline that drives them. [`MeshPose`] ties the three together.
//!
//! # Examples
//!
//! ```no_run
//! use psx_tmd::{DatFile, MeshPose, TmdModel, VdfFile};
//!
//! let model = TmdModel::from_file("HERO.TMD")?;
//! for object in model.objects() {
//!     let primitives = object.work_primitives()?;
//!     println!("{} primitives", primitives.len());
//! }
//!
//! let vdf = VdfFile::from_file("HERO.VDF")?;
//! let dat = DatFile::from_file("HERO.DAT")?;
//! let mut pose = MeshPose::new(&model);
//! pose.apply_frame(&vdf, &dat, 2.5)?;
//! # Ok::<(), psx_tmd::TmdError>(())
//! ```

pub mod dat;
pub mod error;
pub mod model;
pub mod pose;
pub mod primitive;
pub mod vdf;

pub use dat::{DatFile, WeightChannel};
pub use error::{Result, TmdError};
pub use model::{TmdModel, TmdNormal, TmdObject, TmdVertex};
pub use pose::MeshPose;
pub use primitive::{PrimitiveFlags, WorkPrimitive};
pub use vdf::{VdfFile, VdfKey};
