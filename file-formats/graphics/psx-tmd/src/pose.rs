//! Posing a model with displacement keys and weight timelines.
//!
//! [`MeshPose`] owns a working copy of every object's vertex buffer
//! alongside the pristine originals. Displacement keys deform the
//! working copies; a reset snaps them back. [`MeshPose::apply_frame`]
//! is the usual entry point: reset, then apply every key whose weight
//! channel is still active at the requested frame.

use log::warn;

use crate::dat::DatFile;
use crate::error::{Result, TmdError};
use crate::model::{TmdModel, TmdVertex};
use crate::vdf::VdfFile;

/// Working vertex buffers for a model under displacement animation
#[derive(Debug, Clone)]
pub struct MeshPose {
    pristine: Vec<Vec<TmdVertex>>,
    working: Vec<Vec<TmdVertex>>,
}

impl MeshPose {
    /// Build a pose over `model`, starting at the rest mesh
    pub fn new(model: &TmdModel) -> Self {
        let pristine: Vec<Vec<TmdVertex>> = model
            .objects()
            .iter()
            .map(|object| object.vertices().to_vec())
            .collect();
        let working = pristine.clone();
        Self { pristine, working }
    }

    /// Number of objects in the pose
    pub fn object_count(&self) -> usize {
        self.working.len()
    }

    /// Current vertices of one object
    pub fn vertices(&self, object: usize) -> Result<&[TmdVertex]> {
        self.working
            .get(object)
            .map(Vec::as_slice)
            .ok_or(TmdError::ObjectOutOfRange {
                index: object,
                count: self.working.len(),
            })
    }

    /// Restore every object to the rest mesh
    pub fn reset(&mut self) {
        for (working, pristine) in self.working.iter_mut().zip(&self.pristine) {
            working.copy_from_slice(pristine);
        }
    }

    /// Apply one displacement key on top of the current pose.
    ///
    /// Does not reset first, so repeated calls accumulate.
    pub fn apply_key(&mut self, vdf: &VdfFile, key_index: usize, influence: f32) -> Result<()> {
        let key = vdf.key(key_index)?;
        let object = key.object_index as usize;
        let buffer = self
            .working
            .get_mut(object)
            .ok_or(TmdError::ObjectOutOfRange {
                index: object,
                count: self.pristine.len(),
            })?;
        key.apply(buffer, influence)
    }

    /// Pose the mesh at `frame_no` of a weight timeline.
    ///
    /// Resets to the rest mesh, then applies every key whose channel is
    /// still active at the frame, weighted by its interpolated
    /// influence. Keys and channels pair up by index; a length mismatch
    /// between the two files is tolerated by driving only the pairs
    /// that exist on both sides.
    ///
    /// A key that targets a missing object or a vertex run past its
    /// buffer is skipped with a warning; the remaining channels still
    /// apply.
    pub fn apply_frame(&mut self, vdf: &VdfFile, dat: &DatFile, frame_no: f32) -> Result<()> {
        if vdf.key_count() != dat.channel_count() {
            warn!(
                "displacement key count {} != weight channel count {}, driving the overlap",
                vdf.key_count(),
                dat.channel_count()
            );
        }

        self.reset();
        let driven = vdf.key_count().min(dat.channel_count());
        for index in 0..driven {
            let channel = dat.channel(index)?;
            if !channel.is_active(frame_no) {
                continue;
            }
            match self.apply_key(vdf, index, channel.influence_at(frame_no)) {
                Ok(()) => {}
                Err(e @ (TmdError::ObjectOutOfRange { .. } | TmdError::VertexRangeOutOfRange { .. })) => {
                    warn!("displacement key {index}: {e}, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
