//! DAT weight-timeline files.
//!
//! A DAT file drives the keys of a companion VDF file over time: one
//! weight channel per displacement key, each channel a run of unsigned
//! 4.12 fixed-point weights sampled once per frame. Channels can have
//! different lengths; a channel whose timeline has run out simply stops
//! contributing.

use psx_data::{ByteRead, Cursor, fixed::weight_to_f32};

use crate::error::{Result, TmdError};

/// One per-key weight timeline
#[derive(Debug, Clone)]
pub struct WeightChannel {
    /// Raw 4.12 fixed-point weights, one per frame
    pub weights: Vec<u16>,
}

impl WeightChannel {
    /// Number of frames the channel covers
    pub fn frame_count(&self) -> usize {
        self.weights.len()
    }

    /// Whether the channel still contributes at `frame_no`
    pub fn is_active(&self, frame_no: f32) -> bool {
        frame_no < self.weights.len() as f32
    }

    /// Influence at a (possibly fractional) frame number.
    ///
    /// Interpolates linearly between the surrounding samples; sample
    /// indices are clamped to the timeline so the last weight holds at
    /// the channel's end. An empty timeline contributes nothing.
    pub fn influence_at(&self, frame_no: f32) -> f32 {
        if self.weights.is_empty() {
            return 0.0;
        }

        let last = self.weights.len() - 1;
        let lower = (frame_no.floor().max(0.0) as usize).min(last);
        let upper = (lower + 1).min(last);
        let t = frame_no - frame_no.floor();

        let a = weight_to_f32(self.weights[lower]);
        let b = weight_to_f32(self.weights[upper]);
        a + (b - a) * t
    }
}

/// A parsed DAT file
#[derive(Debug, Clone)]
pub struct DatFile {
    channels: Vec<WeightChannel>,
}

impl DatFile {
    /// Parse a DAT file from a byte slice
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let key_count = cursor.read_u16_le()?;
        let mut channels = Vec::with_capacity(usize::from(key_count));
        for _ in 0..key_count {
            let frame_count = cursor.read_u16_le()?;
            let mut weights = Vec::with_capacity(usize::from(frame_count));
            for _ in 0..frame_count {
                weights.push(cursor.read_u16_le()?);
            }
            channels.push(WeightChannel { weights });
        }

        Ok(Self { channels })
    }

    /// Load and parse a DAT file from disk
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Number of weight channels (one per displacement key)
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// All channels, in key order
    pub fn channels(&self) -> &[WeightChannel] {
        &self.channels
    }

    /// Channel by key index
    pub fn channel(&self, index: usize) -> Result<&WeightChannel> {
        self.channels.get(index).ok_or(TmdError::KeyOutOfRange {
            index,
            count: self.channels.len(),
        })
    }

    /// Length of the longest channel, the animation's frame count
    pub fn frame_count(&self) -> usize {
        self.channels
            .iter()
            .map(WeightChannel::frame_count)
            .max()
            .unwrap_or(0)
    }
}
