//! VDF vertex-displacement key files.
//!
//! A VDF file is a flat list of displacement keys. Each key targets one
//! object of a TMD model, names a contiguous run of its vertices and
//! stores one signed offset triple per vertex. Applying a key adds its
//! offsets, scaled by an influence factor, to a working vertex buffer;
//! keys are deltas against the pristine mesh and accumulate until the
//! buffer is reset.

use psx_data::{ByteRead, Cursor};

use crate::error::{Result, TmdError};
use crate::model::TmdVertex;

/// One displacement key: per-vertex offsets for a run of vertices
/// inside a single object
#[derive(Debug, Clone)]
pub struct VdfKey {
    /// Index of the model object this key displaces
    pub object_index: u32,
    /// First vertex of the affected run
    pub first_vertex: u32,
    /// Signed offset per affected vertex, in model units
    pub offsets: Vec<[i16; 3]>,
}

impl VdfKey {
    /// Number of vertices the key displaces
    pub fn vertex_count(&self) -> usize {
        self.offsets.len()
    }

    /// Add this key's offsets, scaled by `influence`, to `vertices`.
    ///
    /// Offsets accumulate; callers animating frames reset the buffer to
    /// the pristine mesh first. Fails if the key's vertex run does not
    /// fit the buffer.
    pub fn apply(&self, vertices: &mut [TmdVertex], influence: f32) -> Result<()> {
        let first = self.first_vertex as usize;
        let end = first + self.offsets.len();
        if end > vertices.len() {
            return Err(TmdError::VertexRangeOutOfRange {
                first,
                end,
                len: vertices.len(),
            });
        }

        for (vertex, offset) in vertices[first..end].iter_mut().zip(&self.offsets) {
            vertex.x = (f32::from(vertex.x) + f32::from(offset[0]) * influence) as i16;
            vertex.y = (f32::from(vertex.y) + f32::from(offset[1]) * influence) as i16;
            vertex.z = (f32::from(vertex.z) + f32::from(offset[2]) * influence) as i16;
        }

        Ok(())
    }
}

/// A parsed VDF file
#[derive(Debug, Clone)]
pub struct VdfFile {
    keys: Vec<VdfKey>,
}

impl VdfFile {
    /// Parse a VDF file from a byte slice
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let key_count = cursor.read_u32_le()?;
        let mut keys = Vec::with_capacity(key_count as usize);
        for _ in 0..key_count {
            let object_index = cursor.read_u32_le()?;
            let first_vertex = cursor.read_u32_le()?;
            let vertex_count = cursor.read_u32_le()?;

            let mut offsets = Vec::with_capacity(vertex_count as usize);
            for _ in 0..vertex_count {
                let x = cursor.read_i16_le()?;
                let y = cursor.read_i16_le()?;
                let z = cursor.read_i16_le()?;
                cursor.skip(2)?; // pad
                offsets.push([x, y, z]);
            }

            keys.push(VdfKey {
                object_index,
                first_vertex,
                offsets,
            });
        }

        Ok(Self { keys })
    }

    /// Load and parse a VDF file from disk
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Number of keys in the file
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// All keys, in file order
    pub fn keys(&self) -> &[VdfKey] {
        &self.keys
    }

    /// Key by index
    pub fn key(&self, index: usize) -> Result<&VdfKey> {
        self.keys.get(index).ok_or(TmdError::KeyOutOfRange {
            index,
            count: self.keys.len(),
        })
    }
}
