use psx_data::DataError;
use thiserror::Error;

/// Error types for TMD model and displacement-animation parsing
#[derive(Debug, Error)]
pub enum TmdError {
    /// Invalid magic number in the file header
    #[error("Unexpected magic value {actual:#010x}, expected {expected:#010x}. The file is not a TMD model.")]
    WrongMagic {
        /// Magic word the format requires
        expected: u32,
        /// Magic word found in the file
        actual: u32,
    },

    /// A structure ran past the end of the file
    #[error(transparent)]
    Truncated(#[from] DataError),

    /// An object's declared vertex, normal or primitive span does not fit in the file
    #[error("Object {object}: {section} at offset {offset} ({bytes} bytes) exceeds the file size {len}")]
    SectionOutOfBounds {
        /// Index of the object whose descriptor is bad
        object: usize,
        /// Which array the descriptor points at
        section: &'static str,
        /// Absolute byte offset of the array
        offset: usize,
        /// Declared byte length of the array
        bytes: usize,
        /// Total file size
        len: usize,
    },

    /// An object index referenced something outside the model
    #[error("Object index {index} is out of range ({count} objects)")]
    ObjectOutOfRange {
        /// Requested object index
        index: usize,
        /// Number of objects in the model
        count: usize,
    },

    /// A displacement key index referenced something outside the key set
    #[error("Displacement key index {index} is out of range ({count} keys)")]
    KeyOutOfRange {
        /// Requested key index
        index: usize,
        /// Number of keys in the file
        count: usize,
    },

    /// A displacement key's vertex range does not fit the target buffer
    #[error("Displacement covers vertices {first}..{end} but the buffer holds {len}")]
    VertexRangeOutOfRange {
        /// First affected vertex index
        first: usize,
        /// One past the last affected vertex index
        end: usize,
        /// Length of the vertex buffer
        len: usize,
    },

    /// I/O error while loading from the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using `TmdError`
pub type Result<T> = std::result::Result<T, TmdError>;
