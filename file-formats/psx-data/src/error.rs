use thiserror::Error;

/// Errors produced while reading raw bytes
#[derive(Debug, Error)]
pub enum DataError {
    /// A read would run past the end of the input buffer
    #[error("Unexpected end of input at offset {offset}, needed {wanted} more bytes")]
    UnexpectedEof {
        /// Cursor position when the read was attempted
        offset: usize,
        /// Number of bytes the read required
        wanted: usize,
    },
}

/// Result type for byte reading operations
pub type Result<T> = std::result::Result<T, DataError>;
