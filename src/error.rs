use thiserror::Error;

/// Result type alias for VZ image operations
pub type Result<T> = std::result::Result<T, VzError>;

/// Errors that can occur when decoding VZ images
///
/// Checksum mismatches and malformed markers are not errors; they are
/// reported as warnings alongside the decoded value. Only missing bytes
/// and filesystem lookups fail.
#[derive(Debug, Error)]
pub enum VzError {
    /// I/O error occurred while loading an image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes remain than a fixed-size field needs
    #[error("Truncated read at offset {offset}: wanted {wanted} bytes, {available} available")]
    TruncatedRead {
        /// Byte offset where the read started
        offset: usize,
        /// Number of bytes the field needs
        wanted: usize,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// No registered decoder accepted the buffer
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Sector is not present (or was not readable) in a decoded disk
    #[error("Invalid sector: track {track}, sector {sector}")]
    InvalidSector {
        /// Track number
        track: u8,
        /// Physical sector id
        sector: u8,
    },

    /// A file's sector link points somewhere unusable
    #[error("Broken sector chain at track {track}, sector {sector}")]
    BrokenChain {
        /// Track number of the offending link
        track: u8,
        /// Sector id of the offending link
        sector: u8,
    },

    /// File not found in the disk directory
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Filesystem-related error
    #[error("Filesystem error: {0}")]
    FileSystemError(String),
}

impl VzError {
    /// Create a truncated read error
    pub fn truncated(offset: usize, wanted: usize, available: usize) -> Self {
        VzError::TruncatedRead {
            offset,
            wanted,
            available,
        }
    }

    /// Create a filesystem error
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        VzError::FileSystemError(message.into())
    }

    /// Is this the structural "ran out of bytes" error?
    pub fn is_truncation(&self) -> bool {
        matches!(self, VzError::TruncatedRead { .. })
    }
}
