/// Filesystem implementations

pub mod vzdos;

pub use vzdos::VzDosFileSystem;

use crate::error::Result;
use std::fmt;

/// Kind of file recorded in a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Tokenized BASIC program ('T')
    Basic,
    /// Machine code ('B')
    Binary,
    /// Any other type byte
    Other(u8),
}

impl From<u8> for FileKind {
    fn from(value: u8) -> Self {
        match value {
            b'T' => FileKind::Basic,
            b'B' => FileKind::Binary,
            other => FileKind::Other(other),
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Basic => write!(f, "BASIC"),
            FileKind::Binary => write!(f, "Binary"),
            FileKind::Other(b) => write!(f, "[{:02X}]", b),
        }
    }
}

/// Directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Index in the directory
    pub index: usize,
    /// File name, trailing spaces removed
    pub name: String,
    /// File type
    pub kind: FileKind,
    /// Track of the first sector
    pub start_track: u8,
    /// Sector id of the first sector
    pub start_sector: u8,
    /// Load address
    pub start_addr: u16,
    /// End address (exclusive)
    pub end_addr: u16,
}

impl DirEntry {
    /// File length implied by the addresses
    pub fn size(&self) -> usize {
        self.end_addr.saturating_sub(self.start_addr) as usize
    }
}

/// Filesystem information
#[derive(Debug)]
pub struct FileSystemInfo {
    /// Filesystem type name
    pub fs_type: String,
    /// Number of files in the directory
    pub files: usize,
    /// Sectors marked used in the track map
    pub used_sectors: usize,
    /// Total sectors on the disk
    pub total_sectors: usize,
}

/// Read-only access to files on a decoded disk
pub trait FileSystem {
    /// List directory entries
    fn read_dir(&self) -> Result<Vec<DirEntry>>;

    /// Read a file's contents
    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    /// Get filesystem information
    fn info(&self) -> FileSystemInfo;
}
