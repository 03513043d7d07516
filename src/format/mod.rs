/// VZ image formats: detection and decoding

/// Format constants
pub mod constants;

pub use constants::*;

use crate::error::{Result, VzError};
use crate::filesystem::VzDosFileSystem;
use crate::image::{parse_sector_header, VzDisk};
use crate::io::ByteCursor;
use crate::report::Report;
use crate::tape::{LeadIn, Signature, TapeBlock, TapeLayout};
use crate::vz_basic::Escape;
use log::debug;
use std::path::Path;

/// Supported image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.vz` program file
    VzFile,
    /// `.cvz` raw cassette capture
    Cassette,
    /// `.dsk` / `.dvz` floppy sector dump
    Disk,
}

/// Registry of formats, tried in order
pub static FORMATS: [Format; 3] = [Format::VzFile, Format::Cassette, Format::Disk];

impl Format {
    /// Human-readable format name
    pub fn name(&self) -> &'static str {
        match self {
            Format::VzFile => "VZ file",
            Format::Cassette => "VZ cassette",
            Format::Disk => "VZ disk",
        }
    }

    /// File extensions handled by this format (lower case)
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::VzFile => &["vz"],
            Format::Cassette => &["cvz"],
            Format::Disk => &["dsk", "dvz"],
        }
    }

    /// Does this format accept the buffer?
    ///
    /// The extension must match (any case) and the content must carry the
    /// format's signature. `path` is only used for logging.
    pub fn sniff(&self, ext: &str, path: &str, data: &[u8]) -> bool {
        if !self
            .extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
        {
            return false;
        }
        let accepted = match self {
            Format::VzFile => {
                // The signature may follow a cassette lead-in
                let start = if LeadIn::matches(data) { LEAD_IN_LEN } else { 0 };
                data.get(start..start + 4)
                    .map(|s| Signature::from_bytes([s[0], s[1], s[2], s[3]]).is_known())
                    .unwrap_or(false)
            }
            Format::Cassette => LeadIn::matches(data),
            Format::Disk => {
                let window = &data[..data.len().min(SECTOR_HEADER_WINDOW)];
                parse_sector_header(window).is_framed()
            }
        };
        debug!("{}: {} sniff {}", path, self.name(), if accepted { "accepted" } else { "rejected" });
        accepted
    }

    /// Decode from the cursor position
    pub fn decode(&self, cursor: &mut ByteCursor<'_>) -> Decoded {
        match self {
            Format::VzFile => Decoded::Tape(TapeBlock::read(cursor, TapeLayout::VzFile)),
            Format::Cassette => Decoded::Tape(TapeBlock::read(cursor, TapeLayout::Cassette)),
            Format::Disk => Decoded::Disk(VzDisk::read(cursor)),
        }
    }

    /// First registry format accepting the buffer
    pub fn detect(path: &str, data: &[u8]) -> Result<Format> {
        let ext = extension_of(path);
        FORMATS
            .iter()
            .copied()
            .find(|f| f.sniff(&ext, path, data))
            .ok_or_else(|| VzError::UnknownFormat(path.to_string()))
    }
}

/// File extension of `path`, empty when there is none
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Result of decoding an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A tape block (VZ file or cassette)
    Tape(TapeBlock),
    /// A floppy image
    Disk(VzDisk),
}

impl Decoded {
    /// Build the report with each format's default escaping
    pub fn report(&self) -> Report {
        let mut report = Report::new();
        match self {
            Decoded::Tape(block) => block.report(&mut report),
            Decoded::Disk(disk) => report_disk(disk, &mut report),
        }
        report
    }

    /// Build the report, forcing the BASIC escaping mode
    pub fn report_with(&self, escape: Escape) -> Report {
        let mut report = Report::new();
        match self {
            Decoded::Tape(block) => block.report_with(&mut report, escape),
            Decoded::Disk(disk) => report_disk(disk, &mut report),
        }
        report
    }

    /// Decoded tape block, if any
    pub fn tape(&self) -> Option<&TapeBlock> {
        match self {
            Decoded::Tape(block) => Some(block),
            Decoded::Disk(_) => None,
        }
    }

    /// Decoded disk, if any
    pub fn disk(&self) -> Option<&VzDisk> {
        match self {
            Decoded::Disk(disk) => Some(disk),
            Decoded::Tape(_) => None,
        }
    }
}

fn report_disk(disk: &VzDisk, report: &mut Report) {
    disk.report(report);
    if let Ok(fs) = VzDosFileSystem::new(disk) {
        fs.report(report);
    }
}
