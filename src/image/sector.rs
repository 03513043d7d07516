/// Sector data structures

use crate::error::Result;
use crate::format::constants::{additive_checksum, SECTOR_DATA_SIZE, SECTOR_HEADER_WINDOW};
use crate::image::header::{parse_sector_header, SectorHeader};
use crate::io::ByteCursor;
use std::fmt;

/// A problem found while checking one sector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorIssue {
    /// GAP1 not found or not made of fill bytes
    InvalidGap1,
    /// IDAM in marker mismatch
    InvalidIdamIn,
    /// Header track number differs from the track being read
    WrongTrack {
        /// Track being read
        expected: u8,
        /// Track in the header
        found: u8,
    },
    /// Header sector id differs from the interleave position
    WrongSector {
        /// Id the interleave order expects here
        expected: u8,
        /// Id in the header
        found: u8,
    },
    /// Header checksum is not track + sector
    InvalidHeaderChecksum {
        /// Computed value
        expected: u8,
        /// Stored value
        found: u8,
    },
    /// GAP2 not found or not made of fill bytes
    InvalidGap2,
    /// IDAM out marker mismatch
    InvalidIdamOut,
    /// Payload checksum mismatch
    WrongCrc {
        /// Additive sum of the payload
        expected: u16,
        /// Stored value
        found: u16,
    },
}

impl SectorIssue {
    /// Does this issue belong to the header (as opposed to the payload)?
    pub fn is_header_issue(&self) -> bool {
        !matches!(self, SectorIssue::WrongCrc { .. })
    }
}

impl fmt::Display for SectorIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SectorIssue::InvalidGap1 => "Invalid GAP1",
            SectorIssue::InvalidIdamIn => "Invalid IDAM in",
            SectorIssue::WrongTrack { .. } => "Wrong Track number",
            SectorIssue::WrongSector { .. } => "Wrong Sector number",
            SectorIssue::InvalidHeaderChecksum { .. } => "Invalid Sec+Trk CRC",
            SectorIssue::InvalidGap2 => "Invalid GAP2",
            SectorIssue::InvalidIdamOut => "Invalid IDAM out",
            SectorIssue::WrongCrc { .. } => "Wrong CRC",
        };
        f.write_str(label)
    }
}

/// One physical sector as read from the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorFrame {
    /// Offset of the header in the image
    pub offset: usize,
    /// Decoded header framing
    pub header: SectorHeader,
    /// Raw header bytes as consumed
    pub header_bytes: Vec<u8>,
    /// Track this sector was read on
    pub expected_track: u8,
    /// Sector id expected at this interleave position
    pub expected_sector: u8,
    /// Sector data
    pub payload: Vec<u8>,
    /// Stored payload checksum
    pub payload_checksum_stored: u16,
    /// Problems found, in header order
    pub issues: Vec<SectorIssue>,
}

impl SectorFrame {
    /// Read one sector at the cursor
    ///
    /// The 27 byte window is only peeked; exactly the detected header
    /// length is consumed.
    pub fn read(cursor: &mut ByteCursor<'_>, expected_track: u8, expected_sector: u8) -> Result<Self> {
        let offset = cursor.position();
        let header = parse_sector_header(cursor.peek(SECTOR_HEADER_WINDOW));
        let header_bytes = cursor.advance(header.header_len())?.to_vec();
        let payload = cursor.advance(SECTOR_DATA_SIZE)?.to_vec();
        let payload_checksum_stored = cursor.read_u16_le()?;

        let mut frame = SectorFrame {
            offset,
            header,
            header_bytes,
            expected_track,
            expected_sector,
            payload,
            payload_checksum_stored,
            issues: Vec::new(),
        };
        frame.issues = frame.check();
        Ok(frame)
    }

    fn check(&self) -> Vec<SectorIssue> {
        let h = &self.header;
        let mut issues = Vec::new();

        if !h.gap1_valid {
            issues.push(SectorIssue::InvalidGap1);
        }
        if !h.idam_in_valid {
            issues.push(SectorIssue::InvalidIdamIn);
        }
        if h.track != self.expected_track {
            issues.push(SectorIssue::WrongTrack {
                expected: self.expected_track,
                found: h.track,
            });
        }
        if h.sector != self.expected_sector {
            issues.push(SectorIssue::WrongSector {
                expected: self.expected_sector,
                found: h.sector,
            });
        }
        if !h.checksum_valid() {
            issues.push(SectorIssue::InvalidHeaderChecksum {
                expected: h.checksum_expected(),
                found: h.checksum,
            });
        }
        if !h.gap2_valid {
            issues.push(SectorIssue::InvalidGap2);
        }
        if !h.idam_out_valid {
            issues.push(SectorIssue::InvalidIdamOut);
        }

        let computed = self.payload_checksum();
        if computed != self.payload_checksum_stored {
            issues.push(SectorIssue::WrongCrc {
                expected: computed,
                found: self.payload_checksum_stored,
            });
        }

        issues
    }

    /// Additive 16-bit sum of the payload
    pub fn payload_checksum(&self) -> u16 {
        additive_checksum(&self.payload)
    }

    /// Track number from the header
    pub fn track(&self) -> u8 {
        self.header.track
    }

    /// Sector id from the header
    pub fn sector(&self) -> u8 {
        self.header.sector
    }

    /// No issues at all
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Any header issues?
    pub fn has_header_issues(&self) -> bool {
        self.issues.iter().any(|i| i.is_header_issue())
    }

    /// Header bytes for a range, clamped to what was read
    pub fn header_slice(&self, range: std::ops::Range<usize>) -> &[u8] {
        let end = range.end.min(self.header_bytes.len());
        let start = range.start.min(end);
        &self.header_bytes[start..end]
    }
}

/// A sector position on a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectorSlot {
    /// The sector was read (possibly with issues)
    Read(SectorFrame),
    /// The image ended before the sector was complete
    Truncated {
        /// Offset where the sector started
        offset: usize,
        /// Sector id expected at this position
        expected_sector: u8,
    },
}

impl SectorSlot {
    /// Sector frame if it was read
    pub fn frame(&self) -> Option<&SectorFrame> {
        match self {
            SectorSlot::Read(frame) => Some(frame),
            SectorSlot::Truncated { .. } => None,
        }
    }

    /// Sector id expected at this position
    pub fn expected_sector(&self) -> u8 {
        match self {
            SectorSlot::Read(frame) => frame.expected_sector,
            SectorSlot::Truncated { expected_sector, .. } => *expected_sector,
        }
    }

    /// Read without issues
    pub fn is_valid(&self) -> bool {
        self.frame().is_some_and(|f| f.is_valid())
    }
}
