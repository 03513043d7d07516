/// Track reconstruction

use crate::format::constants::{INTERLEAVE, TRACK_SEPARATOR_LEN, TRACK_SEPARATOR_MIN};
use crate::image::sector::{SectorFrame, SectorSlot};
use crate::io::ByteCursor;
use log::warn;

/// Zero bytes found between two tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSeparator {
    /// Offset of the first byte
    pub offset: usize,
    /// Number of zero bytes
    pub len: usize,
}

/// One track: 16 sector slots in physical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Track number (the one being read, not the one in the headers)
    pub number: u8,
    /// Sector slots in the order they appear in the image
    pub sectors: Vec<SectorSlot>,
    /// Optional separator after the last sector
    pub separator: Option<TrackSeparator>,
}

impl Track {
    /// Read a track at the cursor
    ///
    /// Every sector position is visited even after a failure; a truncated
    /// sector is recorded and the next one is attempted.
    pub fn read(cursor: &mut ByteCursor<'_>, number: u8) -> Self {
        let mut sectors = Vec::with_capacity(INTERLEAVE.len());

        for &expected_sector in INTERLEAVE.iter() {
            let offset = cursor.position();
            let slot = match SectorFrame::read(cursor, number, expected_sector) {
                Ok(frame) => SectorSlot::Read(frame),
                Err(e) => {
                    warn!("Track {} sector {}: {}", number, expected_sector, e);
                    SectorSlot::Truncated {
                        offset,
                        expected_sector,
                    }
                }
            };
            sectors.push(slot);
        }

        let separator = read_separator(cursor);

        Self {
            number,
            sectors,
            separator,
        }
    }

    /// Physical ids of sector positions with any problem
    pub fn sectors_with_errors(&self) -> Vec<u8> {
        self.sectors
            .iter()
            .filter(|s| !s.is_valid())
            .map(|s| s.expected_sector())
            .collect()
    }

    /// Find a sector by the id stored in its header
    pub fn get_sector(&self, id: u8) -> Option<&SectorFrame> {
        self.sectors
            .iter()
            .filter_map(|s| s.frame())
            .find(|f| f.sector() == id)
    }

    /// Every sector read cleanly
    pub fn is_valid(&self) -> bool {
        self.sectors.iter().all(|s| s.is_valid())
    }
}

/// Consume a 15 or 16 byte run of zeros between tracks
///
/// The run is optional, so the bytes are only consumed on a match; an
/// all-zero tail at the end of the image also counts.
fn read_separator(cursor: &mut ByteCursor<'_>) -> Option<TrackSeparator> {
    if cursor.at_end() {
        return None;
    }
    cursor.speculate(|c| {
        let offset = c.position();
        let window = c.peek(TRACK_SEPARATOR_LEN);
        let len = window.iter().take_while(|&&b| b == 0).count();
        let reaches_end = len == window.len() && len < TRACK_SEPARATOR_LEN;
        if len >= TRACK_SEPARATOR_MIN || (reaches_end && len > 0) {
            c.advance(len).ok()?;
            Some(TrackSeparator { offset, len })
        } else {
            None
        }
    })
}
