/// Sector header framing
///
/// A VZ sector header is laid out as:
///
/// ```text
/// GAP1      5..7 x 0x80, then 0x00
/// IDAM in   FE E7 18 C3
/// track     1 byte
/// sector    1 byte
/// checksum  1 byte (track + sector)
/// GAP2      5..7 x 0x80, then 0x00
/// IDAM out  C3 18 E7 FE
/// ```
///
/// The gap widths are not fixed and can change from sector to sector in
/// the same image, so the framing is re-derived for every header.

use crate::format::constants::{header_checksum, GAP_END, GAP_FILL, IDAM_IN, IDAM_OUT};
use std::ops::Range;

/// Gap lengths tried, longest first
const GAP_CANDIDATES: [usize; 3] = [8, 7, 6];

/// Gap length reported when no terminator was found
pub const GAP_NOT_FOUND: usize = 1;

/// Decoded sector header framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorHeader {
    /// GAP1 length including the terminator
    pub gap1_len: usize,
    /// GAP1 is all fill bytes with a terminator
    pub gap1_valid: bool,
    /// IDAM in marker matches
    pub idam_in_valid: bool,
    /// Track number field
    pub track: u8,
    /// Sector id field
    pub sector: u8,
    /// Stored track + sector checksum
    pub checksum: u8,
    /// GAP2 length including the terminator
    pub gap2_len: usize,
    /// GAP2 is all fill bytes with a terminator
    pub gap2_valid: bool,
    /// IDAM out marker matches
    pub idam_out_valid: bool,
}

impl SectorHeader {
    /// Total header length in bytes
    pub fn header_len(&self) -> usize {
        self.gap1_len + 4 + 3 + self.gap2_len + 4
    }

    /// Both gaps were found and both IDAM markers match
    ///
    /// This is structural validity only; checksum and track/sector numbers
    /// are checked separately.
    pub fn is_framed(&self) -> bool {
        self.gap1_len > GAP_NOT_FOUND
            && self.gap2_len > GAP_NOT_FOUND
            && self.idam_in_valid
            && self.idam_out_valid
    }

    /// Checksum the header should carry for its track and sector
    pub fn checksum_expected(&self) -> u8 {
        header_checksum(self.track, self.sector)
    }

    /// Does the stored checksum match?
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.checksum_expected()
    }

    /// Byte range of GAP1 within the header
    pub fn gap1_range(&self) -> Range<usize> {
        0..self.gap1_len
    }

    /// Byte range of the IDAM in marker
    pub fn idam_in_range(&self) -> Range<usize> {
        self.gap1_len..self.gap1_len + 4
    }

    /// Byte range of GAP2
    pub fn gap2_range(&self) -> Range<usize> {
        let start = self.gap2_start();
        start..start + self.gap2_len
    }

    /// Byte range of the IDAM out marker
    pub fn idam_out_range(&self) -> Range<usize> {
        let start = self.gap2_start() + self.gap2_len;
        start..start + 4
    }

    fn gap2_start(&self) -> usize {
        self.gap1_len + 7
    }
}

/// Parse a sector header from a window of (normally 27) bytes
///
/// Never fails: bytes missing from a short window compare as mismatches.
pub fn parse_sector_header(window: &[u8]) -> SectorHeader {
    let at = |i: usize| window.get(i).copied();

    let gap1_len = find_gap(window, 0, IDAM_IN[0]);
    let gap1_valid = is_gap_valid(window, 0, gap1_len);
    let idam_in_valid = marker_matches(window, gap1_len, &IDAM_IN);

    let track = at(gap1_len + 4).unwrap_or(0);
    let sector = at(gap1_len + 5).unwrap_or(0);
    let checksum = at(gap1_len + 6).unwrap_or(0);

    let start2 = gap1_len + 7;
    let gap2_len = find_gap(window, start2, IDAM_OUT[0]);
    let gap2_valid = is_gap_valid(window, start2, gap2_len);
    let idam_out_valid = marker_matches(window, start2 + gap2_len, &IDAM_OUT);

    SectorHeader {
        gap1_len,
        gap1_valid,
        idam_in_valid,
        track,
        sector,
        checksum,
        gap2_len,
        gap2_valid,
        idam_out_valid,
    }
}

/// Find the gap length: a terminator immediately followed by the first marker byte
fn find_gap(window: &[u8], start: usize, marker: u8) -> usize {
    GAP_CANDIDATES
        .iter()
        .copied()
        .find(|&len| {
            window.get(start + len - 1) == Some(&GAP_END)
                && window.get(start + len) == Some(&marker)
        })
        .unwrap_or(GAP_NOT_FOUND)
}

fn is_gap_valid(window: &[u8], start: usize, len: usize) -> bool {
    match window.get(start..start + len) {
        Some([fill @ .., end]) => *end == GAP_END && fill.iter().all(|&b| b == GAP_FILL),
        _ => false,
    }
}

/// Compare marker bytes 1..3; byte 0 was already matched by the gap search
fn marker_matches(window: &[u8], start: usize, marker: &[u8; 4]) -> bool {
    window.get(start + 1..start + 4) == Some(&marker[1..])
}
