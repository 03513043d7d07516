/// VZ image layout constants

/// Standard VZ file signature
pub const VZF0_SIGNATURE: &[u8; 4] = b"VZF0";

/// Nonstandard VZ file signature (letter O instead of zero)
pub const VZFO_SIGNATURE: &[u8; 4] = b"VZFO";

/// Zero-filled header written by some z88dk builds
pub const Z88DK_SIGNATURE: &[u8; 4] = &[0x20, 0x20, 0x00, 0x00];

/// Size of the VZ file program name field (16 characters plus terminator)
pub const VZ_NAME_FIELD_SIZE: usize = 17;

/// Longest program name a cassette header holds
pub const TAPE_NAME_MAX: usize = 16;

/// Tape leader fill byte
pub const LEAD_IN_BYTE: u8 = 0x80;
/// Number of leader fill bytes
pub const LEAD_IN_FILL_LEN: usize = 255;
/// Tape sync byte following the leader
pub const LEAD_IN_SYNC_BYTE: u8 = 0xFE;
/// Number of sync bytes
pub const LEAD_IN_SYNC_LEN: usize = 5;
/// Total lead-in length
pub const LEAD_IN_LEN: usize = LEAD_IN_FILL_LEN + LEAD_IN_SYNC_LEN;

/// Tape lead-out fill byte
pub const LEAD_OUT_BYTE: u8 = 0x00;
/// Expected lead-out length
pub const LEAD_OUT_LEN: usize = 20;

/// File type byte: BASIC program
pub const FILE_TYPE_BASIC: u8 = 0xF0;
/// File type byte: machine code
pub const FILE_TYPE_BINARY: u8 = 0xF1;

/// Tracks on a VZ disk
pub const TRACKS_PER_DISK: u8 = 40;
/// Sectors per track
pub const SECTORS_PER_TRACK: usize = 16;
/// Sector payload size
pub const SECTOR_DATA_SIZE: usize = 128;
/// Header bytes read up front before the real header length is known
pub const SECTOR_HEADER_WINDOW: usize = 27;
/// Longest all-zero run accepted as a track separator
pub const TRACK_SEPARATOR_LEN: usize = 16;
/// Shortest all-zero run accepted as a track separator
pub const TRACK_SEPARATOR_MIN: usize = 15;

/// Physical sector id for each logical position on a track
pub const INTERLEAVE: [u8; SECTORS_PER_TRACK] = [0, 11, 6, 1, 12, 7, 2, 13, 8, 3, 14, 9, 4, 15, 10, 5];

/// Gap fill byte
pub const GAP_FILL: u8 = 0x80;
/// Gap terminator byte
pub const GAP_END: u8 = 0x00;

/// IDAM marker opening a sector header
pub const IDAM_IN: [u8; 4] = [0xFE, 0xE7, 0x18, 0xC3];
/// IDAM marker closing a sector header
pub const IDAM_OUT: [u8; 4] = [0xC3, 0x18, 0xE7, 0xFE];

/// Logical position of a physical sector id on a track
#[inline]
pub fn logical_position(sector_id: u8) -> Option<usize> {
    INTERLEAVE.iter().position(|&s| s == sector_id)
}

/// Additive 8-bit header checksum of a track and sector number
#[inline]
pub fn header_checksum(track: u8, sector: u8) -> u8 {
    track.wrapping_add(sector)
}

/// Additive 16-bit checksum used for sector payloads and tape programs
#[inline]
pub fn additive_checksum(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |sum, &b| sum.wrapping_add(b as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleave_is_permutation() {
        let mut seen = [false; SECTORS_PER_TRACK];
        for &id in INTERLEAVE.iter() {
            assert!(!seen[id as usize]);
            seen[id as usize] = true;
        }
        assert_eq!(INTERLEAVE[3], 1);
        assert_eq!(logical_position(11), Some(1));
        assert_eq!(logical_position(16), None);
    }

    #[test]
    fn test_checksums_wrap() {
        assert_eq!(header_checksum(39, 15), 54);
        assert_eq!(header_checksum(200, 100), 44);
        assert_eq!(additive_checksum(&[0xFF; 300]), (0xFFu32 * 300 % 0x10000) as u16);
        assert_eq!(additive_checksum(&[]), 0);
    }
}
