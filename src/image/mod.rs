/// VZ disk image data structures

/// Sector header framing codec
pub mod header;
/// Sector definition and issues
pub mod sector;
/// Track definition and separator probing
pub mod track;

pub use header::{parse_sector_header, SectorHeader};
pub use sector::{SectorFrame, SectorIssue, SectorSlot};
pub use track::{Track, TrackSeparator};

use crate::format::constants::{IDAM_IN, IDAM_OUT, TRACKS_PER_DISK};
use crate::io::ByteCursor;
use crate::report::{hex_sequence, Description, Report};
use log::debug;

/// A decoded VZ disk: 40 tracks of 16 sectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VzDisk {
    tracks: Vec<Track>,
    /// Bytes left over after the last track
    trailing: usize,
}

impl VzDisk {
    /// Reconstruct all tracks from the cursor position
    ///
    /// Never fails: problems are recorded per sector and every track is
    /// visited once, even when the image ends early.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Self {
        let mut tracks = Vec::with_capacity(TRACKS_PER_DISK as usize);
        for number in 0..TRACKS_PER_DISK {
            let track = Track::read(cursor, number);
            debug!(
                "Track {}: {} sectors with errors",
                number,
                track.sectors_with_errors().len()
            );
            tracks.push(track);
        }
        Self {
            tracks,
            trailing: cursor.remaining(),
        }
    }

    /// All tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get a track by number
    pub fn get_track(&self, number: u8) -> Option<&Track> {
        self.tracks.get(number as usize)
    }

    /// Get a sector by track number and physical sector id
    pub fn get_sector(&self, track: u8, id: u8) -> Option<&SectorFrame> {
        self.get_track(track)?.get_sector(id)
    }

    /// Number of bytes after the last track
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    /// Count of sector positions with any problem
    pub fn error_count(&self) -> usize {
        self.tracks.iter().map(|t| t.sectors_with_errors().len()).sum()
    }

    /// Emit the track/sector breakdown into a report
    pub fn report(&self, report: &mut Report) {
        for track in &self.tracks {
            report_track(report, track);
        }
    }
}

fn report_track(report: &mut Report, track: &Track) {
    report.group("Track", |r| {
        for slot in &track.sectors {
            match slot {
                SectorSlot::Read(frame) => report_sector(r, frame),
                SectorSlot::Truncated {
                    offset,
                    expected_sector,
                } => r.field(
                    "Sector",
                    expected_sector.to_string(),
                    Description::warning(format!(
                        "Sector {} on Track {} truncated at offset {}",
                        expected_sector, track.number, offset
                    )),
                ),
            }
        }
        if let Some(sep) = &track.separator {
            r.dump(
                "Separator",
                format!("{} x 00", sep.len),
                Description::info("Track separator"),
                sep.offset,
                &vec![0u8; sep.len],
            );
        }

        let mut description = Description::info(format!("Track {}", track.number));
        let errors = track.sectors_with_errors();
        if !errors.is_empty() {
            let list: Vec<String> = errors.iter().map(|s| s.to_string()).collect();
            description = description.with_warning(format!("(ERR in Sectors: {})", list.join(",")));
        }
        (track.number.to_string(), description)
    });
}

fn report_sector(report: &mut Report, frame: &SectorFrame) {
    report.group("Sector", |r| {
        report_header(r, frame);

        r.dump(
            "Data",
            "Bytes",
            Description::info("Sector data"),
            frame.offset + frame.header_bytes.len(),
            &frame.payload,
        );

        let computed = frame.payload_checksum();
        let mut crc = Description::info("CRC of Sector data");
        if computed != frame.payload_checksum_stored {
            crc = crc.with_warning(format!("(expected 0x{:04X})", computed));
        }
        r.field("Sec CRC", format!("0x{:04X}", frame.payload_checksum_stored), crc);

        let mut description = Description::info(format!(
            "Sector {} on Track {}",
            frame.sector(),
            frame.track()
        ));
        let mut summary: Vec<String> = Vec::new();
        if frame.has_header_issues() {
            summary.push("Invalid Header".to_string());
        }
        summary.extend(
            frame
                .issues
                .iter()
                .filter(|i| !i.is_header_issue())
                .map(|i| i.to_string()),
        );
        if !summary.is_empty() {
            description = description.with_warning(summary.join(","));
        }
        (frame.sector().to_string(), description)
    });
}

fn report_header(report: &mut Report, frame: &SectorFrame) {
    let h = &frame.header;
    report.group("Header", |r| {
        let mut gap1 = Description::info(hex_sequence(frame.header_slice(h.gap1_range())));
        if !h.gap1_valid {
            gap1 = gap1.with_warning("Invalid");
        }
        r.field("GAP1", "Enter", gap1);

        let mut idam_in = Description::info(hex_sequence(frame.header_slice(h.idam_in_range())));
        if !h.idam_in_valid {
            idam_in = idam_in.with_warning(format!("(expected {})", hex_sequence(&IDAM_IN)));
        }
        r.field("IDAM", "IDAM (in)", idam_in);

        let mut track = Description::info(format!("Track number {}", h.track));
        if h.track != frame.expected_track {
            track = track.with_warning(format!("(expected {})", frame.expected_track));
        }
        r.field("Track", h.track.to_string(), track);

        let mut sector = Description::info(format!("Sector number {}", h.sector));
        if h.sector != frame.expected_sector {
            sector = sector.with_warning(format!("(expected {})", frame.expected_sector));
        }
        r.field("Sector", h.sector.to_string(), sector);

        let mut crc = Description::info("Track + Sector CRC");
        if !h.checksum_valid() {
            crc = crc.with_warning(format!("(expected {})", h.checksum_expected()));
        }
        r.field("CRC", h.checksum.to_string(), crc);

        let mut gap2 = Description::info(hex_sequence(frame.header_slice(h.gap2_range())));
        if !h.gap2_valid {
            gap2 = gap2.with_warning("Invalid");
        }
        r.field("GAP2", "Exit", gap2);

        let mut idam_out = Description::info(hex_sequence(frame.header_slice(h.idam_out_range())));
        if !h.idam_out_valid {
            idam_out = idam_out.with_warning(format!("(expected {})", hex_sequence(&IDAM_OUT)));
        }
        r.field("IDAM", "IDAM (out)", idam_out);

        let mut description = Description::info(format!(
            "Header of Sector {} on Track {}",
            h.sector, h.track
        ));
        let header_issues: Vec<String> = frame
            .issues
            .iter()
            .filter(|i| i.is_header_issue())
            .map(|i| i.to_string())
            .collect();
        if !header_issues.is_empty() {
            description = description.with_warning(header_issues.join(","));
        }
        (format!("T:{} S:{}", h.track, h.sector), description)
    });
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::format::constants::INTERLEAVE;
    use crate::image::sector::tests::build_sector;
    use crate::image::track::tests::build_track;

    /// A complete, clean 40 track disk with a separator after every track
    pub(crate) fn build_disk() -> Vec<u8> {
        let mut data = Vec::new();
        for t in 0..TRACKS_PER_DISK {
            data.extend(build_track(t));
            data.extend([0u8; 16]);
        }
        data
    }

    #[test]
    fn test_clean_disk() {
        let data = build_disk();
        let mut cursor = ByteCursor::new(&data);
        let disk = VzDisk::read(&mut cursor);
        assert_eq!(disk.tracks().len(), 40);
        assert_eq!(disk.error_count(), 0);
        assert_eq!(disk.trailing_bytes(), 0);
        assert!(disk.get_sector(39, 15).is_some());

        let mut report = Report::new();
        disk.report(&mut report);
        assert_eq!(report.rows().len(), 40);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn test_bad_sector_does_not_stop_image() {
        let mut data = Vec::new();
        for t in 0..TRACKS_PER_DISK {
            for (i, &id) in INTERLEAVE.iter().enumerate() {
                // Track 2, logical index 3 claims sector 2 instead of 1
                let id = if t == 2 && i == 3 { 2 } else { id };
                data.extend(build_sector(t, id, &[0u8; 128], 0));
            }
        }
        let mut cursor = ByteCursor::new(&data);
        let disk = VzDisk::read(&mut cursor);
        assert_eq!(disk.error_count(), 1);
        assert_eq!(disk.get_track(2).unwrap().sectors_with_errors(), vec![1]);

        let mut report = Report::new();
        disk.report(&mut report);
        let track2 = &report.rows()[2];
        assert!(track2.description.text.contains("ERR in Sectors: 1"));
        let header = track2.children[3].child("Header").unwrap();
        assert!(header.description.text.contains("Wrong Sector number"));
    }

    #[test]
    fn test_short_image_reports_every_track() {
        let data = build_track(0);
        let mut cursor = ByteCursor::new(&data);
        let disk = VzDisk::read(&mut cursor);
        assert_eq!(disk.tracks().len(), 40);
        assert!(disk.get_track(0).unwrap().is_valid());
        assert_eq!(disk.get_track(39).unwrap().sectors_with_errors().len(), 16);
    }
}
