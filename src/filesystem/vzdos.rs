/// VZ-DOS filesystem implementation
///
/// Track 0, sectors 0 to 14 hold the directory (8 entries of 16 bytes per
/// sector, 112 entries at most). Track 0 sector 15 holds the track map,
/// one bit per sector in use. File sectors carry 126 data bytes followed
/// by the track and sector of the next sector in the file.

use crate::error::{Result, VzError};
use crate::filesystem::{DirEntry, FileKind, FileSystem, FileSystemInfo};
use crate::format::constants::{SECTORS_PER_TRACK, TRACKS_PER_DISK};
use crate::image::VzDisk;
use crate::report::{Description, Report};
use log::warn;
use std::collections::HashSet;

/// Directory entry size in bytes
const DIR_ENTRY_SIZE: usize = 16;
/// Sector ids holding the directory
const DIR_SECTORS: std::ops::Range<u8> = 0..15;
/// Sector id holding the track map
const TRACK_MAP_SECTOR: u8 = 15;
/// Track map bytes in use (40 tracks x 16 sectors / 8)
const TRACK_MAP_SIZE: usize = (TRACKS_PER_DISK as usize * SECTORS_PER_TRACK) / 8;
/// Data bytes per file sector
const FILE_DATA_PER_SECTOR: usize = 126;
/// Name field length
const NAME_LEN: usize = 8;

/// VZ-DOS on a decoded disk
#[derive(Debug)]
pub struct VzDosFileSystem<'a> {
    disk: &'a VzDisk,
}

impl<'a> VzDosFileSystem<'a> {
    /// Mount the filesystem (read-only)
    pub fn new(disk: &'a VzDisk) -> Result<Self> {
        if disk.get_sector(0, 0).is_none() {
            return Err(VzError::filesystem("Directory sector (track 0, sector 0) not readable"));
        }
        Ok(Self { disk })
    }

    /// Number of sectors marked in use in the track map
    pub fn used_sectors(&self) -> usize {
        self.disk
            .get_sector(0, TRACK_MAP_SECTOR)
            .map(|s| {
                s.payload
                    .iter()
                    .take(TRACK_MAP_SIZE)
                    .map(|b| b.count_ones() as usize)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Emit the directory listing into a report
    pub fn report(&self, report: &mut Report) {
        report.group("Directory", |r| match self.read_dir() {
            Ok(entries) => {
                for entry in &entries {
                    r.field(
                        entry.name.clone(),
                        entry.kind.to_string(),
                        Description::info(format!(
                            "T:{} S:{} 0x{:04X}-0x{:04X} ({} bytes)",
                            entry.start_track,
                            entry.start_sector,
                            entry.start_addr,
                            entry.end_addr,
                            entry.size()
                        )),
                    );
                }
                (
                    format!("{} files", entries.len()),
                    Description::info(format!("VZ-DOS, {} sectors used", self.used_sectors())),
                )
            }
            Err(e) => (String::new(), Description::warning(e.to_string())),
        });
    }
}

impl FileSystem for VzDosFileSystem<'_> {
    fn read_dir(&self) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for id in DIR_SECTORS {
            let Some(sector) = self.disk.get_sector(0, id) else {
                warn!("Directory sector {} missing", id);
                continue;
            };
            for raw in sector.payload.chunks_exact(DIR_ENTRY_SIZE) {
                // A zero type byte ends the directory
                if raw[0] == 0 {
                    return Ok(entries);
                }
                entries.push(parse_dir_entry(entries.len(), raw));
            }
        }

        Ok(entries)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .read_dir()?
            .into_iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| VzError::FileNotFound(name.to_string()))?;

        let mut remaining = entry.size();
        let mut data = Vec::with_capacity(remaining);
        let mut visited = HashSet::new();
        let (mut track, mut sector) = (entry.start_track, entry.start_sector);

        while remaining > 0 {
            if track >= TRACKS_PER_DISK || sector as usize >= SECTORS_PER_TRACK || !visited.insert((track, sector)) {
                return Err(VzError::BrokenChain { track, sector });
            }
            let frame = self
                .disk
                .get_sector(track, sector)
                .ok_or(VzError::InvalidSector { track, sector })?;

            let take = remaining.min(FILE_DATA_PER_SECTOR);
            data.extend_from_slice(&frame.payload[..take]);
            remaining -= take;

            track = frame.payload[FILE_DATA_PER_SECTOR];
            sector = frame.payload[FILE_DATA_PER_SECTOR + 1];
        }

        Ok(data)
    }

    fn info(&self) -> FileSystemInfo {
        FileSystemInfo {
            fs_type: "VZ-DOS".to_string(),
            files: self.read_dir().map(|d| d.len()).unwrap_or(0),
            used_sectors: self.used_sectors(),
            total_sectors: TRACKS_PER_DISK as usize * SECTORS_PER_TRACK,
        }
    }
}

/// Parse a 16 byte entry: type, ':', name, start track/sector, start and end address
fn parse_dir_entry(index: usize, raw: &[u8]) -> DirEntry {
    let name = String::from_utf8_lossy(&raw[2..2 + NAME_LEN])
        .trim_end_matches(['\0', ' '])
        .to_string();
    DirEntry {
        index,
        name,
        kind: FileKind::from(raw[0]),
        start_track: raw[10],
        start_sector: raw[11],
        start_addr: u16::from_le_bytes([raw[12], raw[13]]),
        end_addr: u16::from_le_bytes([raw[14], raw[15]]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::constants::INTERLEAVE;
    use crate::image::sector::tests::build_sector;
    use crate::io::ByteCursor;

    fn dir_entry(kind: u8, name: &[u8], track: u8, sector: u8, start: u16, end: u16) -> [u8; 16] {
        let mut e = [b' '; 16];
        e[0] = kind;
        e[1] = b':';
        e[2..2 + name.len()].copy_from_slice(name);
        e[10] = track;
        e[11] = sector;
        e[12..14].copy_from_slice(&start.to_le_bytes());
        e[14..16].copy_from_slice(&end.to_le_bytes());
        e
    }

    /// Disk with one 200 byte binary file spread over track 1 sectors 0 and 1
    fn build_fs_disk() -> Vec<u8> {
        let mut data = Vec::new();
        for t in 0..TRACKS_PER_DISK {
            for &id in INTERLEAVE.iter() {
                let mut payload = [0u8; 128];
                match (t, id) {
                    (0, 0) => {
                        payload[..16].copy_from_slice(&dir_entry(b'B', b"GAME", 1, 0, 0x7000, 0x7000 + 200));
                        payload[16..32].copy_from_slice(&dir_entry(b'T', b"HELLO", 2, 0, 0x7AE9, 0x7AF0));
                    }
                    (0, 15) => {
                        payload[0] = 0b0000_0001;
                        payload[2] = 0b0000_0011;
                    }
                    (1, 0) => {
                        payload[..126].fill(0xAA);
                        payload[126] = 1;
                        payload[127] = 1;
                    }
                    (1, 1) => payload[..126].fill(0xBB),
                    _ => {}
                }
                let sum = crate::format::constants::additive_checksum(&payload);
                data.extend(build_sector(t, id, &payload, sum));
            }
        }
        data
    }

    fn read_disk(data: &[u8]) -> VzDisk {
        VzDisk::read(&mut ByteCursor::new(data))
    }

    #[test]
    fn test_read_dir() {
        let data = build_fs_disk();
        let disk = read_disk(&data);
        let fs = VzDosFileSystem::new(&disk).unwrap();
        let entries = fs.read_dir().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "GAME");
        assert_eq!(entries[0].kind, FileKind::Binary);
        assert_eq!(entries[0].size(), 200);
        assert_eq!(entries[1].name, "HELLO");
        assert_eq!(entries[1].kind, FileKind::Basic);
        assert_eq!(entries[1].start_track, 2);
        assert_eq!(fs.used_sectors(), 3);
    }

    #[test]
    fn test_read_file_follows_links() {
        let data = build_fs_disk();
        let disk = read_disk(&data);
        let fs = VzDosFileSystem::new(&disk).unwrap();
        let file = fs.read_file("game").unwrap();
        assert_eq!(file.len(), 200);
        assert!(file[..126].iter().all(|&b| b == 0xAA));
        assert!(file[126..].iter().all(|&b| b == 0xBB));
    }

    #[test]
    fn test_missing_file() {
        let data = build_fs_disk();
        let disk = read_disk(&data);
        let fs = VzDosFileSystem::new(&disk).unwrap();
        assert!(matches!(fs.read_file("NOPE"), Err(VzError::FileNotFound(_))));
    }

    #[test]
    fn test_directory_report() {
        let data = build_fs_disk();
        let disk = read_disk(&data);
        let fs = VzDosFileSystem::new(&disk).unwrap();
        let mut report = Report::new();
        fs.report(&mut report);
        let dir = report.find("Directory").unwrap();
        assert_eq!(dir.value, "2 files");
        assert_eq!(dir.child("GAME").unwrap().value, "Binary");
    }
}
