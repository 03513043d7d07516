/// Integration tests for vzimage

use proptest::prelude::*;
use vzimage::format::{additive_checksum, header_checksum, IDAM_IN, IDAM_OUT, INTERLEAVE};
use vzimage::*;

fn sector_bytes(track: u8, sector: u8, payload: &[u8; 128]) -> Vec<u8> {
    let mut s = vec![0x80; 7];
    s.push(0x00);
    s.extend_from_slice(&IDAM_IN);
    s.extend([track, sector, header_checksum(track, sector)]);
    s.extend([0x80; 7]);
    s.push(0x00);
    s.extend_from_slice(&IDAM_OUT);
    s.extend_from_slice(payload);
    s.extend(additive_checksum(payload).to_le_bytes());
    s
}

/// 40 tracks, every payload filled with its track number
fn disk_image() -> Vec<u8> {
    let mut data = Vec::new();
    for t in 0..40u8 {
        for &id in INTERLEAVE.iter() {
            let mut payload = [t; 128];
            if t == 0 {
                // Keep the VZ-DOS directory empty
                payload = [0; 128];
            }
            data.extend(sector_bytes(t, id, &payload));
        }
        data.extend([0u8; 16]);
    }
    data
}

fn vz_binary() -> Vec<u8> {
    let mut data = vec![0x80; 255];
    data.extend([0xFE; 5]);
    data.extend(b"VZF0");
    let mut name = b"TEST".to_vec();
    name.resize(17, 0);
    data.extend(name);
    data.push(0xF1);
    data.extend([0x00, 0x70]);
    data.extend([0x3E, 0x01, 0xD3, 0x20, 0x00, 0x00, 0xC3, 0x00, 0x70, 0xC9]);
    data
}

fn vz_basic(lines: &[(u16, &[u8])]) -> Vec<u8> {
    let load = 0x7AE9u16;
    let mut data = b"VZF0".to_vec();
    let mut name = b"HELLO".to_vec();
    name.resize(17, 0);
    data.extend(name);
    data.push(0xF0);
    data.extend(load.to_le_bytes());
    let mut address = load;
    for (number, tokens) in lines {
        address += 4 + tokens.len() as u16 + 1;
        data.extend(address.to_le_bytes());
        data.extend(number.to_le_bytes());
        data.extend_from_slice(tokens);
        data.push(0);
    }
    data.extend([0, 0]);
    data
}

#[test]
fn test_end_to_end_binary_vz() {
    let image = VzImage::from_bytes("test.vz", vz_binary()).expect("Failed to detect format");
    assert_eq!(image.format(), Format::VzFile);

    let report = image.report();
    assert!(report.warnings().is_empty(), "unexpected warnings:\n{}", report);
    assert_eq!(report.find("VZF0 id").unwrap().value, "VZF0");
    assert_eq!(report.find("Program Name").unwrap().value, "\"TEST\"");
    assert_eq!(report.find("Type").unwrap().value, "[F1] Binary");
    assert_eq!(report.find("Load Addr").unwrap().value, "0x7000");
    let code = report.find("Code").unwrap();
    assert_eq!(code.dump.as_ref().unwrap().bytes.len(), 10);

    // Load address comes before the dump
    let labels: Vec<&str> = report.rows().iter().map(|r| r.label.as_str()).collect();
    let load = labels.iter().position(|l| *l == "Load Addr").unwrap();
    let dump = labels.iter().position(|l| *l == "Code").unwrap();
    assert!(load < dump);
}

#[test]
fn test_decode_is_idempotent() {
    for (name, data) in [
        ("test.vz", vz_binary()),
        ("disk.dsk", disk_image()),
        ("prog.vz", vz_basic(&[(10, &[0xB2, b'"', b'H', b'I'])])),
    ] {
        let format = Format::detect(name, &data).unwrap();
        let first = format.decode(&mut ByteCursor::new(&data)).report().render();
        let second = format.decode(&mut ByteCursor::new(&data)).report().render();
        assert_eq!(first, second);
    }
}

#[test]
fn test_disk_round_trip() {
    let image = VzImage::from_bytes("disk.DVZ", disk_image()).unwrap();
    assert_eq!(image.format(), Format::Disk);
    let decoded = image.decode();
    let disk = decoded.disk().unwrap();
    assert_eq!(disk.error_count(), 0);
    assert_eq!(disk.get_sector(5, 1).unwrap().payload, vec![5u8; 128]);
    assert!(decoded.report().warnings().is_empty());
}

#[test]
fn test_disk_interleave_mismatch() {
    let mut data = disk_image();
    // Track 7, logical index 3 should be sector 1; claim sector 2 instead
    let sector_len = 27 + 128 + 2;
    let track_len = 16 * sector_len + 16;
    let at = 7 * track_len + 3 * sector_len;
    data[at + 13] = 2;
    data[at + 14] = header_checksum(7, 2);

    let decoded = Format::Disk.decode(&mut ByteCursor::new(&data));
    let disk = decoded.disk().unwrap();
    assert_eq!(disk.get_track(7).unwrap().sectors_with_errors(), vec![1]);
    let frame = disk.get_track(7).unwrap().sectors[3].frame().unwrap();
    assert_eq!(
        frame.issues,
        vec![SectorIssue::WrongSector {
            expected: 1,
            found: 2
        }]
    );

    let report = decoded.report();
    assert_eq!(report.warnings().iter().filter(|r| r.label == "Track").count(), 1);
}

#[test]
fn test_disk_payload_checksum_off_by_one() {
    let mut data = disk_image();
    let sector_len = 27 + 128 + 2;
    let track_len = 16 * sector_len + 16;
    let at = 3 * track_len + sector_len - 2;
    data[at] = data[at].wrapping_add(1);

    let decoded = Format::Disk.decode(&mut ByteCursor::new(&data));
    let frame = decoded.disk().unwrap().get_sector(3, 0).unwrap();
    assert_eq!(
        frame.issues,
        vec![SectorIssue::WrongCrc {
            expected: 0x0180,
            found: 0x0181
        }]
    );
    assert_eq!(frame.issues[0].to_string(), "Wrong CRC");
}

#[test]
fn test_truncated_disk_visits_every_track() {
    let data = disk_image();
    let cut = &data[..data.len() / 3];
    let decoded = Format::Disk.decode(&mut ByteCursor::new(cut));
    let disk = decoded.disk().unwrap();
    assert_eq!(disk.tracks().len(), 40);
    assert!(disk.get_track(0).unwrap().is_valid());
    assert_eq!(disk.get_track(39).unwrap().sectors.len(), 16);
    assert!(!disk.get_track(39).unwrap().is_valid());
}

#[test]
fn test_basic_chain_single_line() {
    let data = vz_basic(&[(10, &[0xB2, b'"', b'H', b'E', b'L', b'L', b'O'])]);
    let image = VzImage::from_bytes("prog.vz", data).unwrap();
    let decoded = image.decode();
    let block = decoded.tape().unwrap();
    assert!(block.truncated.is_none());
    let program = block.program().unwrap();
    assert_eq!(program.lines.len(), 1);
    assert_eq!(program.lines[0].number, 10);
    assert_eq!(program.lines[0].next, 0x7AF5);
    assert_eq!(program.end_of_program, Some(0x7AF5));
    assert_eq!(program.listing(Escape::Plain), "10 PRINT\"HELLO\n");
}

#[test]
fn test_basic_chain_truncated() {
    let mut data = vz_basic(&[(10, &[0x80]), (20, &[0x80])]);
    data.truncate(data.len() - 2);
    let image = VzImage::from_bytes("prog.vz", data).unwrap();
    let decoded = image.decode();
    let block = decoded.tape().unwrap();
    assert!(block.truncated.is_some());
    assert_eq!(block.program().unwrap().lines.len(), 2);

    let report = decoded.report();
    assert!(report.find("Truncated").unwrap().description.is_warning());
}

#[test]
fn test_detokenizer_mapping() {
    assert_eq!(detokenize_line(&[0xB2, 0x41], 10, Escape::Plain), "10 PRINTA");
    assert_eq!(detokenize_line(&[0x22, 0x22], 1, Escape::Plain), "1 \"\"");
    assert_eq!(detokenize_line(&[0xFE], 1, Escape::Plain), "1 {254}");
    assert_eq!(detokenize(&[0xB2]), vec![Glyph::Keyword("PRINT")]);
}

proptest! {
    #[test]
    fn prop_detokenize_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let glyphs = detokenize(&data);
        prop_assert_eq!(glyphs.len(), data.len());
        let _ = vzimage::vz_basic::render(&glyphs, Escape::Markup);
    }

    #[test]
    fn prop_tape_decode_is_total(data in proptest::collection::vec(any::<u8>(), 0..600), cassette in any::<bool>()) {
        let format = if cassette { Format::Cassette } else { Format::VzFile };
        let first = format.decode(&mut ByteCursor::new(&data)).report().render();
        let second = format.decode(&mut ByteCursor::new(&data)).report().render();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_disk_decode_is_total(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let decoded = Format::Disk.decode(&mut ByteCursor::new(&data));
        prop_assert_eq!(decoded.disk().unwrap().tracks().len(), 40);
    }
}
