/// Tape block reconstruction (`.vz` files and raw `.cvz` cassette captures)

/// Lead-in and lead-out framing
pub mod leader;
/// BASIC line chain and checksum
pub mod program;

pub use leader::{LeadIn, LeadOut};
pub use program::{BasicLine, BasicProgram, ProgramChecksum};

use crate::error::{Result, VzError};
use crate::format::constants::{
    FILE_TYPE_BASIC, FILE_TYPE_BINARY, LEAD_IN_FILL_LEN, LEAD_IN_SYNC_LEN, LEAD_OUT_LEN,
    TAPE_NAME_MAX, VZF0_SIGNATURE, VZFO_SIGNATURE, VZ_NAME_FIELD_SIZE, Z88DK_SIGNATURE,
};
use crate::io::ByteCursor;
use crate::report::{hex_sequence, Description, Report};
use crate::vz_basic::Escape;
use log::{debug, warn};
use std::fmt;

/// Container layout of a tape block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeLayout {
    /// `.vz` file: signature, 17 byte name field, type, start address
    VzFile,
    /// Raw cassette capture: lead-in, type, terminated name, addresses, checksum, lead-out
    Cassette,
}

impl TapeLayout {
    /// How `<` and `>` in BASIC text are rendered by default
    pub fn default_escape(&self) -> Escape {
        match self {
            TapeLayout::VzFile => Escape::Plain,
            TapeLayout::Cassette => Escape::Markup,
        }
    }
}

/// VZ file signature variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `VZF0`
    Standard,
    /// `VZFO`
    LetterO,
    /// `20 20 00 00`, written by z88dk
    Z88dk,
    /// Anything else
    Unknown([u8; 4]),
}

impl Signature {
    /// Classify four signature bytes
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        if &bytes == VZF0_SIGNATURE {
            Signature::Standard
        } else if &bytes == VZFO_SIGNATURE {
            Signature::LetterO
        } else if &bytes == Z88DK_SIGNATURE {
            Signature::Z88dk
        } else {
            Signature::Unknown(bytes)
        }
    }

    /// Accepted by the sniffer?
    pub fn is_known(&self) -> bool {
        !matches!(self, Signature::Unknown(_))
    }

    fn bytes(&self) -> [u8; 4] {
        match self {
            Signature::Standard => *VZF0_SIGNATURE,
            Signature::LetterO => *VZFO_SIGNATURE,
            Signature::Z88dk => *Z88DK_SIGNATURE,
            Signature::Unknown(b) => *b,
        }
    }
}

/// File type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// 0xF0
    Basic,
    /// 0xF1
    Binary,
    /// Anything else, handled as binary
    Unknown(u8),
}

impl From<u8> for FileType {
    fn from(value: u8) -> Self {
        match value {
            FILE_TYPE_BASIC => FileType::Basic,
            FILE_TYPE_BINARY => FileType::Binary,
            other => FileType::Unknown(other),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Basic => write!(f, "[F0] BASIC"),
            FileType::Binary => write!(f, "[F1] Binary"),
            FileType::Unknown(b) => write!(f, "[{:02X}] Unknown", b),
        }
    }
}

/// Program name as stored in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramName {
    /// Offset of the field
    pub offset: usize,
    /// Raw field bytes including any terminator and padding
    pub raw: Vec<u8>,
    /// Name text up to the terminator
    pub text: String,
    /// A 0x00 terminator was found
    pub terminated: bool,
}

impl ProgramName {
    fn from_field(offset: usize, raw: &[u8]) -> Self {
        let end = raw.iter().position(|&b| b == 0);
        let text = String::from_utf8_lossy(&raw[..end.unwrap_or(raw.len())]).to_string();
        Self {
            offset,
            raw: raw.to_vec(),
            text,
            terminated: end.is_some(),
        }
    }

    /// Number of name bytes before the terminator
    pub fn len(&self) -> usize {
        self.raw.iter().position(|&b| b == 0).unwrap_or(self.raw.len())
    }

    /// No name bytes at all?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Memory image loaded at an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    /// Load and start address
    pub load: u16,
    /// Offset of the first data byte
    pub offset: usize,
    /// Data bytes
    pub data: Vec<u8>,
}

/// Decoded tape block body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapeBody {
    /// Tokenized BASIC
    Basic(BasicProgram),
    /// Machine code or unknown content
    Binary(BinaryData),
}

/// Bytes the layout has no field for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trailing {
    /// Offset of the first byte
    pub offset: usize,
    /// The bytes
    pub bytes: Vec<u8>,
}

/// A decoded tape block
///
/// Fields are filled in file order. If the image ends early, everything
/// read so far is kept and `truncated` says where it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeBlock {
    /// Container layout
    pub layout: TapeLayout,
    /// Lead-in, if present
    pub lead_in: Option<LeadIn>,
    /// Signature (VZ files)
    pub signature: Option<Signature>,
    /// Program name
    pub name: Option<ProgramName>,
    /// File type byte
    pub file_type: Option<FileType>,
    /// Program body
    pub body: Option<TapeBody>,
    /// Lead-out (cassette)
    pub lead_out: Option<LeadOut>,
    /// Left-over bytes (VZ files)
    pub trailing: Option<Trailing>,
    /// Why decoding stopped early, if it did
    pub truncated: Option<String>,
}

impl TapeBlock {
    fn empty(layout: TapeLayout) -> Self {
        Self {
            layout,
            lead_in: None,
            signature: None,
            name: None,
            file_type: None,
            body: None,
            lead_out: None,
            trailing: None,
            truncated: None,
        }
    }

    /// Decode a tape block at the cursor
    ///
    /// Never fails; a truncated image yields a partially filled block.
    pub fn read(cursor: &mut ByteCursor<'_>, layout: TapeLayout) -> Self {
        let mut block = Self::empty(layout);
        let result = match layout {
            TapeLayout::VzFile => block.read_vz_file(cursor),
            TapeLayout::Cassette => block.read_cassette(cursor),
        };
        if let Err(e) = result {
            warn!("Tape block truncated: {}", e);
            block.truncated = Some(e.to_string());
        }
        block
    }

    fn read_vz_file(&mut self, cursor: &mut ByteCursor<'_>) -> Result<()> {
        self.lead_in = LeadIn::try_read(cursor);

        let sig = cursor.advance(4)?;
        self.signature = Some(Signature::from_bytes([sig[0], sig[1], sig[2], sig[3]]));

        let offset = cursor.position();
        let field = cursor.advance(VZ_NAME_FIELD_SIZE)?;
        self.name = Some(ProgramName::from_field(offset, field));

        let file_type = FileType::from(cursor.read_u8()?);
        self.file_type = Some(file_type);
        debug!("VZ file type {}", file_type);

        let load = cursor.read_u16_le()?;
        match file_type {
            FileType::Basic => {
                let mut program = BasicProgram::new(load);
                let result = program::walk_lines(cursor, &mut program);
                self.body = Some(TapeBody::Basic(program));
                result?;
                if !cursor.at_end() {
                    let offset = cursor.position();
                    self.trailing = Some(Trailing {
                        offset,
                        bytes: cursor.advance_to_end().to_vec(),
                    });
                }
            }
            _ => self.body = Some(TapeBody::Binary(read_binary(cursor, load))),
        }
        Ok(())
    }

    fn read_cassette(&mut self, cursor: &mut ByteCursor<'_>) -> Result<()> {
        self.lead_in = Some(LeadIn::read(cursor)?);

        let file_type = FileType::from(cursor.read_u8()?);
        self.file_type = Some(file_type);
        debug!("Cassette file type {}", file_type);

        let offset = cursor.position();
        let field = cursor.advance_until(0);
        let name = ProgramName::from_field(offset, field);
        let terminated = name.terminated;
        self.name = Some(name);
        if !terminated {
            return Err(VzError::truncated(offset, field.len() + 1, field.len()));
        }

        let load = cursor.read_u16_le()?;
        match file_type {
            FileType::Basic => {
                let mut program = BasicProgram::new(load);
                let result = read_cassette_basic(cursor, &mut program);
                self.body = Some(TapeBody::Basic(program));
                result?;
                self.lead_out = Some(LeadOut::read(cursor));
            }
            _ => self.body = Some(TapeBody::Binary(read_binary(cursor, load))),
        }
        Ok(())
    }

    /// BASIC program, if this block holds one
    pub fn program(&self) -> Option<&BasicProgram> {
        match &self.body {
            Some(TapeBody::Basic(p)) => Some(p),
            _ => None,
        }
    }

    /// Binary payload, if this block holds one
    pub fn binary(&self) -> Option<&BinaryData> {
        match &self.body {
            Some(TapeBody::Binary(b)) => Some(b),
            _ => None,
        }
    }

    /// Emit the block into a report, rendering BASIC with the layout's escaping
    pub fn report(&self, report: &mut Report) {
        self.report_with(report, self.layout.default_escape());
    }

    /// Emit the block into a report
    pub fn report_with(&self, report: &mut Report, escape: Escape) {
        if let Some(lead_in) = &self.lead_in {
            report_lead_in(report, lead_in);
        }
        if let Some(signature) = &self.signature {
            report_signature(report, signature);
        }
        match self.layout {
            TapeLayout::VzFile => {
                self.report_name(report);
                self.report_type(report);
            }
            TapeLayout::Cassette => {
                self.report_type(report);
                self.report_name(report);
            }
        }
        match &self.body {
            Some(TapeBody::Basic(program)) => report_program(report, program, escape),
            Some(TapeBody::Binary(binary)) => {
                report.field(
                    "Load Addr",
                    format!("0x{:04X}", binary.load),
                    Description::info("Address to load following code. Start of execution"),
                );
                report.dump(
                    "Code",
                    format!("{} bytes", binary.data.len()),
                    Description::info("Memory dump"),
                    binary.offset,
                    &binary.data,
                );
            }
            None => {}
        }
        if let Some(lead_out) = &self.lead_out {
            report_lead_out(report, lead_out);
        }
        if let Some(trailing) = &self.trailing {
            report.dump(
                "Trailing",
                format!("{} bytes", trailing.bytes.len()),
                Description::info("Data after the end of the BASIC program"),
                trailing.offset,
                &trailing.bytes,
            );
        }
        if let Some(e) = &self.truncated {
            report.field("Truncated", "", Description::warning(e.clone()));
        }
    }

    fn report_name(&self, report: &mut Report) {
        let Some(name) = &self.name else { return };
        let mut description = Description::info("Internal program name");
        if !name.terminated {
            description = description.with_warning("(missing terminator)");
        } else if name.len() > TAPE_NAME_MAX {
            description = description.with_warning(format!("(longer than {} characters)", TAPE_NAME_MAX));
        }
        report.dump(
            "Program Name",
            format!("\"{}\"", name.text),
            description,
            name.offset,
            &name.raw,
        );
    }

    fn report_type(&self, report: &mut Report) {
        let Some(file_type) = self.file_type else { return };
        let description = match file_type {
            FileType::Basic => Description::info("BASIC program (could be a launcher for binary code)"),
            FileType::Binary => Description::info("Binary code to execute"),
            FileType::Unknown(_) => {
                Description::warning("Unknown. Could be an internal format for a specific program")
            }
        };
        report.field("Type", file_type.to_string(), description);
    }
}

fn read_binary(cursor: &mut ByteCursor<'_>, load: u16) -> BinaryData {
    let offset = cursor.position();
    BinaryData {
        load,
        offset,
        data: cursor.advance_to_end().to_vec(),
    }
}

/// End address, checksum over the data, line chain, stored checksum
fn read_cassette_basic(cursor: &mut ByteCursor<'_>, program: &mut BasicProgram) -> Result<()> {
    let end = cursor.read_u16_le()?;
    program.end = Some(end);
    if end < program.load {
        warn!("End address 0x{:04X} below load address 0x{:04X}", end, program.load);
    }

    let computed = program::compute_checksum(cursor, program.load, end);
    program::walk_lines(cursor, program)?;

    let stored = cursor.read_u16_le()?;
    program.checksum = Some(ProgramChecksum { computed, stored });
    Ok(())
}

fn report_lead_in(report: &mut Report, lead_in: &LeadIn) {
    report.group("Lead In", |r| {
        let fill_count = lead_in.fill_count();
        let mut fill = Description::info(format!("Tape lead in ({} x 0x80)", LEAD_IN_FILL_LEN));
        if fill_count != LEAD_IN_FILL_LEN {
            fill = fill.with_warning(format!("(found {} x 0x80)", fill_count));
        }
        r.dump(
            "Lead In",
            format!("{} x 80", fill_count),
            fill,
            lead_in.offset,
            lead_in.fill(),
        );

        let sync_count = lead_in.sync_count();
        let mut sync = Description::info(format!("Tape lead in ({} x 0xFE)", LEAD_IN_SYNC_LEN));
        if sync_count != LEAD_IN_SYNC_LEN {
            sync = sync.with_warning(format!("(found {} x 0xFE)", sync_count));
        }
        r.dump(
            "Lead In",
            format!("{} x FE", sync_count),
            sync,
            lead_in.offset + LEAD_IN_FILL_LEN,
            lead_in.sync(),
        );

        let mut description = Description::info("Tape lead in header");
        if !lead_in.is_valid() {
            description = description.with_warning("(unexpected lead in bytes)");
        }
        ("80.. FE..".to_string(), description)
    });
}

fn report_signature(report: &mut Report, signature: &Signature) {
    let (value, description) = match signature {
        Signature::Standard => (
            "VZF0".to_string(),
            Description::info("Standard VZF0 file description header"),
        ),
        Signature::LetterO => (
            "VZFO".to_string(),
            Description::warning("Nonstandard VZ file description header"),
        ),
        Signature::Z88dk => (
            hex_sequence(&signature.bytes()),
            Description::warning("Nonstandard VZ file description header (z88dk)"),
        ),
        Signature::Unknown(bytes) => (
            hex_sequence(bytes),
            Description::warning("Unrecognized VZ file description header"),
        ),
    };
    report.field("VZF0 id", value, description);
}

fn report_program(report: &mut Report, program: &BasicProgram, escape: Escape) {
    report.field(
        "Load Addr",
        format!("0x{:04X}", program.load),
        Description::info("Address to load BASIC bytes. Start of BASIC lines"),
    );
    if let Some(end) = program.end {
        let mut description = Description::info("End of program data");
        if end < program.load {
            description = description.with_warning("(below load address)");
        }
        report.field("End Addr", format!("0x{:04X}", end), description);
    }

    for line in &program.lines {
        report.group(format!("0x{:04X}", line.address), |r| {
            r.field(
                "Next Addr",
                format!("0x{:04X}", line.next),
                Description::info("Address of next BASIC line data"),
            );
            r.field("Line No", line.number.to_string(), Description::info("BASIC line number"));
            r.field("Line Data", "Bytes", Description::info(hex_sequence(&line.tokens)));
            r.field(
                "Terminator",
                line.terminator.to_string(),
                Description::info("Line terminator"),
            );
            (line.address.to_string(), Description::info(line.render(escape)))
        });
    }

    if let Some(address) = program.end_of_program {
        report.group(format!("0x{:04X}", address), |r| {
            r.field(
                "Next Addr",
                "0x0000",
                Description::info("Address of next BASIC line data"),
            );
            (address.to_string(), Description::info("End of BASIC Program"))
        });
    }

    if let Some(checksum) = &program.checksum {
        let mut description = Description::info("CRC of Program data");
        if !checksum.is_valid() {
            description = description.with_warning(format!("(expected 0x{:04X})", checksum.computed));
        }
        report.field("Program CRC", format!("0x{:04X}", checksum.stored), description);
    }
}

fn report_lead_out(report: &mut Report, lead_out: &LeadOut) {
    let mut description = Description::info(format!("Tape lead out ({} x 0x00)", LEAD_OUT_LEN));
    if !lead_out.length_valid() {
        description = description.with_warning(format!(
            "(expected {} bytes but {} found)",
            LEAD_OUT_LEN,
            lead_out.bytes.len()
        ));
    }
    if !lead_out.content_valid() {
        description = description.with_warning("(non-zero bytes)");
    }
    report.dump(
        "Lead Out",
        "00..",
        description,
        lead_out.offset,
        &lead_out.bytes,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::leader::tests::lead_in;
    use crate::tape::program::tests::build_chain;

    fn name_field(name: &[u8]) -> Vec<u8> {
        let mut field = name.to_vec();
        field.resize(VZ_NAME_FIELD_SIZE, 0);
        field
    }

    fn vz_binary() -> Vec<u8> {
        let mut data = lead_in();
        data.extend(b"VZF0");
        data.extend(name_field(b"TEST"));
        data.push(0xF1);
        data.extend([0x00, 0x70]);
        data.extend(1u8..=10);
        data
    }

    fn cassette_basic(lines: &[(u16, &[u8])]) -> Vec<u8> {
        let load = 0x7AE9u16;
        let chain = build_chain(load, lines);
        let end = load + chain.len() as u16;

        let mut data = lead_in();
        data.push(0xF0);
        data.extend(b"HELLO\0");
        data.extend(load.to_le_bytes());
        data.extend(end.to_le_bytes());
        let checksum = program::compute_checksum(&ByteCursor::new(&chain), load, end);
        data.extend(&chain);
        data.extend(checksum.to_le_bytes());
        data.extend([0u8; 20]);
        data
    }

    #[test]
    fn test_vz_binary_end_to_end() {
        let data = vz_binary();
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::VzFile);
        assert!(block.truncated.is_none());
        assert_eq!(block.signature, Some(Signature::Standard));
        assert_eq!(block.name.as_ref().unwrap().text, "TEST");
        assert_eq!(block.file_type, Some(FileType::Binary));
        let binary = block.binary().unwrap();
        assert_eq!(binary.load, 0x7000);
        assert_eq!(binary.data.len(), 10);

        let mut report = Report::new();
        block.report(&mut report);
        assert!(report.warnings().is_empty());
        assert_eq!(report.find("VZF0 id").unwrap().value, "VZF0");
        assert_eq!(report.find("Program Name").unwrap().value, "\"TEST\"");
        assert_eq!(report.find("Type").unwrap().value, "[F1] Binary");
        assert_eq!(report.find("Load Addr").unwrap().value, "0x7000");
        assert_eq!(report.find("Code").unwrap().dump.as_ref().unwrap().bytes.len(), 10);
    }

    #[test]
    fn test_vz_without_lead_in() {
        let data = vz_binary()[260..].to_vec();
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::VzFile);
        assert!(block.lead_in.is_none());
        assert_eq!(block.binary().unwrap().data.len(), 10);
    }

    #[test]
    fn test_vz_nonstandard_signature_warns() {
        let mut data = vz_binary()[260..].to_vec();
        data[3] = b'O';
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::VzFile);
        assert_eq!(block.signature, Some(Signature::LetterO));
        let mut report = Report::new();
        block.report(&mut report);
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn test_unknown_type_warns() {
        let mut data = vz_binary();
        data[260 + 4 + 17] = 0xF5;
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::VzFile);
        assert_eq!(block.file_type, Some(FileType::Unknown(0xF5)));
        assert_eq!(block.binary().unwrap().load, 0x7000);
        let mut report = Report::new();
        block.report(&mut report);
        assert_eq!(report.find("Type").unwrap().value, "[F5] Unknown");
        assert!(report.find("Type").unwrap().description.is_warning());
    }

    #[test]
    fn test_vz_basic_with_trailing() {
        let mut data = b"VZF0".to_vec();
        data.extend(name_field(b"PROG"));
        data.push(0xF0);
        data.extend(0x7AE9u16.to_le_bytes());
        data.extend(build_chain(0x7AE9, &[(10, &[0xB2])]));
        data.extend([0xAA, 0xBB]);
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::VzFile);
        let program = block.program().unwrap();
        assert_eq!(program.lines.len(), 1);
        assert!(program.checksum.is_none());
        assert_eq!(block.trailing.as_ref().unwrap().bytes, vec![0xAA, 0xBB]);
    }

    #[test]
    fn test_cassette_basic_clean() {
        let data = cassette_basic(&[(10, &[0xB2, b'"', b'<', b'"']), (20, &[0x80])]);
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::Cassette);
        assert!(block.truncated.is_none());
        assert_eq!(block.name.as_ref().unwrap().text, "HELLO");
        let program = block.program().unwrap();
        assert_eq!(program.lines.len(), 2);
        assert!(program.checksum.unwrap().is_valid());
        assert!(block.lead_out.as_ref().unwrap().length_valid());

        let mut report = Report::new();
        block.report(&mut report);
        assert!(report.warnings().is_empty());
        // Cassette listings escape markup characters
        let first = report.find("0x7AE9").unwrap();
        assert_eq!(first.description.text, "10 PRINT\"&lt;\"");
        assert_eq!(report.rows()[1].label, "Type");
        assert_eq!(report.rows()[2].label, "Program Name");
    }

    #[test]
    fn test_cassette_checksum_mismatch_is_warning() {
        let mut data = cassette_basic(&[(10, &[0xB2])]);
        let crc_at = data.len() - 22;
        data[crc_at] ^= 0xFF;
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::Cassette);
        assert!(block.truncated.is_none());
        assert!(!block.program().unwrap().checksum.unwrap().is_valid());
        assert!(block.lead_out.is_some());

        let mut report = Report::new();
        block.report(&mut report);
        let crc = report.find("Program CRC").unwrap();
        assert!(crc.description.is_warning());
    }

    #[test]
    fn test_cassette_lead_out_drift() {
        let mut data = cassette_basic(&[(10, &[0xB2])]);
        data.truncate(data.len() - 5);
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::Cassette);
        let mut report = Report::new();
        block.report(&mut report);
        let lead_out = report.find("Lead Out").unwrap();
        assert!(lead_out.description.text.contains("expected 20 bytes but 15 found"));
    }

    #[test]
    fn test_cassette_truncated_chain() {
        let data = cassette_basic(&[(10, &[0xB2]), (20, &[0x80]), (30, &[0x80])]);
        // Cut inside the third line
        let cut = &data[..260 + 1 + 6 + 4 + 6 + 6 + 3];
        let block = TapeBlock::read(&mut ByteCursor::new(cut), TapeLayout::Cassette);
        assert!(block.truncated.as_ref().unwrap().starts_with("Truncated read"));
        assert_eq!(block.program().unwrap().lines.len(), 2);
        assert!(block.lead_out.is_none());

        let mut report = Report::new();
        block.report(&mut report);
        assert!(report.find("Truncated").unwrap().description.is_warning());
        assert!(report.find("0x7AEF").is_some());
    }

    #[test]
    fn test_name_length_counts_raw_bytes() {
        // 16 high bytes decode to replacement characters but are one byte each
        let mut data = lead_in();
        data.push(0xF1);
        data.extend([0xC1; TAPE_NAME_MAX]);
        data.push(0);
        data.extend([0x00, 0x70, 0xC9]);
        let block = TapeBlock::read(&mut ByteCursor::new(&data), TapeLayout::Cassette);
        let name = block.name.as_ref().unwrap();
        assert_eq!(name.len(), TAPE_NAME_MAX);
        assert!(name.text.len() > TAPE_NAME_MAX);

        let mut report = Report::new();
        block.report(&mut report);
        assert!(!report.find("Program Name").unwrap().description.is_warning());

        let mut long = lead_in();
        long.push(0xF1);
        long.extend([b'A'; TAPE_NAME_MAX + 1]);
        long.push(0);
        long.extend([0x00, 0x70]);
        let block = TapeBlock::read(&mut ByteCursor::new(&long), TapeLayout::Cassette);
        let mut report = Report::new();
        block.report(&mut report);
        assert!(report.find("Program Name").unwrap().description.is_warning());
    }
}
