/// Z80 disassembly of binary tape bodies and extracted files

use dez80::Instruction;
use std::fmt;

/// One disassembled instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassembledLine {
    /// Address of the first byte
    pub address: u16,
    /// Instruction bytes
    pub bytes: Vec<u8>,
    /// Mnemonic and operands
    pub text: String,
}

impl fmt::Display for DisassembledLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        write!(f, "{:04X}  {:<12} {}", self.address, bytes.join(" "), self.text)
    }
}

/// Disassemble `data` as if loaded at `origin`
///
/// Bytes that do not decode are emitted as `DB` one at a time.
pub fn disassemble(data: &[u8], origin: u16) -> Vec<DisassembledLine> {
    let mut lines = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let address = origin.wrapping_add(pos as u16);
        let mut rest = &data[pos..];
        let before = rest.len();

        let (len, text) = match Instruction::decode_one(&mut rest) {
            Ok(instruction) => ((before - rest.len()).max(1), instruction.to_string()),
            Err(_) => (1, format!("DB {:02X}h", data[pos])),
        };
        let len = len.min(data.len() - pos);

        lines.push(DisassembledLine {
            address,
            bytes: data[pos..pos + len].to_vec(),
            text,
        });
        pos += len;
    }

    lines
}
