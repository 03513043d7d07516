/// Tokenized BASIC program stored in a tape block
///
/// Lines are stored as a linked list in memory order:
///
/// ```text
/// next   2 bytes, little-endian address of the next line (0 ends the program)
/// line   2 bytes, little-endian line number
/// text   tokenized bytes
/// 0x00   terminator
/// ```

use crate::error::{Result, VzError};
use crate::format::constants::additive_checksum;
use crate::io::ByteCursor;
use crate::vz_basic::{detokenize, render, Escape, Glyph};
use std::fmt;

/// One decoded BASIC line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLine {
    /// Memory address the line was saved from
    pub address: u16,
    /// Address of the following line
    pub next: u16,
    /// Line number
    pub number: u16,
    /// Tokenized body without the terminator
    pub tokens: Vec<u8>,
    /// Terminator byte (always 0x00)
    pub terminator: u8,
    /// Decoded body
    pub text: Vec<Glyph>,
}

impl BasicLine {
    /// Render the line as `<number> <text>`
    pub fn render(&self, escape: Escape) -> String {
        format!("{} {}", self.number, render(&self.text, escape))
    }
}

impl fmt::Display for BasicLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Escape::Plain))
    }
}

/// Stored program checksum against the recomputed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramChecksum {
    /// Address bytes plus the `[load, end)` data, mod 65536
    pub computed: u16,
    /// Value stored after the program
    pub stored: u16,
}

impl ProgramChecksum {
    /// Do the two agree?
    pub fn is_valid(&self) -> bool {
        self.computed == self.stored
    }
}

/// A BASIC program body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasicProgram {
    /// Load address (start of the first line)
    pub load: u16,
    /// End address, cassette blocks only
    pub end: Option<u16>,
    /// Decoded lines in chain order
    pub lines: Vec<BasicLine>,
    /// Address holding the zero `next` link, once reached
    pub end_of_program: Option<u16>,
    /// Checksum, cassette blocks only
    pub checksum: Option<ProgramChecksum>,
}

impl BasicProgram {
    /// Create an empty program loaded at `load`
    pub fn new(load: u16) -> Self {
        Self {
            load,
            ..Default::default()
        }
    }

    /// Reached the zero link cleanly?
    pub fn is_complete(&self) -> bool {
        self.end_of_program.is_some()
    }

    /// Full listing, one line per row
    pub fn listing(&self, escape: Escape) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.render(escape));
            out.push('\n');
        }
        out
    }
}

/// Checksum seed and data sum for a cassette program
///
/// The data range is only looked at; the cursor does not move since the
/// same bytes are read again while walking the lines.
pub fn compute_checksum(cursor: &ByteCursor<'_>, load: u16, end: u16) -> u16 {
    let seed = [load, end]
        .iter()
        .flat_map(|a| a.to_le_bytes())
        .fold(0u16, |sum, b| sum.wrapping_add(b as u16));
    let len = end.saturating_sub(load) as usize;
    seed.wrapping_add(additive_checksum(cursor.peek(len)))
}

/// Walk the line chain from `program.load`
///
/// Lines already decoded stay in `program` if the image ends early.
pub fn walk_lines(cursor: &mut ByteCursor<'_>, program: &mut BasicProgram) -> Result<()> {
    let mut address = program.load;

    while address != 0 {
        let next = cursor.read_u16_le()?;
        if next == 0 {
            program.end_of_program = Some(address);
            return Ok(());
        }
        let number = cursor.read_u16_le()?;

        let start = cursor.position();
        let body = cursor.advance_until(0);
        let Some((&terminator, tokens)) = body.split_last().filter(|&(&t, _)| t == 0) else {
            return Err(VzError::truncated(start, body.len() + 1, body.len()));
        };

        program.lines.push(BasicLine {
            address,
            next,
            number,
            tokens: tokens.to_vec(),
            terminator,
            text: detokenize(tokens),
        });
        address = next;
    }

    Ok(())
}
