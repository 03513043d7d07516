/// VZ200/VZ300 BASIC detokenizer (Microsoft Level II derived BASIC)

use std::fmt;

/// Keyword and operator text for tokens 0x80..=0xFB
pub const KEYWORDS: [&str; 124] = [
    "END", "FOR", "RESET", "SET", "CLS", "CMD", "RANDOM", "NEXT",
    "DATA", "INPUT", "DIM", "READ", "LET", "GOTO", "RUN", "IF",
    "RESTORE", "GOSUB", "RETURN", "REM", "STOP", "ELSE", "COPY", "COLOR",
    "VERIFY", "DEFINT", "DEFSNG", "DEFDBL", "CRUN", "MODE", "SOUND", "RESUME",
    "OUT", "ON", "OPEN", "FIELD", "GET", "PUT", "CLOSE", "LOAD",
    "MERGE", "NAME", "KILL", "LSET", "RSET", "SAVE", "SYSTEM", "LPRINT",
    "DEF", "POKE", "PRINT", "CONT", "LIST", "LLIST", "DELETE", "AUTO",
    "CLEAR", "CLOAD", "CSAVE", "NEW", "TAB(", "TO", "FN", "USING",
    "VARPTR", "USR", "ERL", "ERR", "STRING$", "INSTR", "POINT", "TIME$",
    "MEM", "INKEY$", "THEN", "NOT", "STEP", "+", "-", "*",
    "/", "^", "AND", "OR", ">", "=", "<", "SGN",
    "INT", "ABS", "FRE", "INP", "POS", "SQR", "RND", "LOG",
    "EXP", "COS", "SIN", "TAN", "ATN", "PEEK", "CVI", "CVS",
    "CVD", "EOF", "LOC", "LOF", "MKI$", "MKS$", "MKD$", "CINT",
    "CSNG", "CDBL", "FIX", "LEN", "STR$", "VAL", "ASC", "CHR$",
    "LEFT$", "RIGHT$", "MID$", "'",
];

/// First token byte
pub const FIRST_TOKEN: u8 = 0x80;
/// Last token byte with a keyword
pub const LAST_TOKEN: u8 = 0xFB;

/// Base of the private-use area the VZ character font is mapped into
const GLYPH_BASE: u32 = 0xE000;
/// Glyph used for byte 0x5F
const ALT_UNDERSCORE: char = '\u{E01F}';

/// One decoded unit of a BASIC line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Printable character
    Char(char),
    /// Keyword or operator token
    Keyword(&'static str),
    /// Control code below 0x20
    Control(u8),
    /// Token byte above 0xFB outside a string
    InvalidToken(u8),
    /// Block graphics character (0x80..0xBF inside a string)
    Semigraphic(u8),
    /// Reverse video character (0xC0..0xFF inside a string)
    Inverse(u8),
}

impl Glyph {
    /// Display character for graphic glyphs in the VZ font mapping
    pub fn font_char(&self) -> Option<char> {
        match *self {
            Glyph::Char(c) => Some(c),
            Glyph::Semigraphic(b) => char::from_u32(GLYPH_BASE + b as u32),
            Glyph::Inverse(b) => char::from_u32(GLYPH_BASE + (b & 0x7F) as u32),
            _ => None,
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Glyph::Keyword(k) => f.write_str(k),
            Glyph::Control(b) | Glyph::InvalidToken(b) => write!(f, "{{{}}}", b),
            other => match other.font_char() {
                Some(c) => write!(f, "{}", c),
                None => Ok(()),
            },
        }
    }
}

/// How `<` and `>` characters are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escape {
    /// Emit the raw characters
    #[default]
    Plain,
    /// Emit `&lt;` and `&gt;` so the text can be embedded in markup
    Markup,
}

/// Look up the keyword for a token byte
pub fn keyword(token: u8) -> Option<&'static str> {
    if (FIRST_TOKEN..=LAST_TOKEN).contains(&token) {
        Some(KEYWORDS[(token - FIRST_TOKEN) as usize])
    } else {
        None
    }
}

/// Decode tokenized line bytes into glyphs
///
/// The only state is whether we are inside a quoted string; tokens are
/// not expanded there and high bytes become graphics instead. Never fails:
/// bytes with no meaning degrade to a `{n}` marker.
pub fn detokenize(data: &[u8]) -> Vec<Glyph> {
    let mut in_string = false;
    let mut glyphs = Vec::with_capacity(data.len());

    for &byte in data {
        let glyph = match byte {
            0x00..=0x1F => Glyph::Control(byte),
            0x20..=0x5E => {
                if byte == b'"' {
                    in_string = !in_string;
                }
                Glyph::Char(byte as char)
            }
            0x5F => Glyph::Char(ALT_UNDERSCORE),
            // Lower case codes show as the upper case set
            0x60..=0x7F => Glyph::Char((byte - 0x40) as char),
            0x80..=0xBF if in_string => Glyph::Semigraphic(byte),
            0xC0..=0xFF if in_string => Glyph::Inverse(byte),
            _ => match keyword(byte) {
                Some(k) => Glyph::Keyword(k),
                None => Glyph::InvalidToken(byte),
            },
        };
        glyphs.push(glyph);
    }

    glyphs
}

/// Render glyphs to text
pub fn render(glyphs: &[Glyph], escape: Escape) -> String {
    let mut output = String::new();
    for glyph in glyphs {
        match (glyph, escape) {
            (Glyph::Char('<'), Escape::Markup) => output.push_str("&lt;"),
            (Glyph::Char('>'), Escape::Markup) => output.push_str("&gt;"),
            _ => output.push_str(&glyph.to_string()),
        }
    }
    output
}

/// Decode tokenized bytes straight to text
pub fn detokenize_to_string(data: &[u8], escape: Escape) -> String {
    render(&detokenize(data), escape)
}

/// Decode a line body with its line number prefix (`10 PRINT "HI"`)
pub fn detokenize_line(data: &[u8], line_no: u16, escape: Escape) -> String {
    format!("{} {}", line_no, detokenize_to_string(data, escape))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table() {
        assert_eq!(KEYWORDS.len(), 124);
        assert_eq!(keyword(0x80), Some("END"));
        assert_eq!(keyword(0xB2), Some("PRINT"));
        assert_eq!(keyword(0xFB), Some("'"));
        assert_eq!(keyword(0xFC), None);
        assert_eq!(keyword(0x41), None);
    }

    #[test]
    fn test_print_token() {
        assert_eq!(detokenize(&[0xB2]), vec![Glyph::Keyword("PRINT")]);
        assert_eq!(detokenize_to_string(&[0xB2], Escape::Plain), "PRINT");
    }

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(detokenize(&[0x41]), vec![Glyph::Char('A')]);
    }

    #[test]
    fn test_invalid_token_marker() {
        assert_eq!(detokenize(&[0xFE]), vec![Glyph::InvalidToken(0xFE)]);
        assert_eq!(detokenize_to_string(&[0xFE], Escape::Plain), "{254}");
    }

    #[test]
    fn test_control_marker() {
        assert_eq!(detokenize_to_string(&[0x0D], Escape::Plain), "{13}");
    }

    #[test]
    fn test_quote_toggles_string_mode() {
        // PRINT "<0x80><0xC1>" then 0xB2 outside quotes again
        let data = [0xB2, b'"', 0x80, 0xC1, b'"', 0xB2];
        let glyphs = detokenize(&data);
        assert_eq!(
            glyphs,
            vec![
                Glyph::Keyword("PRINT"),
                Glyph::Char('"'),
                Glyph::Semigraphic(0x80),
                Glyph::Inverse(0xC1),
                Glyph::Char('"'),
                Glyph::Keyword("PRINT"),
            ]
        );
        assert_eq!(Glyph::Semigraphic(0x80).font_char(), Some('\u{E080}'));
        assert_eq!(Glyph::Inverse(0xC1).font_char(), Some('\u{E041}'));
        assert_eq!(Glyph::Inverse(0xE0).font_char(), Some('\u{E060}'));
    }

    #[test]
    fn test_shifted_range() {
        // 0x61 shows as '!'
        assert_eq!(detokenize(&[0x61]), vec![Glyph::Char('!')]);
        assert_eq!(detokenize(&[0x5F]), vec![Glyph::Char('\u{E01F}')]);
        // Quote state is not touched by the shifted range (0x62 -> '"')
        let glyphs = detokenize(&[0x62, 0xB2]);
        assert_eq!(glyphs[1], Glyph::Keyword("PRINT"));
    }

    #[test]
    fn test_markup_escape() {
        let data = [b'A', 0xD5, b'B', b'<', b'>'];
        assert_eq!(detokenize_to_string(&data, Escape::Plain), "A=B<>");
        assert_eq!(detokenize_to_string(&data, Escape::Markup), "A=B&lt;&gt;");
    }

    #[test]
    fn test_line_prefix() {
        let data = [0xB2, b'"', b'H', b'I', b'"'];
        assert_eq!(detokenize_line(&data, 10, Escape::Plain), "10 PRINT\"HI\"");
    }
}
