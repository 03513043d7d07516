/// Field-level decode reports
///
/// Decoders describe what they found as a tree of labeled rows. Severity
/// is carried next to the text and left to the renderer to present.

use std::fmt;

/// Severity attached to a row description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Informational
    #[default]
    None,
    /// Something did not match the expected layout or checksum
    Warning,
}

/// Row description with its severity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Description {
    /// Human readable text
    pub text: String,
    /// Severity of the text
    pub severity: Severity,
}

impl Description {
    /// Create an informational description
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::None,
        }
    }

    /// Create a warning description
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Warning,
        }
    }

    /// Append a warning note, raising the severity
    pub fn with_warning(mut self, note: impl AsRef<str>) -> Self {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(note.as_ref());
        self.severity = Severity::Warning;
        self
    }

    /// Is this a warning?
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Raw bytes attached to a row, with the buffer offset they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    /// Offset of the first byte in the image
    pub offset: usize,
    /// The bytes
    pub bytes: Vec<u8>,
}

/// A single report row, optionally with nested detail rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Field label
    pub label: String,
    /// Formatted value
    pub value: String,
    /// Description and severity
    pub description: Description,
    /// Raw bytes shown as a memory dump
    pub dump: Option<Dump>,
    /// Nested detail rows
    pub children: Vec<Row>,
}

impl Row {
    fn new(label: impl Into<String>, value: impl Into<String>, description: Description) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description,
            dump: None,
            children: Vec::new(),
        }
    }

    /// Find a direct child row by label
    pub fn child(&self, label: &str) -> Option<&Row> {
        self.children.iter().find(|r| r.label == label)
    }
}

/// Report sink: an ordered tree of rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    rows: Vec<Row>,
}

impl Report {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a plain field
    pub fn field(
        &mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        description: Description,
    ) {
        self.rows.push(Row::new(label, value, description));
    }

    /// Emit a field carrying a memory dump
    pub fn dump(
        &mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        description: Description,
        offset: usize,
        bytes: &[u8],
    ) {
        let mut row = Row::new(label, value, description);
        row.dump = Some(Dump {
            offset,
            bytes: bytes.to_vec(),
        });
        self.rows.push(row);
    }

    /// Emit a group of detail rows
    ///
    /// The producer fills the nested report and returns the group's value
    /// and description, which are usually only known once the details
    /// have been read.
    pub fn group<F>(&mut self, label: impl Into<String>, producer: F)
    where
        F: FnOnce(&mut Report) -> (String, Description),
    {
        let mut nested = Report::new();
        let (value, description) = producer(&mut nested);
        let mut row = Row::new(label, value, description);
        row.children = nested.rows;
        self.rows.push(row);
    }

    /// Top-level rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Find a top-level row by label
    pub fn find(&self, label: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// All rows at any depth carrying a warning
    pub fn warnings(&self) -> Vec<&Row> {
        fn collect<'r>(rows: &'r [Row], out: &mut Vec<&'r Row>) {
            for row in rows {
                if row.description.is_warning() {
                    out.push(row);
                }
                collect(&row.children, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.rows, &mut out);
        out
    }

    /// Render as indented plain text
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_rows(&self.rows, 0, &mut out);
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_rows(rows: &[Row], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for row in rows {
        let marker = if row.description.is_warning() { "WARN: " } else { "" };
        out.push_str(&format!(
            "{}{:<14} {:<16} {}{}\n",
            indent, row.label, row.value, marker, row.description.text
        ));
        if let Some(dump) = &row.dump {
            for line in hex_dump(&dump.bytes, dump.offset).lines() {
                out.push_str(&indent);
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        render_rows(&row.children, depth + 1, out);
    }
}

/// Format bytes as a hex dump, 16 per line with an ASCII column
pub fn hex_dump(data: &[u8], base: usize) -> String {
    let mut out = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:06X}: ", base + i * 16));

        for (j, byte) in chunk.iter().enumerate() {
            out.push_str(&format!("{:02X} ", byte));
            if j == 7 {
                out.push(' ');
            }
        }

        // Pad a short last line
        for j in chunk.len()..16 {
            out.push_str("   ");
            if j == 7 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        for &byte in chunk {
            out.push(if (32..127).contains(&byte) { byte as char } else { '.' });
        }
        out.push_str("|\n");
    }

    out
}

/// Format bytes as space separated upper-case hex (`FE E7 18 C3`)
pub fn hex_sequence(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
