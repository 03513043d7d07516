/// Loaded image file with its detected format

use crate::error::Result;
use crate::format::{extension_of, Decoded, Format};
use crate::io::{read_image, ByteCursor};
use crate::report::Report;
use log::debug;
use std::path::Path;

/// An image buffer and the format chosen for it
#[derive(Debug, Clone)]
pub struct VzImage {
    format: Format,
    filename: String,
    data: Vec<u8>,
}

impl VzImage {
    /// Open an image file
    ///
    /// The whole file is read and the format is chosen by extension and
    /// content.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let filename = path.as_ref().to_string_lossy().to_string();
        let data = read_image(&path)?;
        Self::from_bytes(&filename, data)
    }

    /// Wrap an in-memory buffer; `filename` supplies the extension
    pub fn from_bytes(filename: &str, data: Vec<u8>) -> Result<Self> {
        let format = Format::detect(filename, &data)?;
        debug!(
            "{}: {} bytes, {} (.{})",
            filename,
            data.len(),
            format.name(),
            extension_of(filename)
        );
        Ok(Self {
            format,
            filename: filename.to_string(),
            data,
        })
    }

    /// Detected format
    pub fn format(&self) -> Format {
        self.format
    }

    /// File name the image was loaded from
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Decode the whole buffer
    ///
    /// Each call starts a fresh cursor, so repeated decodes agree.
    pub fn decode(&self) -> Decoded {
        let mut cursor = ByteCursor::new(&self.data);
        self.format.decode(&mut cursor)
    }

    /// Decode and build the report
    pub fn report(&self) -> Report {
        self.decode().report()
    }
}
