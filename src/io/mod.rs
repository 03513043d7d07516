/// Byte-level access to loaded image buffers

/// Forward cursor with rollback over an immutable buffer
pub mod cursor;

pub use cursor::ByteCursor;

use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Load a whole image file into memory
///
/// Decoding works on a fully materialized buffer, so this is the only
/// place that touches the filesystem.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}
