/*!
# vzimage

A Rust library for decoding VTech VZ200/VZ300 tape and disk images.

## Features

- `.vz` program files and raw `.cvz` cassette captures, including
  tokenized BASIC listings
- `.dsk` / `.dvz` floppy dumps with variable-length sector framing,
  interleave and checksum validation
- VZ-DOS directory listing and file extraction
- Structured reports where every field carries a description and an
  optional warning, plus hex dumps of the bytes behind it

Problems found in an image are reported, not raised: a bad checksum or
a missing marker becomes a warning on the matching report row, and a
short file yields everything that could be decoded before the end.

## Quick Start

```rust,no_run
use vzimage::{FileSystem, VzDosFileSystem, VzImage};

let image = VzImage::open("game.vz")?;
println!("{}", image.report());

let disk = VzImage::open("disk.dsk")?;
if let Some(decoded) = disk.decode().disk() {
    let fs = VzDosFileSystem::new(decoded)?;
    for entry in fs.read_dir()? {
        println!("{}: {} bytes", entry.name, entry.size());
    }
}
# Ok::<(), vzimage::VzError>(())
```

## Modules

- `format`: format registry, detection and constants
- `image`: disk tracks, sectors and the sector header codec
- `tape`: tape blocks and BASIC line chains
- `vz_basic`: BASIC detokenizer
- `filesystem`: VZ-DOS
- `report`: report rows and rendering
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Z80 disassembly
pub mod dasm;
/// Error types and Result alias
pub mod error;
/// Filesystem implementations (VZ-DOS)
pub mod filesystem;
/// Format registry and constants
pub mod format;
/// Disk image data structures (VzDisk, Track, SectorFrame)
pub mod image;
/// Loaded image files
pub mod image_file;
/// Byte cursor and file loading
pub mod io;
/// Structured decode reports
pub mod report;
/// Tape blocks (VZ files and cassette captures)
pub mod tape;
/// VZ BASIC detokenizer
pub mod vz_basic;

// Re-export common types
pub use dasm::{disassemble, DisassembledLine};
pub use error::{Result, VzError};
pub use filesystem::{DirEntry, FileKind, FileSystem, FileSystemInfo, VzDosFileSystem};
pub use format::{Decoded, Format, FORMATS};
pub use image::{SectorFrame, SectorHeader, SectorIssue, SectorSlot, Track, VzDisk};
pub use image_file::VzImage;
pub use io::ByteCursor;
pub use report::{Description, Report, Row, Severity};
pub use tape::{BasicLine, BasicProgram, FileType, TapeBlock, TapeBody, TapeLayout};
pub use vz_basic::{detokenize, detokenize_line, Escape, Glyph};
