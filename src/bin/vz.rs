/// Interactive VZ image console application

use vzimage::format::logical_position;
use vzimage::report::hex_dump;
use vzimage::tape::program::walk_lines;
use vzimage::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "dasm", "dir", "exit", "export", "help", "info", "list", "open", "quit", "report",
                "sector", "tracks",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the command name
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".vzimage_history");
        p
    })
}

/// An opened image and its decoded form
struct Session {
    image: VzImage,
    decoded: Decoded,
}

impl Session {
    fn open(path: &str) -> Result<Self> {
        let image = VzImage::open(path)?;
        let decoded = image.decode();
        Ok(Self { image, decoded })
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    println!("=== VZ Image ===");
    println!("Interactive console for exploring VZ200/VZ300 tape and disk images.");
    println!("Type 'help' for available commands\n");

    let mut rl = match Editor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create editor: {}", e);
            return;
        }
    };
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut session: Option<Session> = None;

    if let Some(path) = std::env::args().nth(1) {
        open_image(&path, &mut session);
    }

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => print_help(),
            "quit" | "exit" => break,
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <path>");
                    continue;
                }
                open_image(&parts[1], &mut session);
            }
            _ => {
                let Some(ref s) = session else {
                    println!("No image loaded. Use 'open <path>' first.");
                    continue;
                };
                match command.as_str() {
                    "info" => print_info(s),
                    "report" => print_report(s, parts.get(1).map(String::as_str)),
                    "tracks" => list_tracks(s),
                    "sector" => {
                        if parts.len() < 3 {
                            println!("Usage: sector <track> <id>");
                            continue;
                        }
                        match (parse_u8(&parts[1]), parse_u8(&parts[2])) {
                            (Some(track), Some(id)) => show_sector(s, track, id),
                            _ => println!("Invalid track or sector number (0-255)"),
                        }
                    }
                    "list" => list_program(s, parts.get(1).map(String::as_str)),
                    "dir" | "ls" => list_directory(s),
                    "export" => {
                        if parts.len() < 2 {
                            println!("Usage: export <name> [output_path]");
                            continue;
                        }
                        let output = parts.get(2).unwrap_or(&parts[1]);
                        export_file(s, &parts[1], output);
                    }
                    "dasm" | "disassemble" => {
                        disassemble_body(s, parts.get(1).and_then(|p| parse_number(p)))
                    }
                    _ => println!("Unknown command: '{}'. Type 'help' for commands.", command),
                }
            }
        }
    }

    if let Some(history_path) = history_path() {
        let _ = rl.save_history(&history_path);
    }
    println!("Goodbye!");
}

fn open_image(path: &str, session: &mut Option<Session>) {
    match Session::open(path) {
        Ok(s) => {
            println!("Opened: {} ({})", path, s.image.format().name());
            *session = Some(s);
        }
        Err(e) => println!("Error: {}", e),
    }
}

/// Split a command line on whitespace, honouring double quotes
fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

/// Decimal or `0x` prefixed hex
fn parse_number(text: &str) -> Option<u16> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// A number that must fit in a byte
fn parse_u8(text: &str) -> Option<u8> {
    parse_number(text).and_then(|n| u8::try_from(n).ok())
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>                    - Open a .vz, .cvz, .dsk or .dvz image (use quotes for paths with spaces)");
    println!("  info                           - Show image summary");
    println!("  report [plain|markup]          - Show the full field by field report");
    println!("  tracks                         - List tracks and sectors with errors (disk)");
    println!("  sector <track> <id>            - Hex dump a sector by physical id (disk)");
    println!("  list [name]                    - BASIC listing of the tape, or of a disk file");
    println!("  dir                            - List VZ-DOS directory (disk)");
    println!("  export <name> [output_path]    - Export a VZ-DOS file to the host filesystem");
    println!("  dasm [origin]                  - Disassemble a binary tape body (dasm)");
    println!("  help                           - Show this help");
    println!("  quit, exit                     - Exit");
    println!();
    println!("Set RUST_LOG=debug for decoder tracing.");
}

fn print_info(s: &Session) {
    println!("Filename: {}", s.image.filename());
    println!("Format: {}", s.image.format().name());
    println!("Size: {} bytes", s.image.data().len());

    match &s.decoded {
        Decoded::Tape(block) => {
            if let Some(name) = &block.name {
                println!("Name: \"{}\"", name.text);
            }
            if let Some(file_type) = block.file_type {
                println!("Type: {}", file_type);
            }
            match &block.body {
                Some(TapeBody::Basic(program)) => {
                    println!("Load address: 0x{:04X}", program.load);
                    println!("BASIC lines: {}", program.lines.len());
                    if let Some(checksum) = &program.checksum {
                        println!(
                            "Checksum: 0x{:04X} ({})",
                            checksum.stored,
                            if checksum.is_valid() { "OK" } else { "mismatch" }
                        );
                    }
                }
                Some(TapeBody::Binary(binary)) => {
                    println!("Load address: 0x{:04X}", binary.load);
                    println!("Code: {} bytes", binary.data.len());
                }
                None => {}
            }
            if let Some(reason) = &block.truncated {
                println!("Truncated: {}", reason);
            }
        }
        Decoded::Disk(disk) => {
            println!("Tracks: {}", disk.tracks().len());
            println!("Sectors with errors: {}", disk.error_count());
            if disk.trailing_bytes() > 0 {
                println!("Trailing bytes: {}", disk.trailing_bytes());
            }
            if let Ok(fs) = VzDosFileSystem::new(disk) {
                let info = fs.info();
                println!(
                    "Filesystem: {}, {} files, {}/{} sectors used",
                    info.fs_type, info.files, info.used_sectors, info.total_sectors
                );
            }
        }
    }

    let warnings = s.decoded.report().warnings().len();
    println!("Warnings: {}", warnings);
}

fn print_report(s: &Session, mode: Option<&str>) {
    let report = match mode {
        Some("plain") => s.decoded.report_with(Escape::Plain),
        Some("markup") => s.decoded.report_with(Escape::Markup),
        Some(other) => {
            println!("Unknown mode '{}', use plain or markup", other);
            return;
        }
        None => s.decoded.report(),
    };
    print!("{}", report);
}

fn list_tracks(s: &Session) {
    let Some(disk) = s.decoded.disk() else {
        println!("Not a disk image.");
        return;
    };
    println!("{:<6} {:<8} {:<10} {:<24}", "Track", "Sectors", "Separator", "Errors");
    println!("{}", "-".repeat(50));
    for track in disk.tracks() {
        let read = track.sectors.iter().filter(|s| s.frame().is_some()).count();
        let separator = track
            .separator
            .as_ref()
            .map(|sep| sep.len.to_string())
            .unwrap_or_else(|| "-".to_string());
        let errors = track.sectors_with_errors();
        let errors = if errors.is_empty() {
            "None".to_string()
        } else {
            errors.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
        };
        println!("{:<6} {:<8} {:<10} {:<24}", track.number, read, separator, errors);
    }
}

fn show_sector(s: &Session, track: u8, id: u8) {
    let Some(disk) = s.decoded.disk() else {
        println!("Not a disk image.");
        return;
    };
    let Some(frame) = disk.get_sector(track, id) else {
        println!("Sector T:{} S:{} not readable", track, id);
        return;
    };
    println!(
        "Sector T:{} S:{} (slot {}) at offset 0x{:06X}, checksum 0x{:04X} (computed 0x{:04X})",
        track,
        id,
        slot_label(id),
        frame.offset,
        frame.payload_checksum_stored,
        frame.payload_checksum()
    );
    for issue in &frame.issues {
        println!("  WARN: {}", issue);
    }
    print!("{}", hex_dump(&frame.payload, 0));
}

/// Where a sector id sits in the interleave order
fn slot_label(id: u8) -> String {
    logical_position(id)
        .map(|p| p.to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn list_program(s: &Session, name: Option<&str>) {
    match (&s.decoded, name) {
        (Decoded::Tape(block), _) => match block.program() {
            Some(program) => print!("{}", program.listing(Escape::Plain)),
            None => println!("Not a BASIC program."),
        },
        (Decoded::Disk(disk), Some(name)) => {
            let result = VzDosFileSystem::new(disk).and_then(|fs| {
                let entry = fs
                    .read_dir()?
                    .into_iter()
                    .find(|e| e.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| VzError::FileNotFound(name.to_string()))?;
                let data = fs.read_file(name)?;
                Ok((entry, data))
            });
            match result {
                Ok((entry, data)) if entry.kind == FileKind::Basic => {
                    let mut program = BasicProgram::new(entry.start_addr);
                    let walked = walk_lines(&mut ByteCursor::new(&data), &mut program);
                    print!("{}", program.listing(Escape::Plain));
                    if let Err(e) = walked {
                        println!("WARN: {}", e);
                    }
                }
                Ok(_) => println!("{} is not a BASIC file.", name),
                Err(e) => println!("Error: {}", e),
            }
        }
        (Decoded::Disk(_), None) => println!("Usage: list <name>"),
    }
}

fn list_directory(s: &Session) {
    let Some(disk) = s.decoded.disk() else {
        println!("Not a disk image.");
        return;
    };
    let entries = VzDosFileSystem::new(disk).and_then(|fs| fs.read_dir());
    match entries {
        Ok(entries) if entries.is_empty() => println!("No files."),
        Ok(entries) => {
            println!("{:<10} {:<8} {:<8} {:<14} {:>6}", "Name", "Type", "Start", "Address", "Size");
            println!("{}", "-".repeat(50));
            for entry in &entries {
                println!(
                    "{:<10} {:<8} {:<8} {:<14} {:>6}",
                    entry.name,
                    entry.kind.to_string(),
                    format!("{}:{}", entry.start_track, entry.start_sector),
                    format!("{:04X}-{:04X}", entry.start_addr, entry.end_addr),
                    entry.size()
                );
            }
            println!("\n{} files", entries.len());
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn export_file(s: &Session, name: &str, output: &str) {
    let Some(disk) = s.decoded.disk() else {
        println!("Not a disk image.");
        return;
    };
    let data = VzDosFileSystem::new(disk).and_then(|fs| fs.read_file(name));
    match data {
        Ok(data) => match std::fs::write(output, &data) {
            Ok(()) => println!("Exported {} ({} bytes) to {}", name, data.len(), output),
            Err(e) => println!("Error writing {}: {}", output, e),
        },
        Err(e) => println!("Error: {}", e),
    }
}

fn disassemble_body(s: &Session, origin: Option<u16>) {
    let Some(binary) = s.decoded.tape().and_then(|t| t.binary()) else {
        println!("No binary code to disassemble.");
        return;
    };
    for line in disassemble(&binary.data, origin.unwrap_or(binary.load)) {
        println!("{}", line);
    }
}
