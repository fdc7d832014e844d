//! Main entry point for the zipdir CLI application.
//!
//! This binary provides a command-line interface for compressing directory
//! trees into ZIP archives and extracting or listing them again.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use zipdir::cli::{Command, is_stdin};
use zipdir::{Cli, ExtractOptions, ZipStreamReader};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to the subcommand handler.
fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Compress {
            source,
            archive,
            include_root_dir,
            exclude,
        } => compress(&cli, source, archive, *include_root_dir, exclude),
        Command::Extract {
            file,
            extract_dir,
            allow_unsafe_paths,
        } => extract(&cli, file, extract_dir.as_deref(), *allow_unsafe_paths),
        Command::List { file, verbose } => list_files(file, *verbose),
    }
}

/// Compress `source` into `archive`.
///
/// Prints an `adding:` line for every node as it is walked. Exclusion
/// patterns are matched against the base name of every node below the
/// source; a matching directory is skipped together with its contents.
///
/// # Arguments
///
/// * `cli` - Parsed command-line arguments, for the quiet level
/// * `source` - Directory (or single file) to compress
/// * `archive` - Path of the archive to create
/// * `include_root_dir` - If true, entries are nested under the source's own name
/// * `exclude` - Base-name patterns to leave out, `*` and `?` allowed
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if compression fails.
fn compress(
    cli: &Cli,
    source: &Path,
    archive: &Path,
    include_root_dir: bool,
    exclude: &[String],
) -> Result<()> {
    let canonical = fs::canonicalize(source)
        .with_context(|| format!("Failed to compress {}", source.display()))?;
    // Entry names are paths relative to this directory
    let names_from = if include_root_dir || !canonical.is_dir() {
        canonical.parent().unwrap_or(&canonical).to_path_buf()
    } else {
        canonical.clone()
    };

    let announce = |path: &Path| {
        if cli.is_quiet() {
            return;
        }
        let Ok(name) = path.strip_prefix(&names_from) else {
            return;
        };
        if path.is_dir() {
            println!("  adding: {}/", name.display());
        } else if path.is_file() {
            println!("  adding: {}", name.display());
        }
    };

    let filter = |path: &Path| {
        let basename = path
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let excluded = exclude.iter().any(|x| {
            if has_glob_chars(x) {
                glob_match(x, &basename)
            } else {
                basename == x.as_str()
            }
        });
        if excluded {
            if !cli.is_very_quiet() {
                eprintln!("  excluding: {}", path.display());
            }
        } else {
            announce(path);
        }
        !excluded
    };

    if names_from != canonical {
        announce(&canonical);
    }
    zipdir::compress_with_filter(&canonical, archive, include_root_dir, Some(&filter))
        .with_context(|| format!("Failed to compress {}", source.display()))?;

    if !cli.is_quiet() {
        let size = fs::metadata(archive)
            .with_context(|| format!("Failed to stat {}", archive.display()))?
            .len();
        println!("  created: {} ({})", archive.display(), format_size(size));
    }

    Ok(())
}

/// Extract an archive from a file or standard input.
///
/// Unless `allow_unsafe_paths` is set, entries whose names would land
/// outside the extraction directory abort the extraction.
///
/// # Arguments
///
/// * `cli` - Parsed command-line arguments, for the quiet level
/// * `file` - Archive path, or `-` for standard input
/// * `extract_dir` - Destination directory, the current directory if `None`
/// * `allow_unsafe_paths` - If true, entry names may point outside `extract_dir`
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if extraction fails.
fn extract(
    cli: &Cli,
    file: &str,
    extract_dir: Option<&Path>,
    allow_unsafe_paths: bool,
) -> Result<()> {
    let dest = extract_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    let options = ExtractOptions {
        confine_to_destination: !allow_unsafe_paths,
        on_entry: (!cli.is_quiet()).then_some(print_extracting as fn(&str)),
    };

    let stats = zipdir::extract_with_options(open_input(file)?, &dest, &options)
        .with_context(|| format!("Failed to extract {}", file))?;

    if !cli.is_quiet() {
        println!(
            "  extracted: {} files, {} directories, {} into {}",
            stats.files,
            stats.directories,
            format_size(stats.bytes),
            dest.display()
        );
    }

    Ok(())
}

/// Display extraction progress for one entry.
fn print_extracting(name: &str) {
    println!("  extracting: {}", name);
}

/// List files in the ZIP archive.
///
/// Supports two output formats:
/// - Simple format: Just file names, one per line
/// - Verbose format (`-v`): Detailed table with size, compression ratio, and timestamps
///
/// The archive is decoded as a stream, so every entry is read through to
/// learn (and verify) its sizes.
///
/// # Arguments
///
/// * `file` - Archive path, or `-` for standard input
/// * `verbose` - If true, display detailed information in table format
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if listing fails.
fn list_files(file: &str, verbose: bool) -> Result<()> {
    let mut archive = ZipStreamReader::new(open_input(file)?);

    if verbose {
        // Print table header for verbose output
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    // Track totals for summary line
    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    while let Some(mut entry) = archive.next_entry().context("Failed to read archive")? {
        io::copy(&mut entry, &mut io::sink())
            .with_context(|| format!("Failed to read entry {}", entry.name()))?;
        let info = entry.info();

        if !verbose {
            println!("{}", info.file_name);
            continue;
        }

        // Parse DOS timestamp into human-readable format
        let (year, month, day) = info.mod_date();
        let (hour, minute, _second) = info.mod_time();

        println!(
            "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            info.uncompressed_size,
            info.compressed_size,
            ratio(info.compressed_size, info.uncompressed_size),
            year,
            month,
            day,
            hour,
            minute,
            info.file_name
        );

        // Accumulate totals (excluding directories)
        if !info.is_directory {
            total_uncompressed += info.uncompressed_size;
            total_compressed += info.compressed_size;
            file_count += 1;
        }
    }

    // Print summary line in verbose mode
    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed,
            total_compressed,
            ratio(total_compressed, total_uncompressed),
            "",
            file_count
        );
    }

    Ok(())
}

/// Open a FILE argument, where `-` means standard input.
fn open_input(file: &str) -> Result<Box<dyn Read>> {
    if is_stdin(file) {
        return Ok(Box::new(io::stdin().lock()));
    }
    let f = File::open(file).with_context(|| format!("Failed to open {}", file))?;
    Ok(Box::new(f))
}

/// Compression ratio as percentage saved, right-aligned to five columns.
///
/// Entries that grew during compression report `0%`.
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

/// Check if a pattern contains glob wildcard characters.
///
/// # Arguments
///
/// * `pattern` - The pattern to check
///
/// # Returns
///
/// Returns `true` if the pattern contains `*` or `?` wildcards.
fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Simple glob pattern matching supporting `*` and `?` wildcards.
///
/// This is a basic implementation for base-name matching:
/// - `*` matches zero or more characters
/// - `?` matches exactly one character
///
/// # Arguments
///
/// * `pattern` - The glob pattern to match against
/// * `text` - The text to check for a match
///
/// # Returns
///
/// Returns `true` if the text matches the pattern, `false` otherwise.
///
/// # Examples
///
/// ```ignore
/// assert!(glob_match("*.txt", "readme.txt"));
/// assert!(glob_match("file?.dat", "file1.dat"));
/// assert!(!glob_match("*.txt", "readme.md"));
/// ```
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();

    /// Recursive helper function for glob matching.
    ///
    /// Uses a simple backtracking algorithm to handle `*` wildcards.
    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            // Both exhausted: match successful
            (None, None) => true,
            // Star matches zero characters, or one and stays for more
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            // Question mark matches exactly one character
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if *p == *t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern_chars, &text_chars)
}

/// Format a byte size into a human-readable string.
///
/// Automatically selects the appropriate unit (bytes, KB, MB, GB)
/// based on the size magnitude.
///
/// # Arguments
///
/// * `size` - The size in bytes to format
///
/// # Returns
///
/// A formatted string with the size and appropriate unit.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
