//! Directory tree compression and archive extraction.
//!
//! Entry names are derived by prefix arithmetic on canonical paths: the
//! canonical path of every node minus a fixed number of leading bytes, minus
//! one leading separator. [`compress`] picks the prefix so that either the
//! children of the source directory or the source directory itself form the
//! top level of the archive; [`add_to_zip`] exposes the recursive walk for
//! callers that want their own prefix, filter or writer.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::error::{Error, PathContext, Result};
use crate::zip::{ZipStreamReader, ZipWriter};

/// Traversal predicate: a node (and its whole subtree) is skipped when the
/// filter returns `false` for its path.
pub type FileFilter<'a> = &'a dyn Fn(&Path) -> bool;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Compress `src` into a new archive at `dest`.
///
/// With `include_root_dir` the archive has a single top-level directory named
/// after `src`; without it the children of `src` sit at the top level. A
/// regular file as `src` is always stored under its own name.
///
/// On error the destination may be left incomplete and should be discarded.
pub fn compress(src: impl AsRef<Path>, dest: impl AsRef<Path>, include_root_dir: bool) -> Result<()> {
    compress_with_filter(src, dest, include_root_dir, None)
}

/// [`compress`] with a traversal filter applied below `src`.
pub fn compress_with_filter(
    src: impl AsRef<Path>,
    dest: impl AsRef<Path>,
    include_root_dir: bool,
    filter: Option<FileFilter<'_>>,
) -> Result<()> {
    let src = src.as_ref();
    let dest = dest.as_ref();

    // Resolve the source before the destination is created
    let canonical = fs::canonicalize(src).with_path("resolve", src)?;
    let metadata = fs::metadata(&canonical).with_path("stat", &canonical)?;
    let prefix = root_prefix(&canonical, include_root_dir || !metadata.is_dir());

    let file = File::create(dest).with_path("create", dest)?;
    // The archive may live inside the tree it is built from
    let dest_canonical = fs::canonicalize(dest).with_path("resolve", dest)?;
    let not_dest = |path: &Path| path != dest_canonical.as_path() && filter.is_none_or(|f| f(path));

    log::debug!(
        "compress: {} -> {} (prefix {})",
        canonical.display(),
        dest.display(),
        prefix
    );

    let mut zip = ZipWriter::new(BufWriter::new(file));
    add_node(prefix, &canonical, Some(&not_dest), &mut zip)?;
    let entries = zip.entry_count();
    zip.finish()?
        .into_inner()
        .map_err(|e| Error::Path {
            op: "write",
            path: dest.to_path_buf(),
            source: e.into_error(),
        })?;

    log::debug!("compress: wrote {} entries to {}", entries, dest.display());
    Ok(())
}

/// Byte length of `canonical`, shortened by its final component when the
/// root directory's own name should appear in entry names.
fn root_prefix(canonical: &Path, include_root_dir: bool) -> usize {
    let mut prefix = canonical.as_os_str().len();
    if include_root_dir {
        if let Some(name) = canonical.file_name() {
            prefix -= name.len();
        }
    }
    prefix
}

/// Add `node` and everything below it to an open archive.
///
/// Entry names are the canonical path of each node with its first `prefix`
/// bytes removed. Directories produce a `name/` entry (unless the name is
/// empty) followed by their children in directory-listing order; `filter`
/// applies to those children, never to `node` itself. Nodes that are neither
/// a regular file nor a directory are skipped.
pub fn add_to_zip<W: Write>(
    prefix: usize,
    node: &Path,
    filter: Option<FileFilter<'_>>,
    zip: &mut ZipWriter<W>,
) -> Result<()> {
    let canonical = fs::canonicalize(node).with_path("resolve", node)?;
    add_node(prefix, &canonical, filter, zip)
}

fn add_node<W: Write>(
    prefix: usize,
    path: &Path,
    filter: Option<FileFilter<'_>>,
    zip: &mut ZipWriter<W>,
) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            log::debug!("skipping {}: {}", path.display(), e);
            return Ok(());
        }
    };
    let name = entry_name(prefix, path)?;
    let modified = metadata.modified().unwrap_or(UNIX_EPOCH);

    if metadata.is_dir() {
        if !name.is_empty() {
            zip.add_directory(&name, modified)?;
        }
        for child in fs::read_dir(path).with_path("read directory", path)? {
            let child = child.with_path("read directory", path)?.path();
            if filter.is_none_or(|f| f(&child)) {
                add_node(prefix, &child, filter, zip)?;
            }
        }
    } else if metadata.is_file() {
        let mut file = File::open(path).with_path("open", path)?;
        zip.start_file_with_size(&name, modified, metadata.len())?;
        io::copy(&mut file, zip).with_path("compress", path)?;
    } else {
        log::debug!("skipping {}: not a regular file or directory", path.display());
    }
    Ok(())
}

/// Archive entry name for `path`: drop `prefix` bytes and one leading
/// separator, and use `/` between components.
///
/// Entry names are UTF-8, so a path that is not valid Unicode is an
/// [`Error::InvalidPath`] rather than a silently renamed entry.
fn entry_name(prefix: usize, path: &Path) -> Result<String> {
    let full = path
        .to_str()
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
    let rest = full
        .get(prefix..)
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))?;
    let rest = rest.strip_prefix(MAIN_SEPARATOR).unwrap_or(rest);
    if MAIN_SEPARATOR == '/' {
        Ok(rest.to_string())
    } else {
        Ok(rest.replace(MAIN_SEPARATOR, "/"))
    }
}

/// Knobs for [`extract_with_options`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Reject entries whose names contain `..`, a root or a drive prefix
    /// instead of writing wherever they resolve to.
    pub confine_to_destination: bool,
    /// Called with each entry name before the entry is written.
    pub on_entry: Option<fn(&str)>,
}

/// What [`extract_with_options`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub directories: usize,
    pub bytes: u64,
}

/// Extract the archive at `src` into `dest`.
pub fn extract(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> Result<()> {
    let src = src.as_ref();
    let file = File::open(src).with_path("open", src)?;
    extract_from_reader(file, dest)
}

/// Extract an archive read from `reader` into `dest`.
///
/// Entry names are joined to `dest` as stored; see
/// [`ExtractOptions::confine_to_destination`] for untrusted input.
pub fn extract_from_reader<R: Read>(reader: R, dest: impl AsRef<Path>) -> Result<()> {
    extract_with_options(reader, dest, &ExtractOptions::default()).map(|_| ())
}

/// Extract entries in stream order. Stops at the first error; whatever was
/// written before it stays on disk.
pub fn extract_with_options<R: Read>(
    reader: R,
    dest: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractStats> {
    let dest = dest.as_ref();
    let mut archive = ZipStreamReader::new(reader);
    let mut stats = ExtractStats::default();

    while let Some(mut entry) = archive.next_entry()? {
        let target = entry_target(dest, entry.name(), options.confine_to_destination)?;
        if let Some(on_entry) = options.on_entry {
            on_entry(entry.name());
        }

        if entry.is_dir() {
            fs::create_dir_all(&target).with_path("create directory", &target)?;
            log::debug!("extract: directory {}", target.display());
            stats.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_path("create directory", parent)?;
        }
        let mut out = BufWriter::new(File::create(&target).with_path("create", &target)?);
        let written = copy_entry(&mut entry, &mut out, &target)?;
        out.flush().with_path("write", &target)?;

        log::debug!("extract: file {} ({} bytes)", target.display(), written);
        stats.files += 1;
        stats.bytes += written;
    }

    Ok(stats)
}

/// Copy entry data into `out`. Read failures come from the archive and keep
/// their own error; only write failures are attributed to `target`.
fn copy_entry(entry: &mut impl Read, out: &mut impl Write, target: &Path) -> Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut written = 0u64;
    loop {
        let n = match entry.read(&mut buf) {
            Ok(0) => return Ok(written),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        out.write_all(&buf[..n]).with_path("write", target)?;
        written += n as u64;
    }
}

/// Resolve an entry name below `dest`. Leading slashes are dropped so the
/// name is always appended to `dest`.
fn entry_target(dest: &Path, name: &str, confine: bool) -> Result<PathBuf> {
    let relative = Path::new(name.trim_start_matches('/'));
    if confine
        && relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(Error::UnsafeEntryName(name.to_string()));
    }
    Ok(dest.join(relative))
}
