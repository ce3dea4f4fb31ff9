//! Moving, renaming, copying and linking.

use std::ffi::OsString;
use std::fs::{self, File, FileTimes};
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::remove::remove_any;
use super::walk::Walker;
use crate::core::errors::{Error, Result};
use crate::models::FileKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOptions {
    /// Overwrite an existing target.
    pub force: bool,
    /// Copy an existing target to `<target>.bak` before overwriting it.
    pub backup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub destination: PathBuf,
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LinkKind {
    Hard,
    Sym,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    pub force: bool,
    pub recursive: bool,
    /// Carry permission bits and access/modification times over to the copy.
    pub preserve: bool,
    /// Create a link instead of copying bytes.
    pub link: Option<LinkKind>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopySummary {
    pub destination: PathBuf,
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
    pub linked: Option<LinkKind>,
}

/// Moves `source` to `destination`, or into it when `destination` is an existing directory.
pub fn move_path(source: &Path, destination: &Path, opts: MoveOptions) -> Result<MoveOutcome> {
    ensure_exists(source)?;
    let target = resolve_into_dir(source, destination)?;
    relocate(source, &target, opts)
}

/// Renames `old` to exactly `new`. Without `force` an existing `new` leaves both untouched.
pub fn rename_path(old: &Path, new: &Path, opts: MoveOptions) -> Result<MoveOutcome> {
    ensure_exists(old)?;
    relocate(old, new, opts)
}

/// Where a move or copy of `source` into `destination` would land.
pub fn resolve_into_dir(source: &Path, destination: &Path) -> Result<PathBuf> {
    if destination.is_dir() {
        let name = source
            .file_name()
            .ok_or_else(|| Error::InvalidArgument(format!("{} has no file name", source.display())))?;
        Ok(destination.join(name))
    } else {
        Ok(destination.to_path_buf())
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Copies `path` to `<path>.bak`, replacing any previous backup.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    if fs::symlink_metadata(&backup).is_ok() {
        remove_any(&backup)?;
    }
    let opts = CopyOptions {
        force: true,
        recursive: true,
        preserve: true,
        link: None,
    };
    copy_to(path, &backup, opts)?;
    tracing::info!(path = %path.display(), backup = %backup.display(), "created backup");
    Ok(backup)
}

fn relocate(source: &Path, target: &Path, opts: MoveOptions) -> Result<MoveOutcome> {
    let existing = fs::symlink_metadata(target).ok();
    let mut hard_linked = false;
    if let Some(existing) = &existing {
        let source_meta = fs::symlink_metadata(source).map_err(|e| Error::at(source, e))?;
        // Two names for one inode: rename(2) would succeed without removing the source.
        hard_linked = same_inode(&source_meta, existing) && !same_entry(source, target);
        if !hard_linked && is_same_file(source, target) {
            return Err(same_file_error(source, target));
        }
        if !opts.force {
            return Err(Error::AlreadyExists(target.to_path_buf()));
        }
    }

    let mut backup = None;
    if let Some(existing) = &existing {
        if opts.backup {
            backup = Some(create_backup(target)?);
        }
        // rename(2) only replaces files; a directory target has to go first.
        if existing.is_dir() {
            remove_any(target)?;
        }
    }

    if hard_linked {
        fs::remove_file(source).map_err(|e| Error::at(source, e))?;
        tracing::info!(from = %source.display(), to = %target.display(), "moved onto a hard link, unlinked source");
        return Ok(MoveOutcome {
            destination: target.to_path_buf(),
            backup,
        });
    }

    match fs::rename(source, target) {
        Ok(()) => {}
        Err(err) if is_cross_device(&err) => {
            tracing::debug!(from = %source.display(), to = %target.display(), "cross-device move, copying");
            move_across_devices(source, target)?;
        }
        Err(err) => return Err(Error::between(source, target, err)),
    }

    tracing::info!(from = %source.display(), to = %target.display(), "moved");
    Ok(MoveOutcome {
        destination: target.to_path_buf(),
        backup,
    })
}

/// Copy-then-remove for a move rename(2) cannot do. Links are recreated, never followed.
fn move_across_devices(source: &Path, target: &Path) -> Result<()> {
    if fs::symlink_metadata(target).is_ok() {
        remove_any(target)?;
    }
    let metadata = fs::symlink_metadata(source).map_err(|e| Error::at(source, e))?;
    if metadata.file_type().is_symlink() {
        copy_symlink(source, target)?;
    } else {
        let opts = CopyOptions {
            force: true,
            recursive: true,
            preserve: true,
            link: None,
        };
        copy_to(source, target, opts)?;
    }
    remove_any(source)
}

/// Copies (or links) `source` to `destination`, or into it when it is an existing directory.
pub fn copy_path(source: &Path, destination: &Path, opts: CopyOptions) -> Result<CopySummary> {
    ensure_exists(source)?;
    let target = resolve_into_dir(source, destination)?;

    if let Some(kind) = opts.link {
        make_link(source, &target, kind, opts.force)?;
        return Ok(CopySummary {
            destination: target,
            linked: Some(kind),
            ..CopySummary::default()
        });
    }

    if fs::symlink_metadata(&target).is_ok() {
        if is_same_file(source, &target) {
            return Err(same_file_error(source, &target));
        }
        if !opts.force {
            return Err(Error::AlreadyExists(target));
        }
    }
    copy_to(source, &target, opts)
}

fn copy_to(source: &Path, target: &Path, opts: CopyOptions) -> Result<CopySummary> {
    let metadata = fs::metadata(source).map_err(|e| Error::at(source, e))?;
    if metadata.is_dir() {
        if !opts.recursive {
            return Err(Error::IsADirectory(source.to_path_buf()));
        }
        return copy_tree(source, target, opts);
    }

    let bytes = copy_file(source, target)?;
    if opts.preserve {
        preserve_attributes(source, target)?;
    }
    tracing::info!(from = %source.display(), to = %target.display(), bytes, "copied file");
    Ok(CopySummary {
        destination: target.to_path_buf(),
        files: 1,
        bytes,
        ..CopySummary::default()
    })
}

fn copy_tree(source: &Path, target: &Path, opts: CopyOptions) -> Result<CopySummary> {
    reject_copy_into_self(source, target)?;

    let mut summary = CopySummary {
        destination: target.to_path_buf(),
        ..CopySummary::default()
    };
    fs::create_dir_all(target).map_err(|e| Error::at(target, e))?;
    summary.dirs += 1;

    for entry in Walker::new(source) {
        let entry = entry?;
        let dest = target.join(entry.relative());
        match entry.kind() {
            FileKind::Dir => {
                fs::create_dir_all(&dest).map_err(|e| Error::at(&dest, e))?;
                summary.dirs += 1;
            }
            FileKind::File => {
                summary.bytes += copy_file(entry.path(), &dest)?;
                summary.files += 1;
                if opts.preserve {
                    preserve_attributes(entry.path(), &dest)?;
                }
            }
            FileKind::Symlink => copy_symlink(entry.path(), &dest)?,
            FileKind::Other => {
                tracing::warn!(path = %entry.path().display(), "skipping special file");
            }
        }
    }

    // Directory permissions last, so a read-only source dir does not block its own contents.
    if opts.preserve {
        for entry in Walker::new(source).include_root(true).contents_first(true) {
            let entry = entry?;
            if entry.kind() == FileKind::Dir {
                let dest = target.join(entry.relative());
                fs::set_permissions(&dest, entry.metadata()?.permissions())
                    .map_err(|e| Error::at(&dest, e))?;
            }
        }
    }

    tracing::info!(
        from = %source.display(),
        to = %target.display(),
        files = summary.files,
        dirs = summary.dirs,
        "copied tree"
    );
    Ok(summary)
}

fn copy_file(source: &Path, target: &Path) -> Result<u64> {
    let input = File::open(source).map_err(|e| Error::at(source, e))?;
    let output = File::create(target).map_err(|e| Error::at(target, e))?;
    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);
    let bytes = io::copy(&mut reader, &mut writer).map_err(|e| Error::between(source, target, e))?;
    writer.flush()?;
    Ok(bytes)
}

fn preserve_attributes(source: &Path, target: &Path) -> Result<()> {
    let metadata = fs::metadata(source).map_err(|e| Error::at(source, e))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    File::options()
        .write(true)
        .open(target)
        .and_then(|file| file.set_times(times))
        .map_err(|e| Error::at(target, e))?;
    fs::set_permissions(target, metadata.permissions()).map_err(|e| Error::at(target, e))?;
    Ok(())
}

fn make_link(source: &Path, target: &Path, kind: LinkKind, force: bool) -> Result<()> {
    if fs::symlink_metadata(target).is_ok() {
        if is_same_file(source, target) {
            return Err(same_file_error(source, target));
        }
        if !force {
            return Err(Error::AlreadyExists(target.to_path_buf()));
        }
        remove_any(target)?;
    }

    match kind {
        LinkKind::Hard => fs::hard_link(source, target),
        LinkKind::Sym => {
            let absolute = fs::canonicalize(source).map_err(|e| Error::at(source, e))?;
            symlink(&absolute, target)
        }
    }
    .map_err(|e| Error::between(source, target, e))?;

    tracing::info!(from = %source.display(), to = %target.display(), ?kind, "linked");
    Ok(())
}

fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let pointee = fs::read_link(source).map_err(|e| Error::at(source, e))?;
    symlink(&pointee, target).map_err(|e| Error::between(source, target, e))
}

#[cfg(unix)]
fn symlink(pointee: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(pointee, link)
}

#[cfg(not(unix))]
fn symlink(_pointee: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        ErrorKind::Unsupported,
        "symbolic links are only supported on unix",
    ))
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(rustix::io::Errno::XDEV.raw_os_error())
}

#[cfg(not(unix))]
fn is_cross_device(_err: &io::Error) -> bool {
    false
}

fn reject_copy_into_self(source: &Path, target: &Path) -> Result<()> {
    let source = fs::canonicalize(source).map_err(|e| Error::at(source, e))?;
    // Parent missing: create_dir_all will make it, and it cannot sit inside source.
    let Some(resolved) = resolve_entry(target) else {
        return Ok(());
    };
    if resolved.starts_with(&source) {
        return Err(Error::InvalidArgument(format!(
            "cannot copy {} into itself",
            source.display()
        )));
    }
    Ok(())
}

/// Absolute path of the directory entry itself: the parent is resolved, the last component is not.
fn resolve_entry(path: &Path) -> Option<PathBuf> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let parent = fs::canonicalize(parent).ok()?;
    Some(match path.file_name() {
        Some(name) => parent.join(name),
        None => parent,
    })
}

fn same_entry(a: &Path, b: &Path) -> bool {
    match (resolve_entry(a), resolve_entry(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Whether `a` and `b` reach the same data once links are followed (hard links included).
fn is_same_file(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (fs::metadata(a), fs::metadata(b)) {
        if same_inode(&a, &b) {
            return true;
        }
    }
    matches!((fs::canonicalize(a), fs::canonicalize(b)), (Ok(a), Ok(b)) if a == b)
}

#[cfg(unix)]
fn same_inode(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_inode(_a: &fs::Metadata, _b: &fs::Metadata) -> bool {
    false
}

fn same_file_error(a: &Path, b: &Path) -> Error {
    Error::InvalidArgument(format!("{} and {} are the same file", a.display(), b.display()))
}

fn ensure_exists(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(Error::NotFound(path.to_path_buf())),
        Err(err) => Err(Error::at(path, err)),
    }
}
