use std::ffi::OsStr;
use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl FileKind {
    pub fn from_file_type(file_type: FileType) -> FileKind {
        if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Dir
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Dir => "dir",
            FileKind::Symlink => "symlink",
            FileKind::Other => "other",
        }
    }

    fn type_char(&self) -> char {
        match self {
            FileKind::File => '-',
            FileKind::Dir => 'd',
            FileKind::Symlink => 'l',
            FileKind::Other => '?',
        }
    }
}

/// A single filesystem entry as reported by `lstat`. Never cached.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: FileKind,
    pub size: u64,
    /// Permission bits (`0o7777` mask on unix).
    pub mode: u32,
    /// Seconds since the unix epoch, 0 when the platform does not report it.
    pub modified: u64,
    pub accessed: u64,
}

impl FileEntry {
    /// Builds an entry from `lstat` metadata, so a symlink describes the link itself.
    pub fn from_metadata(path: &Path, metadata: &Metadata) -> FileEntry {
        let name = path
            .file_name()
            .map(os_str_to_string)
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        FileEntry {
            name,
            path: path.to_path_buf(),
            kind: FileKind::from_file_type(metadata.file_type()),
            size: metadata.len(),
            mode: permission_bits(metadata),
            modified: epoch_secs(metadata.modified().ok()),
            accessed: epoch_secs(metadata.accessed().ok()),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// `ls -l` style mode string, e.g. `drwxr-xr-x`.
    pub fn permissions_string(&self) -> String {
        format_mode(self.kind, self.mode)
    }
}

pub fn format_mode(kind: FileKind, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(kind.type_char());
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

fn epoch_secs(time: Option<SystemTime>) -> u64 {
    time.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn os_str_to_string(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}
