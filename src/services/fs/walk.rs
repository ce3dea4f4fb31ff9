//! Lazy depth-first traversal shared by delete, tree, compare, copy, find and size.
//!
//! Symlinks are reported as leaves and never followed, so a walk cannot cycle.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::errors::{Error, Result};
use crate::models::{FileEntry, FileKind};

/// Configures a walk below `root`. Restartable: every `into_iter` reopens the tree.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    max_depth: Option<usize>,
    contents_first: bool,
    include_root: bool,
    include_hidden: bool,
}

impl Walker {
    pub fn new(root: impl Into<PathBuf>) -> Walker {
        Walker {
            root: root.into(),
            max_depth: None,
            contents_first: false,
            include_root: false,
            include_hidden: true,
        }
    }

    /// Stops descending once an entry sits deeper than `depth` (root children are depth 1).
    pub fn max_depth(mut self, depth: usize) -> Walker {
        self.max_depth = Some(depth);
        self
    }

    /// Yields a directory after everything below it (post-order).
    pub fn contents_first(mut self, yes: bool) -> Walker {
        self.contents_first = yes;
        self
    }

    pub fn include_root(mut self, yes: bool) -> Walker {
        self.include_root = yes;
        self
    }

    /// When false, dot-entries and everything below them are skipped.
    pub fn include_hidden(mut self, yes: bool) -> Walker {
        self.include_hidden = yes;
        self
    }
}

impl IntoIterator for Walker {
    type Item = Result<WalkEntry>;
    type IntoIter = Walk;

    fn into_iter(self) -> Walk {
        let mut walkdir = WalkDir::new(&self.root)
            .follow_links(false)
            .contents_first(self.contents_first)
            .min_depth(if self.include_root { 0 } else { 1 })
            .sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walkdir = walkdir.max_depth(depth);
        }

        let include_hidden = self.include_hidden;
        let inner = walkdir.into_iter().filter_entry(move |entry| {
            include_hidden || entry.depth() == 0 || !is_hidden_name(entry.file_name())
        });

        Walk {
            root: self.root,
            inner: Box::new(inner),
        }
    }
}

pub struct Walk {
    root: PathBuf,
    inner: Box<dyn Iterator<Item = walkdir::Result<walkdir::DirEntry>>>,
}

impl Iterator for Walk {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Result<WalkEntry>> {
        let next = self.inner.next()?;
        Some(match next {
            Ok(entry) => {
                let relative = entry
                    .path()
                    .strip_prefix(&self.root)
                    .map(Path::to_path_buf)
                    .unwrap_or_default();
                tracing::trace!(path = %entry.path().display(), "walk");
                Ok(WalkEntry { entry, relative })
            }
            Err(err) => Err(walk_error(err)),
        })
    }
}

/// One entry produced by a [`Walk`].
#[derive(Debug)]
pub struct WalkEntry {
    entry: walkdir::DirEntry,
    relative: PathBuf,
}

impl WalkEntry {
    pub fn path(&self) -> &Path {
        self.entry.path()
    }

    /// Path relative to the walk root; empty for the root itself.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn depth(&self) -> usize {
        self.entry.depth()
    }

    pub fn kind(&self) -> FileKind {
        FileKind::from_file_type(self.entry.file_type())
    }

    pub fn metadata(&self) -> Result<Metadata> {
        self.entry.metadata().map_err(walk_error)
    }

    pub fn to_file_entry(&self) -> Result<FileEntry> {
        let metadata = self.metadata()?;
        Ok(FileEntry::from_metadata(self.path(), &metadata))
    }
}

pub(crate) fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

fn walk_error(err: walkdir::Error) -> Error {
    let not_found = err
        .io_error()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false);
    match err.path() {
        Some(path) if not_found => Error::NotFound(path.to_path_buf()),
        _ => Error::Walk(err),
    }
}
