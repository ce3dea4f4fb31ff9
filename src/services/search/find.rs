use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::Matcher;
use crate::core::errors::{Error, Result};
use crate::models::{FileEntry, FileKind};
use crate::services::fs::create::EntryType;
use crate::services::fs::Walker;

/// `min:N` / `max:N`, bytes, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFilter {
    Min(u64),
    Max(u64),
}

impl SizeFilter {
    pub fn accepts(&self, size: u64) -> bool {
        match *self {
            SizeFilter::Min(min) => size >= min,
            SizeFilter::Max(max) => size <= max,
        }
    }
}

impl FromStr for SizeFilter {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let (bound, amount) = value
            .split_once(':')
            .ok_or_else(|| format!("expected min:N or max:N, got '{value}'"))?;
        let amount: u64 = amount
            .trim()
            .parse()
            .map_err(|_| format!("'{amount}' is not a byte count"))?;
        match bound {
            "min" => Ok(SizeFilter::Min(amount)),
            "max" => Ok(SizeFilter::Max(amount)),
            other => Err(format!("unknown size bound '{other}', expected min or max")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FindRequest<'a> {
    pub root: &'a Path,
    pub pattern: &'a str,
    pub kind: Option<EntryType>,
    pub size: Option<SizeFilter>,
    pub include_hidden: bool,
    pub ignore_case: bool,
    /// Descend below the first level.
    pub recursive: bool,
}

impl<'a> FindRequest<'a> {
    pub fn new(root: &'a Path, pattern: &'a str) -> FindRequest<'a> {
        FindRequest {
            root,
            pattern,
            kind: None,
            size: None,
            include_hidden: false,
            ignore_case: false,
            recursive: false,
        }
    }
}

/// Entries whose name contains the pattern. Type and size are read with `stat`, so
/// symlinks are judged by what they point to; dangling links never match.
pub fn find_entries(request: &FindRequest<'_>) -> Result<Vec<FileEntry>> {
    let root = request.root;
    if !fs::metadata(root).map_err(|e| Error::at(root, e))?.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let matcher = Matcher::new(request.pattern, request.ignore_case);
    let mut walker = Walker::new(root).include_hidden(request.include_hidden);
    if !request.recursive {
        walker = walker.max_depth(1);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry?;
        let name = entry
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !matcher.is_match(&name) {
            continue;
        }
        let Ok(metadata) = fs::metadata(entry.path()) else {
            tracing::debug!(path = %entry.path().display(), "skipping unreadable entry");
            continue;
        };
        let kind = FileKind::from_file_type(metadata.file_type());
        if request.kind.is_some_and(|wanted| !wanted.matches(kind)) {
            continue;
        }
        if request.size.is_some_and(|filter| !filter.accepts(metadata.len())) {
            continue;
        }
        found.push(FileEntry::from_metadata(entry.path(), &metadata));
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(root = %root.display(), pattern = request.pattern, hits = found.len(), "find");
    Ok(found)
}
