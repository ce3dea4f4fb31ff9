use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use crate::core::errors::{Error, Result};
use crate::models::{FileEntry, FileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    Name,
    Size,
    #[value(alias = "modified")]
    Time,
    Type,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListParams {
    pub include_hidden: bool,
    pub sort: SortKey,
    pub reverse: bool,
}

/// Reads one directory level. Directories sort before files, then by `params.sort`.
pub fn list_dir(path: &Path, params: ListParams) -> Result<Vec<FileEntry>> {
    let metadata = fs::metadata(path).map_err(|e| Error::at(path, e))?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| Error::at(path, e))? {
        let entry = entry?;
        let entry_path = entry.path();
        let file_entry = match fs::symlink_metadata(&entry_path) {
            Ok(md) => FileEntry::from_metadata(&entry_path, &md),
            Err(err) => {
                tracing::warn!(path = %entry_path.display(), "stat failed: {err}");
                continue;
            }
        };
        if !params.include_hidden && file_entry.is_hidden() {
            continue;
        }
        entries.push(file_entry);
    }

    sort_entries(&mut entries, params.sort, !params.reverse);
    tracing::debug!(path = %path.display(), count = entries.len(), "listed directory");
    Ok(entries)
}

pub fn sort_entries(entries: &mut [FileEntry], key: SortKey, asc: bool) {
    entries.sort_by(|a, b| {
        match b.is_dir().cmp(&a.is_dir()) {
            Ordering::Equal => {
                let order = match key {
                    SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                    SortKey::Size => a.size.cmp(&b.size),
                    SortKey::Time => a.modified.cmp(&b.modified),
                    SortKey::Type => get_extension(&a.name, a.kind)
                        .cmp(&get_extension(&b.name, b.kind)),
                };
                // Stable tiebreak so equal keys still list deterministically.
                let order = order.then_with(|| a.name.cmp(&b.name));
                if asc {
                    order
                } else {
                    order.reverse()
                }
            }
            kind_order => kind_order,
        }
    });
}

pub fn get_extension(name: &str, kind: FileKind) -> String {
    match kind {
        FileKind::Dir => "0_dir".to_string(),
        FileKind::File => Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "zzz_noext".to_string()),
        other => other.as_str().to_string(),
    }
}
