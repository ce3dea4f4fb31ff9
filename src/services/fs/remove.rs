use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::walk::Walker;
use crate::core::errors::{Error, Result};
use crate::models::FileKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// A missing target is not an error.
    pub force: bool,
    pub recursive: bool,
    /// Hand the target to the platform trash instead of unlinking it.
    pub trash: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteSummary {
    pub files: u64,
    pub dirs: u64,
    pub trashed: bool,
    /// The target did not exist and `force` was set.
    pub missing: bool,
}

pub fn delete_path(target: &Path, opts: DeleteOptions) -> Result<DeleteSummary> {
    let metadata = match fs::symlink_metadata(target) {
        Ok(md) => md,
        Err(err) if err.kind() == ErrorKind::NotFound && opts.force => {
            tracing::debug!(path = %target.display(), "nothing to delete");
            return Ok(DeleteSummary {
                missing: true,
                ..DeleteSummary::default()
            });
        }
        Err(err) => return Err(Error::at(target, err)),
    };

    let is_dir = metadata.is_dir();
    if is_dir && !opts.recursive && !is_empty_dir(target)? {
        return Err(Error::IsADirectory(target.to_path_buf()));
    }

    if opts.trash {
        trash::delete(target)?;
        tracing::info!(path = %target.display(), "moved to trash");
        return Ok(DeleteSummary {
            trashed: true,
            ..DeleteSummary::default()
        });
    }

    if is_dir {
        return remove_tree(target);
    }

    fs::remove_file(target).map_err(|e| Error::at(target, e))?;
    tracing::info!(path = %target.display(), "deleted file");
    Ok(DeleteSummary {
        files: 1,
        ..DeleteSummary::default()
    })
}

/// Removes whatever is at `path`, recursing into directories.
pub fn remove_any(path: &Path) -> Result<()> {
    let opts = DeleteOptions {
        recursive: true,
        ..DeleteOptions::default()
    };
    delete_path(path, opts).map(|_| ())
}

// Post-order: every directory is empty by the time it is reached. The first
// failure aborts the walk and leaves already-removed entries removed.
fn remove_tree(root: &Path) -> Result<DeleteSummary> {
    let mut summary = DeleteSummary::default();
    let walker = Walker::new(root).contents_first(true).include_root(true);
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        match entry.kind() {
            FileKind::Dir => {
                fs::remove_dir(path).map_err(|e| Error::at(path, e))?;
                summary.dirs += 1;
            }
            _ => {
                fs::remove_file(path).map_err(|e| Error::at(path, e))?;
                summary.files += 1;
            }
        }
    }
    tracing::info!(
        path = %root.display(),
        files = summary.files,
        dirs = summary.dirs,
        "deleted tree"
    );
    Ok(summary)
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path).map_err(|e| Error::at(path, e))?;
    Ok(entries.next().is_none())
}
