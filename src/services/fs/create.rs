use std::fs::{self, DirBuilder, File};
use std::path::Path;

use crate::core::errors::{Error, Result};
use crate::models::FileKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EntryType {
    #[default]
    File,
    #[value(alias = "directory")]
    Dir,
}

impl EntryType {
    pub fn matches(&self, kind: FileKind) -> bool {
        match self {
            EntryType::File => kind == FileKind::File,
            EntryType::Dir => kind == FileKind::Dir,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions {
    pub kind: EntryType,
    /// Create missing parent directories.
    pub parents: bool,
    /// Truncate an existing file / accept an existing directory.
    pub force: bool,
}

pub fn create_path(path: &Path, opts: CreateOptions) -> Result<()> {
    let existing = fs::symlink_metadata(path).ok();
    if let Some(existing) = &existing {
        if !opts.force {
            return Err(Error::AlreadyExists(path.to_path_buf()));
        }
        let kind = FileKind::from_file_type(existing.file_type());
        if !opts.kind.matches(kind) {
            return Err(Error::InvalidArgument(format!(
                "{} exists as a {}",
                path.display(),
                kind.as_str()
            )));
        }
    }

    if opts.parents {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::at(parent, e))?;
        }
    }

    match opts.kind {
        EntryType::File => {
            File::create(path).map_err(|e| Error::at(path, e))?;
        }
        EntryType::Dir if existing.is_some() => {}
        EntryType::Dir => {
            dir_builder().create(path).map_err(|e| Error::at(path, e))?;
        }
    }

    tracing::info!(path = %path.display(), kind = ?opts.kind, "created");
    Ok(())
}

#[cfg(unix)]
fn dir_builder() -> DirBuilder {
    use std::os::unix::fs::DirBuilderExt;
    let mut builder = DirBuilder::new();
    builder.mode(0o755);
    builder
}

#[cfg(not(unix))]
fn dir_builder() -> DirBuilder {
    DirBuilder::new()
}
