use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    #[error("already exists: {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
    #[error("is a directory: {}", .0.display())]
    IsADirectory(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("trash error: {0}")]
    Trash(#[from] trash::Error),
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps an io error raised for `path`, mapping `NotFound` to the path-aware variant.
    pub fn at(path: impl Into<PathBuf>, err: std::io::Error) -> Error {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.into()),
            std::io::ErrorKind::AlreadyExists => Error::AlreadyExists(path.into()),
            _ => {
                let path = path.into();
                Error::Io(std::io::Error::new(
                    err.kind(),
                    format!("{}: {err}", path.display()),
                ))
            }
        }
    }

    /// Wraps an io error raised by a two-path operation such as rename or link.
    pub fn between(from: &std::path::Path, to: &std::path::Path, err: std::io::Error) -> Error {
        Error::Io(std::io::Error::new(
            err.kind(),
            format!("{} -> {}: {err}", from.display(), to.display()),
        ))
    }
}
