use std::fs;
use std::path::{Path, PathBuf};

use super::walk::Walker;
use crate::core::errors::{Error, Result};
use crate::models::FileKind;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    pub path: PathBuf,
    pub bytes: u64,
    /// Regular files summed; 1 for a plain stat.
    pub files: u64,
    pub aggregated: bool,
}

/// `st_size` of `path`, or with `total` the sum over every regular file below a directory.
pub fn path_size(path: &Path, total: bool) -> Result<SizeReport> {
    let metadata = fs::metadata(path).map_err(|e| Error::at(path, e))?;
    if !(total && metadata.is_dir()) {
        return Ok(SizeReport {
            path: path.to_path_buf(),
            bytes: metadata.len(),
            files: 1,
            aggregated: false,
        });
    }

    let mut bytes = 0u64;
    let mut files = 0u64;
    for entry in Walker::new(path) {
        let entry = entry?;
        if entry.kind() == FileKind::File {
            bytes += entry.metadata()?.len();
            files += 1;
        }
    }
    tracing::debug!(path = %path.display(), bytes, files, "summed directory");
    Ok(SizeReport {
        path: path.to_path_buf(),
        bytes,
        files,
        aggregated: true,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub free: u64,
    /// Free space usable by unprivileged users.
    pub available: u64,
    pub used: u64,
}

impl DiskUsage {
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 * 100.0 / self.total as f64
        }
    }
}

#[cfg(unix)]
pub fn disk_usage(path: &Path) -> Result<DiskUsage> {
    let stat = rustix::fs::statvfs(path).map_err(|e| Error::at(path, e.into()))?;
    let block = if stat.f_frsize > 0 {
        stat.f_frsize as u64
    } else {
        stat.f_bsize as u64
    };
    let total = stat.f_blocks as u64 * block;
    let free = stat.f_bfree as u64 * block;
    Ok(DiskUsage {
        total,
        free,
        available: stat.f_bavail as u64 * block,
        used: total.saturating_sub(free),
    })
}

#[cfg(not(unix))]
pub fn disk_usage(_path: &Path) -> Result<DiskUsage> {
    Err(Error::Unsupported("disk usage"))
}

/// `1536` → `"1536 bytes"`, or `"1.50 KB"` when `human` is set.
pub fn format_size(bytes: u64, human: bool) -> String {
    if !human {
        return format!("{bytes} bytes");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}
