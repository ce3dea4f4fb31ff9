use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::core::errors::{Error, Result};
use crate::models::{FileEntry, FileKind};

#[derive(Debug, Clone)]
pub struct MetaReport {
    pub entry: FileEntry,
    pub created: Option<u64>,
    pub link_target: Option<PathBuf>,
}

pub fn inspect(path: &Path) -> Result<MetaReport> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::at(path, e))?;
    let entry = FileEntry::from_metadata(path, &metadata);
    let created = metadata
        .created()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());
    let link_target = match entry.kind {
        FileKind::Symlink => fs::read_link(path).ok(),
        _ => None,
    };
    Ok(MetaReport {
        entry,
        created,
        link_target,
    })
}

/// Absolute location of an existing path, symlinks resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    pub kind: FileKind,
}

pub fn locate(path: &Path) -> Result<Location> {
    let canonical = fs::canonicalize(path).map_err(|e| Error::at(path, e))?;
    let metadata = fs::metadata(&canonical).map_err(|e| Error::at(&canonical, e))?;
    Ok(Location {
        path: canonical,
        kind: FileKind::from_file_type(metadata.file_type()),
    })
}

/// UTC `YYYY-MM-DD HH:MM:SS`; `-` for timestamps the platform did not report.
pub fn format_timestamp(secs: u64) -> String {
    if secs == 0 {
        return "-".to_string();
    }
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    i64::try_from(secs)
        .ok()
        .and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok())
        .and_then(|t| t.format(&format).ok())
        .unwrap_or_else(|| "-".to_string())
}

/// Parses an octal permission string such as `755` or `0640`.
pub fn parse_mode(value: &str) -> Result<u32> {
    let trimmed = value.trim_start_matches("0o");
    let mode = u32::from_str_radix(trimmed, 8)
        .map_err(|_| Error::InvalidArgument(format!("'{value}' is not an octal mode")))?;
    if mode > 0o7777 {
        return Err(Error::InvalidArgument(format!("mode '{value}' out of range")));
    }
    Ok(mode)
}

#[cfg(unix)]
pub fn change_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::at(path, e))?;
    tracing::info!(path = %path.display(), mode = %format!("{mode:o}"), "changed mode");
    Ok(())
}

#[cfg(not(unix))]
pub fn change_mode(_path: &Path, _mode: u32) -> Result<()> {
    Err(Error::Unsupported("chmod"))
}

/// Numeric ownership: `UID`, `UID:GID`, `UID:` or `:GID`. Missing halves stay unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

impl std::str::FromStr for Owner {
    type Err = Error;

    fn from_str(value: &str) -> Result<Owner> {
        let invalid = || Error::InvalidArgument(format!("'{value}' is not UID[:GID] (numeric ids)"));
        let (uid, gid) = value.split_once(':').unwrap_or((value, ""));
        let id = |part: &str| -> Result<Option<u32>> {
            if part.is_empty() {
                return Ok(None);
            }
            part.parse().map(Some).map_err(|_| invalid())
        };
        let owner = Owner {
            uid: id(uid)?,
            gid: id(gid)?,
        };
        if owner.uid.is_none() && owner.gid.is_none() {
            return Err(invalid());
        }
        Ok(owner)
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(uid) = self.uid {
            write!(f, "{uid}")?;
        }
        if let Some(gid) = self.gid {
            write!(f, ":{gid}")?;
        }
        Ok(())
    }
}

#[cfg(unix)]
pub fn change_owner(path: &Path, owner: Owner) -> Result<()> {
    std::os::unix::fs::chown(path, owner.uid, owner.gid).map_err(|e| Error::at(path, e))?;
    tracing::info!(path = %path.display(), %owner, "changed owner");
    Ok(())
}

#[cfg(not(unix))]
pub fn change_owner(_path: &Path, _owner: Owner) -> Result<()> {
    Err(Error::Unsupported("ownership"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_octal_modes() -> Result<()> {
        assert_eq!(parse_mode("755")?, 0o755);
        assert_eq!(parse_mode("0640")?, 0o640);
        assert!(matches!(parse_mode("9"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_mode("77777"), Err(Error::InvalidArgument(_))));
        Ok(())
    }

    #[test]
    fn formats_epoch_seconds() {
        assert_eq!(format_timestamp(1_000_000_000), "2001-09-09 01:46:40");
        assert_eq!(format_timestamp(0), "-");
    }

    #[test]
    fn locate_resolves_relative_segments() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("f.txt"), "f")?;

        let location = locate(&dir.path().join("sub/../f.txt"))?;
        assert_eq!(location.kind, FileKind::File);
        assert_eq!(location.path, fs::canonicalize(dir.path().join("f.txt"))?);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn change_mode_updates_permissions() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("f");
        fs::write(&file, "")?;

        change_mode(&file, 0o600)?;
        assert_eq!(inspect(&file)?.entry.mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn parses_numeric_owners() -> Result<()> {
        let both: Owner = "1000:100".parse()?;
        assert_eq!(both, Owner { uid: Some(1000), gid: Some(100) });
        let uid_only: Owner = "0".parse()?;
        assert_eq!(uid_only, Owner { uid: Some(0), gid: None });
        let gid_only: Owner = ":50".parse()?;
        assert_eq!(gid_only, Owner { uid: None, gid: Some(50) });
        assert_eq!(both.to_string(), "1000:100");
        assert_eq!(gid_only.to_string(), ":50");

        for bad in ["", ":", "root", "1000:staff", "-1"] {
            assert!(matches!(bad.parse::<Owner>(), Err(Error::InvalidArgument(_))), "{bad}");
        }
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn change_owner_to_current_ids() -> Result<()> {
        use std::os::unix::fs::MetadataExt;
        let dir = TempDir::new()?;
        let file = dir.path().join("f");
        fs::write(&file, "")?;
        let before = fs::metadata(&file)?;

        let owner = Owner {
            uid: Some(before.uid()),
            gid: Some(before.gid()),
        };
        change_owner(&file, owner)?;
        let after = fs::metadata(&file)?;
        assert_eq!((after.uid(), after.gid()), (before.uid(), before.gid()));

        let missing = change_owner(&dir.path().join("nope"), owner);
        assert!(matches!(missing, Err(Error::NotFound(_))));
        Ok(())
    }
}
