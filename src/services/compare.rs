//! File and directory comparison: chunked binary, positional line diff, rolling hash.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::core::errors::{Error, Result};
use crate::models::FileKind;
use crate::services::fs::content::open_lines;
use crate::services::fs::Walker;

const CHUNK_SIZE: usize = 8 * 1024;

/// Which comparisons to run. Binary is used when none is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareModes {
    pub binary: bool,
    pub diff: bool,
    pub hash: bool,
}

impl CompareModes {
    fn effective(self) -> CompareModes {
        if self.binary || self.diff || self.hash {
            self
        } else {
            CompareModes {
                binary: true,
                ..self
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOutcome {
    Identical,
    /// Byte offset of the first mismatch (or the length of the shorter file).
    Differ { offset: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDifference {
    Changed {
        line: usize,
        left: String,
        right: String,
    },
    ExtraLeft {
        line: usize,
        text: String,
    },
    ExtraRight {
        line: usize,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashOutcome {
    pub left: u64,
    pub right: u64,
}

impl HashOutcome {
    pub fn is_identical(&self) -> bool {
        self.left == self.right
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileComparison {
    pub binary: Option<BinaryOutcome>,
    pub diff: Option<Vec<LineDifference>>,
    pub hash: Option<HashOutcome>,
}

impl FileComparison {
    pub fn is_identical(&self) -> bool {
        self.binary.map_or(true, |b| b == BinaryOutcome::Identical)
            && self.diff.as_ref().map_or(true, Vec::is_empty)
            && self.hash.map_or(true, |h| h.is_identical())
    }
}

pub fn compare_files(left: &Path, right: &Path, modes: CompareModes) -> Result<FileComparison> {
    let modes = modes.effective();
    let mut comparison = FileComparison::default();
    if modes.binary {
        comparison.binary = Some(compare_binary(left, right)?);
    }
    if modes.diff {
        comparison.diff = Some(compare_lines(left, right)?);
    }
    if modes.hash {
        comparison.hash = Some(HashOutcome {
            left: rolling_hash(left)?,
            right: rolling_hash(right)?,
        });
    }
    tracing::debug!(
        left = %left.display(),
        right = %right.display(),
        identical = comparison.is_identical(),
        "compared files"
    );
    Ok(comparison)
}

pub fn compare_binary(left: &Path, right: &Path) -> Result<BinaryOutcome> {
    let mut left_reader = open_file(left)?;
    let mut right_reader = open_file(right)?;
    let mut left_buf = vec![0u8; CHUNK_SIZE];
    let mut right_buf = vec![0u8; CHUNK_SIZE];
    let mut offset = 0u64;

    loop {
        let left_len = read_chunk(&mut left_reader, &mut left_buf)?;
        let right_len = read_chunk(&mut right_reader, &mut right_buf)?;
        let common = left_len.min(right_len);
        if let Some(pos) = left_buf[..common]
            .iter()
            .zip(&right_buf[..common])
            .position(|(a, b)| a != b)
        {
            return Ok(BinaryOutcome::Differ {
                offset: offset + pos as u64,
            });
        }
        if left_len != right_len {
            return Ok(BinaryOutcome::Differ {
                offset: offset + common as u64,
            });
        }
        if left_len == 0 {
            return Ok(BinaryOutcome::Identical);
        }
        offset += left_len as u64;
    }
}

/// Positional line comparison: no alignment, every index compared against the same index.
pub fn compare_lines(left: &Path, right: &Path) -> Result<Vec<LineDifference>> {
    let mut left_lines = open_lines(left)?;
    let mut right_lines = open_lines(right)?;
    let mut differences = Vec::new();
    let mut line = 0;

    loop {
        line += 1;
        match (left_lines.next().transpose()?, right_lines.next().transpose()?) {
            (None, None) => break,
            (Some(l), Some(r)) if l == r => {}
            (Some(left), Some(right)) => differences.push(LineDifference::Changed { line, left, right }),
            (Some(text), None) => differences.push(LineDifference::ExtraLeft { line, text }),
            (None, Some(text)) => differences.push(LineDifference::ExtraRight { line, text }),
        }
    }
    Ok(differences)
}

/// `hash = hash * 31 + byte` over the whole file, wrapping. A checksum, not a digest.
pub fn rolling_hash(path: &Path) -> Result<u64> {
    let mut reader = open_file(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut hash = 0u64;
    loop {
        let len = read_chunk(&mut reader, &mut buf)?;
        if len == 0 {
            return Ok(hash);
        }
        hash = buf[..len]
            .iter()
            .fold(hash, |acc, &byte| acc.wrapping_mul(31).wrapping_add(u64::from(byte)));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeDifference {
    OnlyLeft(PathBuf),
    OnlyRight(PathBuf),
    /// Same relative path, different entry kinds.
    KindMismatch(PathBuf),
    Content(PathBuf),
}

impl TreeDifference {
    pub fn path(&self) -> &Path {
        match self {
            TreeDifference::OnlyLeft(p)
            | TreeDifference::OnlyRight(p)
            | TreeDifference::KindMismatch(p)
            | TreeDifference::Content(p) => p,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeComparison {
    pub files_compared: usize,
    pub differences: Vec<TreeDifference>,
}

impl TreeComparison {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Compares two directory trees entry by entry at matching relative paths.
pub fn compare_trees(left: &Path, right: &Path, modes: CompareModes) -> Result<TreeComparison> {
    for root in [left, right] {
        let metadata = fs::metadata(root).map_err(|e| Error::at(root, e))?;
        if !metadata.is_dir() {
            return Err(Error::NotADirectory(root.to_path_buf()));
        }
    }

    let mut result = TreeComparison::default();
    let mut pruned: Vec<PathBuf> = Vec::new();

    for entry in Walker::new(left) {
        let entry = entry?;
        let relative = entry.relative().to_path_buf();
        if pruned.iter().any(|p| relative.starts_with(p)) {
            continue;
        }
        let left_kind = entry.kind();
        let counterpart = right.join(&relative);
        let right_kind = match fs::symlink_metadata(&counterpart) {
            Ok(md) => FileKind::from_file_type(md.file_type()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                result.differences.push(TreeDifference::OnlyLeft(relative.clone()));
                pruned.push(relative);
                continue;
            }
            Err(err) => return Err(Error::at(counterpart, err)),
        };

        if left_kind != right_kind {
            result.differences.push(TreeDifference::KindMismatch(relative.clone()));
            pruned.push(relative);
            continue;
        }

        match left_kind {
            FileKind::File => {
                result.files_compared += 1;
                if !compare_files(entry.path(), &counterpart, modes)?.is_identical() {
                    result.differences.push(TreeDifference::Content(relative));
                }
            }
            FileKind::Symlink => {
                let same_target = fs::read_link(entry.path()).ok() == fs::read_link(&counterpart).ok();
                if !same_target {
                    result.differences.push(TreeDifference::Content(relative));
                }
            }
            FileKind::Dir | FileKind::Other => {}
        }
    }

    let mut pruned_right: Vec<PathBuf> = Vec::new();
    for entry in Walker::new(right) {
        let entry = entry?;
        let relative = entry.relative();
        if pruned_right.iter().any(|p| relative.starts_with(p)) {
            continue;
        }
        if fs::symlink_metadata(left.join(relative)).is_err() {
            result
                .differences
                .push(TreeDifference::OnlyRight(relative.to_path_buf()));
            pruned_right.push(relative.to_path_buf());
        }
    }

    result.differences.sort_by(|a, b| a.path().cmp(b.path()));
    tracing::debug!(
        left = %left.display(),
        right = %right.display(),
        compared = result.files_compared,
        differences = result.differences.len(),
        "compared trees"
    );
    Ok(result)
}

fn open_file(path: &Path) -> Result<BufReader<File>> {
    if fs::metadata(path).map_err(|e| Error::at(path, e))?.is_dir() {
        return Err(Error::IsADirectory(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| Error::at(path, e))?;
    Ok(BufReader::new(file))
}

// Fills `buf` unless EOF comes first, so both sides always compare equal-sized chunks.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}
