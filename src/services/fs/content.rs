use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::errors::{Error, Result};

/// Lossy UTF-8 lines of a file, terminators stripped. Invalid bytes never abort a read.
pub struct Lines {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

impl Iterator for Lines {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Result<String>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(err) => Some(Err(err.into())),
        }
    }
}

pub fn open_lines(path: &Path) -> Result<Lines> {
    if fs::metadata(path).map_err(|e| Error::at(path, e))?.is_dir() {
        return Err(Error::IsADirectory(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| Error::at(path, e))?;
    Ok(Lines {
        reader: BufReader::new(file),
        buf: Vec::new(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSelection {
    #[default]
    All,
    Head(usize),
    Tail(usize),
    /// 1-based, inclusive on both ends.
    Range { start: usize, end: Option<usize> },
}

impl LineSelection {
    /// Parses `A:B`, `A:` or `:B`.
    pub fn parse_range(value: &str) -> Result<LineSelection> {
        let invalid = || Error::InvalidArgument(format!("'{value}' is not a line range (A:B)"));
        let (start, end) = value.split_once(':').ok_or_else(invalid)?;
        let start = match start.trim() {
            "" => 1,
            s => s.parse::<usize>().map_err(|_| invalid())?,
        };
        let end = match end.trim() {
            "" => None,
            s => Some(s.parse::<usize>().map_err(|_| invalid())?),
        };
        if start == 0 || end.is_some_and(|end| end < start) {
            return Err(invalid());
        }
        Ok(LineSelection::Range { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

pub fn read_lines(path: &Path, selection: LineSelection) -> Result<Vec<NumberedLine>> {
    let numbered = open_lines(path)?
        .enumerate()
        .map(|(idx, line)| line.map(|text| NumberedLine { number: idx + 1, text }));

    match selection {
        LineSelection::All => numbered.collect(),
        LineSelection::Head(count) => numbered.take(count).collect(),
        LineSelection::Tail(count) => {
            let mut window = VecDeque::with_capacity(count);
            for line in numbered {
                let line = line?;
                if count == 0 {
                    continue;
                }
                if window.len() == count {
                    window.pop_front();
                }
                window.push_back(line);
            }
            Ok(window.into_iter().collect())
        }
        LineSelection::Range { start, end } => {
            let mut out = Vec::new();
            for line in numbered.skip(start - 1) {
                let line = line?;
                if end.is_some_and(|end| line.number > end) {
                    break;
                }
                out.push(line);
            }
            Ok(out)
        }
    }
}
