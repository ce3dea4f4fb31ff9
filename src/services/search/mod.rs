pub mod find;

use std::path::{Path, PathBuf};

use crate::core::errors::Result;
use crate::services::fs::content::open_lines;

pub use find::{find_entries, FindRequest, SizeFilter};

/// Plain substring matcher, optionally case-insensitive. An empty pattern matches everything.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    ignore_case: bool,
}

impl Matcher {
    pub fn new(pattern: &str, ignore_case: bool) -> Matcher {
        let pattern = if ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        Matcher {
            pattern,
            ignore_case,
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        if self.ignore_case {
            haystack.to_lowercase().contains(&self.pattern)
        } else {
            haystack.contains(&self.pattern)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub path: PathBuf,
    pub line_number: usize,
    pub line_content: String,
}

/// Every line of `path` containing `pattern`, with 1-based line numbers.
pub fn search_file(path: &Path, pattern: &str, ignore_case: bool) -> Result<Vec<SearchResult>> {
    let matcher = Matcher::new(pattern, ignore_case);
    let mut results = Vec::new();
    for (idx, line) in open_lines(path)?.enumerate() {
        let line = line?;
        if matcher.is_match(&line) {
            results.push(SearchResult {
                path: path.to_path_buf(),
                line_number: idx + 1,
                line_content: line,
            });
        }
    }
    tracing::debug!(path = %path.display(), pattern, hits = results.len(), "searched file");
    Ok(results)
}
