use std::fs;
use std::path::{Path, PathBuf};

use super::walk::Walker;
use crate::core::errors::{Error, Result};
use crate::models::FileKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeOptions {
    /// Deepest level rendered; root children are level 1.
    pub max_depth: Option<usize>,
    pub include_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub depth: usize,
    pub name: String,
    pub kind: FileKind,
    /// Last child of its parent.
    pub is_last: bool,
    pub link_target: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeReport {
    pub root: PathBuf,
    pub nodes: Vec<TreeNode>,
    pub dirs: usize,
    pub files: usize,
}

pub fn build_tree(root: &Path, opts: TreeOptions) -> Result<TreeReport> {
    let metadata = fs::metadata(root).map_err(|e| Error::at(root, e))?;
    if !metadata.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let mut walker = Walker::new(root).include_hidden(opts.include_hidden);
    if let Some(depth) = opts.max_depth {
        walker = walker.max_depth(depth);
    }

    let mut nodes = Vec::new();
    let (mut dirs, mut files) = (0, 0);
    for entry in walker {
        let entry = entry?;
        let kind = entry.kind();
        match kind {
            FileKind::Dir => dirs += 1,
            _ => files += 1,
        }
        let link_target = match kind {
            FileKind::Symlink => fs::read_link(entry.path()).ok(),
            _ => None,
        };
        nodes.push(TreeNode {
            depth: entry.depth(),
            name: entry
                .path()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            kind,
            is_last: false,
            link_target,
        });
    }
    mark_last_children(&mut nodes);

    Ok(TreeReport {
        root: root.to_path_buf(),
        nodes,
        dirs,
        files,
    })
}

// Walking backwards, a node is the last child unless a sibling at the same
// depth was seen before reaching a shallower node.
fn mark_last_children(nodes: &mut [TreeNode]) {
    let mut sibling_seen: Vec<bool> = Vec::new();
    for node in nodes.iter_mut().rev() {
        let depth = node.depth;
        if sibling_seen.len() <= depth {
            sibling_seen.resize(depth + 1, false);
        }
        node.is_last = !sibling_seen[depth];
        sibling_seen[depth] = true;
        for deeper in sibling_seen.iter_mut().skip(depth + 1) {
            *deeper = false;
        }
    }
}

impl TreeReport {
    /// Rendered lines, root first, with `├──`/`└──` connectors.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.nodes.len() + 1);
        lines.push(self.root.display().to_string());

        let mut ancestors_last: Vec<bool> = Vec::new();
        for node in &self.nodes {
            ancestors_last.truncate(node.depth.saturating_sub(1));
            let mut line = String::new();
            for last in &ancestors_last {
                line.push_str(if *last { "    " } else { "│   " });
            }
            line.push_str(if node.is_last { "└── " } else { "├── " });
            line.push_str(&node.name);
            match (&node.kind, &node.link_target) {
                (FileKind::Dir, _) => line.push('/'),
                (FileKind::Symlink, Some(target)) => {
                    line.push_str(" -> ");
                    line.push_str(&target.display().to_string());
                }
                _ => {}
            }
            lines.push(line);
            ancestors_last.push(node.is_last);
        }
        lines
    }

    pub fn summary(&self) -> String {
        let dir_word = if self.dirs == 1 { "directory" } else { "directories" };
        let file_word = if self.files == 1 { "file" } else { "files" };
        format!("{} {dir_word}, {} {file_word}", self.dirs, self.files)
    }
}
