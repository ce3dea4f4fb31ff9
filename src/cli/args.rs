use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::services::fs::create::EntryType;
use crate::services::fs::listing::SortKey;
use crate::services::fs::meta::Owner;
use crate::services::fs::transfer::LinkKind;
use crate::services::search::SizeFilter;

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Overwrite an existing destination
    #[arg(short, long)]
    pub force: bool,
    /// Copy an existing destination to <destination>.bak first
    #[arg(short, long)]
    pub backup: bool,
    /// Ask before overwriting
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    /// Overwrite an existing target
    #[arg(short, long)]
    pub force: bool,
    /// Copy an existing target to <new>.bak first
    #[arg(short, long)]
    pub backup: bool,
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Overwrite an existing destination
    #[arg(short, long)]
    pub force: bool,
    /// Copy directories and their contents
    #[arg(short, long)]
    pub recursive: bool,
    /// Keep permissions and timestamps
    #[arg(short, long)]
    pub preserve: bool,
    /// Create a link instead of copying
    #[arg(long, value_enum)]
    pub link: Option<LinkKind>,
    /// Ask before overwriting
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub target: PathBuf,
    /// Ignore a missing target and never ask
    #[arg(short, long)]
    pub force: bool,
    /// Remove directories and their contents
    #[arg(short, long)]
    pub recursive: bool,
    /// Ask before deleting
    #[arg(short, long)]
    pub interactive: bool,
    /// Move to the trash instead of deleting
    #[arg(short, long)]
    pub trash: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(default_value = ".")]
    pub directory: PathBuf,
    /// Include hidden entries
    #[arg(short, long)]
    pub all: bool,
    /// Show kind, permissions, size and modification time
    #[arg(short, long)]
    pub long: bool,
    #[arg(long, value_enum, default_value_t = SortKey::Name)]
    pub sort: SortKey,
    /// Reverse the sort order
    #[arg(short, long)]
    pub reverse: bool,
    #[arg(long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,
    /// Sizes in KB/MB/GB
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub file: PathBuf,
    /// First N lines
    #[arg(long, value_name = "N", conflicts_with_all = ["tail", "lines"])]
    pub head: Option<usize>,
    /// Last N lines
    #[arg(long, value_name = "N", conflicts_with = "lines")]
    pub tail: Option<usize>,
    /// Inclusive 1-based range, e.g. 10:20 or 10:
    #[arg(long, value_name = "A:B")]
    pub lines: Option<String>,
    /// Prefix line numbers
    #[arg(short, long)]
    pub number: bool,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    pub directory: PathBuf,
    pub pattern: String,
    #[arg(long = "type", value_enum)]
    pub kind: Option<EntryType>,
    /// min:N or max:N, in bytes
    #[arg(long, value_name = "BOUND:N")]
    pub size: Option<SizeFilter>,
    /// Include hidden entries
    #[arg(long)]
    pub hidden: bool,
    #[arg(short, long)]
    pub ignore_case: bool,
    /// Search subdirectories too
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub file: PathBuf,
    pub pattern: String,
    #[arg(short, long)]
    pub ignore_case: bool,
    /// Print only the number of matching lines
    #[arg(short, long)]
    pub count: bool,
}

#[derive(Debug, Args)]
pub struct SizeArgs {
    pub path: PathBuf,
    #[arg(short = 'H', long)]
    pub human_readable: bool,
    /// Sum every file below a directory
    #[arg(short, long)]
    pub total: bool,
}

#[derive(Debug, Args)]
pub struct DiskArgs {
    #[arg(default_value = ".")]
    pub path: PathBuf,
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    #[arg(default_value = ".")]
    pub directory: PathBuf,
    /// Deepest level to show
    #[arg(short, long, value_name = "N")]
    pub depth: Option<usize>,
    /// Include hidden entries
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    /// Chunked byte comparison (default)
    #[arg(long)]
    pub binary: bool,
    /// Positional line-by-line comparison
    #[arg(long)]
    pub diff: bool,
    /// Rolling checksum comparison
    #[arg(long)]
    pub hash: bool,
    /// Compare two directory trees
    #[arg(short, long)]
    pub recursive: bool,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub path: PathBuf,
    #[arg(long = "type", value_enum, default_value_t = EntryType::File)]
    pub kind: EntryType,
    /// Create missing parent directories
    #[arg(short, long)]
    pub parents: bool,
    /// Truncate an existing file or accept an existing directory
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Answer {
    #[value(alias = "y")]
    Yes,
    #[value(alias = "n")]
    No,
}

#[derive(Debug, Args)]
pub struct AskArgs {
    pub question: String,
    /// Answer used when the reply is empty
    #[arg(long, value_enum)]
    pub default: Option<Answer>,
    /// Accepted for compatibility; not enforced
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub file: PathBuf,
    /// Editor command (defaults to $VISUAL, $EDITOR, then vi)
    #[arg(long)]
    pub editor: Option<String>,
    /// Copy the file to <file>.bak before editing
    #[arg(short, long)]
    pub backup: bool,
}

#[derive(Debug, Args)]
pub struct WhereArgs {
    #[arg(default_value = ".")]
    pub path: PathBuf,
    /// Fail unless the path is of this kind
    #[arg(long = "type", value_enum)]
    pub kind: Option<EntryType>,
}

#[derive(Debug, Args)]
pub struct MetaArgs {
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct ChmodArgs {
    pub path: PathBuf,
    /// Octal mode, e.g. 755
    pub mode: String,
}

#[derive(Debug, Args)]
pub struct OwnershipArgs {
    pub path: PathBuf,
    /// Numeric UID[:GID]; `:GID` changes only the group
    pub owner: Owner,
}
