//! Command-line surface: argument types and the verb → handler dispatch.

pub mod args;
mod handlers;

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::core::config::AppConfig;
use crate::core::errors::Result;
use crate::services::prompt::Prompt;
use args::*;

pub const APP_NAME: &str = "Shark";

#[derive(Debug, Parser)]
#[command(name = "shark", version, about = "Shark - everyday filesystem operations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print the application name and exit
    #[arg(long)]
    pub name: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move a file or directory
    Move(MoveArgs),
    /// Copy a file or directory
    Copy(CopyArgs),
    /// Delete a file or directory
    Delete(DeleteArgs),
    /// List directory contents
    List(ListArgs),
    /// Print file contents
    Show(ShowArgs),
    /// Find entries by name in a directory
    Find(FindArgs),
    /// Search a file for lines containing a pattern
    Search(SearchArgs),
    /// Size of a file or directory
    Size(SizeArgs),
    /// Filesystem capacity and usage
    Disk(DiskArgs),
    /// Show a directory tree
    Tree(TreeArgs),
    /// Compare two files or directories
    Compare(CompareArgs),
    /// Create a file or directory
    Create(CreateArgs),
    /// Rename a file or directory
    Rename(RenameArgs),
    /// Ask a yes/no question; exit status 0 means yes
    Ask(AskArgs),
    /// Open a file in an editor
    Edit(EditArgs),
    /// Print the absolute location of a path
    Where(WhereArgs),
    /// Show file metadata
    Meta(MetaArgs),
    /// Change permission bits
    Chmod(ChmodArgs),
    /// Change the owning user and group (numeric ids)
    Ownership(OwnershipArgs),
}

/// Everything a handler may touch besides the filesystem.
pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub out: &'a mut dyn Write,
    pub prompt: &'a mut dyn Prompt,
}

/// How a handler finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The command ran but the answer is "no" (declined prompt, kind mismatch).
    Negative,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> ExitCode {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Negative => ExitCode::FAILURE,
        }
    }
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Move(_) => "move",
            Command::Copy(_) => "copy",
            Command::Delete(_) => "delete",
            Command::List(_) => "list",
            Command::Show(_) => "show",
            Command::Find(_) => "find",
            Command::Search(_) => "search",
            Command::Size(_) => "size",
            Command::Disk(_) => "disk",
            Command::Tree(_) => "tree",
            Command::Compare(_) => "compare",
            Command::Create(_) => "create",
            Command::Rename(_) => "rename",
            Command::Ask(_) => "ask",
            Command::Edit(_) => "edit",
            Command::Where(_) => "where",
            Command::Meta(_) => "meta",
            Command::Chmod(_) => "chmod",
            Command::Ownership(_) => "ownership",
        }
    }

    pub fn run(self, ctx: &mut Context<'_>) -> Result<Outcome> {
        tracing::debug!(verb = self.verb(), "dispatch");
        match self {
            Command::Move(args) => handlers::files::move_(ctx, args),
            Command::Copy(args) => handlers::files::copy(ctx, args),
            Command::Delete(args) => handlers::files::delete(ctx, args),
            Command::Create(args) => handlers::files::create(ctx, args),
            Command::Rename(args) => handlers::files::rename(ctx, args),
            Command::Edit(args) => handlers::files::edit(ctx, args),
            Command::Chmod(args) => handlers::files::chmod(ctx, args),
            Command::Ownership(args) => handlers::files::ownership(ctx, args),
            Command::List(args) => handlers::inspect::list(ctx, args),
            Command::Show(args) => handlers::inspect::show(ctx, args),
            Command::Size(args) => handlers::inspect::size(ctx, args),
            Command::Disk(args) => handlers::inspect::disk(ctx, args),
            Command::Tree(args) => handlers::inspect::tree(ctx, args),
            Command::Where(args) => handlers::inspect::where_(ctx, args),
            Command::Meta(args) => handlers::inspect::meta(ctx, args),
            Command::Find(args) => handlers::query::find(ctx, args),
            Command::Search(args) => handlers::query::search(ctx, args),
            Command::Compare(args) => handlers::query::compare(ctx, args),
            Command::Ask(args) => handlers::query::ask(ctx, args),
        }
    }
}

/// Runs a parsed command line. `None` means there was nothing to do but print the name.
pub fn run(cli: Cli, ctx: &mut Context<'_>) -> Result<Option<Outcome>> {
    if cli.name {
        writeln!(ctx.out, "{APP_NAME}")?;
        return Ok(Some(Outcome::Success));
    }
    match cli.command {
        Some(command) => command.run(ctx).map(Some),
        None => Ok(None),
    }
}
