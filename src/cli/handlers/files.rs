//! Verbs that change the filesystem.

use std::fs;
use std::path::Path;
use std::process::Command as Process;

use crate::cli::args::{
    ChmodArgs, CopyArgs, CreateArgs, DeleteArgs, EditArgs, MoveArgs, OwnershipArgs, RenameArgs,
};
use crate::cli::{Context, Outcome};
use crate::core::errors::{Error, Result};
use crate::services::fs::create::{create_path, CreateOptions, EntryType};
use crate::services::fs::meta::{change_mode, change_owner, parse_mode};
use crate::services::fs::remove::{delete_path, DeleteOptions};
use crate::services::fs::transfer::{
    copy_path, create_backup, move_path, rename_path, resolve_into_dir, CopyOptions, MoveOptions,
};

pub fn move_(ctx: &mut Context<'_>, args: MoveArgs) -> Result<Outcome> {
    let target = resolve_into_dir(&args.source, &args.destination)?;
    let Some(force) = overwrite_allowed(ctx, &target, args.force, args.interactive)? else {
        writeln!(ctx.out, "skipped {}", args.source.display())?;
        return Ok(Outcome::Success);
    };

    let opts = MoveOptions {
        force,
        backup: args.backup,
    };
    let outcome = move_path(&args.source, &args.destination, opts)?;
    if let Some(backup) = &outcome.backup {
        writeln!(ctx.out, "backed up {}", backup.display())?;
    }
    writeln!(
        ctx.out,
        "moved {} -> {}",
        args.source.display(),
        outcome.destination.display()
    )?;
    Ok(Outcome::Success)
}

pub fn rename(ctx: &mut Context<'_>, args: RenameArgs) -> Result<Outcome> {
    let opts = MoveOptions {
        force: args.force,
        backup: args.backup,
    };
    let outcome = rename_path(&args.old, &args.new, opts)?;
    if let Some(backup) = &outcome.backup {
        writeln!(ctx.out, "backed up {}", backup.display())?;
    }
    writeln!(
        ctx.out,
        "renamed {} -> {}",
        args.old.display(),
        outcome.destination.display()
    )?;
    Ok(Outcome::Success)
}

pub fn copy(ctx: &mut Context<'_>, args: CopyArgs) -> Result<Outcome> {
    let target = resolve_into_dir(&args.source, &args.destination)?;
    let Some(force) = overwrite_allowed(ctx, &target, args.force, args.interactive)? else {
        writeln!(ctx.out, "skipped {}", args.source.display())?;
        return Ok(Outcome::Success);
    };

    let opts = CopyOptions {
        force,
        recursive: args.recursive,
        preserve: args.preserve,
        link: args.link,
    };
    let summary = copy_path(&args.source, &args.destination, opts)?;
    let (from, to) = (args.source.display(), summary.destination.display());
    match summary.linked {
        Some(kind) => writeln!(ctx.out, "linked ({kind:?}) {to} -> {from}")?,
        None if summary.dirs > 0 => writeln!(
            ctx.out,
            "copied {from} -> {to} ({} files, {} directories, {} bytes)",
            summary.files, summary.dirs, summary.bytes
        )?,
        None => writeln!(ctx.out, "copied {from} -> {to} ({} bytes)", summary.bytes)?,
    }
    Ok(Outcome::Success)
}

pub fn delete(ctx: &mut Context<'_>, args: DeleteArgs) -> Result<Outcome> {
    let exists = fs::symlink_metadata(&args.target).is_ok();
    if args.interactive && !args.force && exists {
        let question = format!("delete {}?", args.target.display());
        if !ctx.prompt.confirm(&question, false)? {
            writeln!(ctx.out, "skipped {}", args.target.display())?;
            return Ok(Outcome::Success);
        }
    }

    let opts = DeleteOptions {
        force: args.force,
        recursive: args.recursive,
        trash: args.trash,
    };
    let summary = delete_path(&args.target, opts)?;
    let target = args.target.display();
    if summary.missing {
        writeln!(ctx.out, "nothing to delete at {target}")?;
    } else if summary.trashed {
        writeln!(ctx.out, "moved {target} to trash")?;
    } else if summary.dirs > 0 {
        writeln!(
            ctx.out,
            "deleted {target} ({} files, {} directories)",
            summary.files, summary.dirs
        )?;
    } else {
        writeln!(ctx.out, "deleted {target}")?;
    }
    Ok(Outcome::Success)
}

pub fn create(ctx: &mut Context<'_>, args: CreateArgs) -> Result<Outcome> {
    let opts = CreateOptions {
        kind: args.kind,
        parents: args.parents,
        force: args.force,
    };
    create_path(&args.path, opts)?;
    let noun = match args.kind {
        EntryType::File => "file",
        EntryType::Dir => "directory",
    };
    writeln!(ctx.out, "created {noun} {}", args.path.display())?;
    Ok(Outcome::Success)
}

pub fn edit(ctx: &mut Context<'_>, args: EditArgs) -> Result<Outcome> {
    let command = ctx.config.editor_command(args.editor.as_deref());
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::InvalidArgument("empty editor command".into()))?;

    if args.backup && args.file.exists() {
        let backup = create_backup(&args.file)?;
        writeln!(ctx.out, "backed up {}", backup.display())?;
    }

    tracing::info!(editor = program, file = %args.file.display(), "launching editor");
    let status = Process::new(program)
        .args(parts)
        .arg(&args.file)
        .status()
        .map_err(|e| Error::Other(format!("failed to launch {program}: {e}")))?;
    if !status.success() {
        return Err(Error::Other(format!("{program} exited with {status}")));
    }
    Ok(Outcome::Success)
}

pub fn chmod(ctx: &mut Context<'_>, args: ChmodArgs) -> Result<Outcome> {
    let mode = parse_mode(&args.mode)?;
    change_mode(&args.path, mode)?;
    writeln!(ctx.out, "mode of {} set to {mode:o}", args.path.display())?;
    Ok(Outcome::Success)
}

pub fn ownership(ctx: &mut Context<'_>, args: OwnershipArgs) -> Result<Outcome> {
    change_owner(&args.path, args.owner)?;
    writeln!(ctx.out, "owner of {} set to {}", args.path.display(), args.owner)?;
    Ok(Outcome::Success)
}

// Some(force) to proceed, None when the user declined an interactive overwrite.
fn overwrite_allowed(
    ctx: &mut Context<'_>,
    target: &Path,
    force: bool,
    interactive: bool,
) -> Result<Option<bool>> {
    if force {
        return Ok(Some(true));
    }
    if interactive && fs::symlink_metadata(target).is_ok() {
        let question = format!("overwrite {}?", target.display());
        return Ok(ctx.prompt.confirm(&question, false)?.then_some(true));
    }
    Ok(Some(false))
}
