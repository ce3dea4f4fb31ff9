//! Read-only verbs that report on paths.

use crate::cli::args::{DiskArgs, ListArgs, ListFormat, MetaArgs, ShowArgs, SizeArgs, TreeArgs, WhereArgs};
use crate::cli::{Context, Outcome};
use crate::core::errors::{Error, Result};
use crate::models::FileKind;
use crate::services::fs::content::{read_lines, LineSelection};
use crate::services::fs::listing::{list_dir, ListParams};
use crate::services::fs::meta::{format_timestamp, inspect, locate};
use crate::services::fs::tree::{build_tree, TreeOptions};
use crate::services::fs::usage::{disk_usage, format_size, path_size};

pub fn list(ctx: &mut Context<'_>, args: ListArgs) -> Result<Outcome> {
    let params = ListParams {
        include_hidden: args.all,
        sort: args.sort,
        reverse: args.reverse,
    };
    let entries = list_dir(&args.directory, params)?;

    if args.format == ListFormat::Json {
        serde_json::to_writer_pretty(&mut *ctx.out, &entries)?;
        writeln!(ctx.out)?;
        return Ok(Outcome::Success);
    }

    for entry in &entries {
        let suffix = if entry.is_dir() { "/" } else { "" };
        if args.long {
            writeln!(
                ctx.out,
                "{}  {:<7}  {:>12}  {}  {}{suffix}",
                entry.permissions_string(),
                entry.kind.as_str(),
                format_size(entry.size, args.human_readable),
                format_timestamp(entry.modified),
                entry.name,
            )?;
        } else {
            writeln!(ctx.out, "{}{suffix}", entry.name)?;
        }
    }
    Ok(Outcome::Success)
}

pub fn show(ctx: &mut Context<'_>, args: ShowArgs) -> Result<Outcome> {
    let selection = match (args.head, args.tail, args.lines.as_deref()) {
        (Some(n), _, _) => LineSelection::Head(n),
        (_, Some(n), _) => LineSelection::Tail(n),
        (_, _, Some(range)) => LineSelection::parse_range(range)?,
        _ => LineSelection::All,
    };

    for line in read_lines(&args.file, selection)? {
        if args.number {
            writeln!(ctx.out, "{:>6}  {}", line.number, line.text)?;
        } else {
            writeln!(ctx.out, "{}", line.text)?;
        }
    }
    Ok(Outcome::Success)
}

pub fn size(ctx: &mut Context<'_>, args: SizeArgs) -> Result<Outcome> {
    let report = path_size(&args.path, args.total)?;
    let size = format_size(report.bytes, args.human_readable);
    if report.aggregated {
        let noun = if report.files == 1 { "file" } else { "files" };
        writeln!(
            ctx.out,
            "{}: {size} in {} {noun}",
            report.path.display(),
            report.files
        )?;
    } else {
        writeln!(ctx.out, "{}: {size}", report.path.display())?;
    }
    Ok(Outcome::Success)
}

pub fn disk(ctx: &mut Context<'_>, args: DiskArgs) -> Result<Outcome> {
    let usage = disk_usage(&args.path)?;
    let human = args.human_readable;
    writeln!(ctx.out, "filesystem of {}", args.path.display())?;
    writeln!(ctx.out, "  total:     {}", format_size(usage.total, human))?;
    writeln!(
        ctx.out,
        "  used:      {} ({:.1}%)",
        format_size(usage.used, human),
        usage.used_percent()
    )?;
    writeln!(ctx.out, "  free:      {}", format_size(usage.free, human))?;
    writeln!(ctx.out, "  available: {}", format_size(usage.available, human))?;
    Ok(Outcome::Success)
}

pub fn tree(ctx: &mut Context<'_>, args: TreeArgs) -> Result<Outcome> {
    let opts = TreeOptions {
        max_depth: args.depth,
        include_hidden: args.all,
    };
    let report = build_tree(&args.directory, opts)?;
    for line in report.render() {
        writeln!(ctx.out, "{line}")?;
    }
    writeln!(ctx.out)?;
    writeln!(ctx.out, "{}", report.summary())?;
    Ok(Outcome::Success)
}

pub fn where_(ctx: &mut Context<'_>, args: WhereArgs) -> Result<Outcome> {
    let location = match locate(&args.path) {
        Ok(location) => location,
        Err(Error::NotFound(path)) if args.kind.is_some() => {
            writeln!(ctx.out, "{} does not exist", path.display())?;
            return Ok(Outcome::Negative);
        }
        Err(err) => return Err(err),
    };

    writeln!(ctx.out, "{} ({})", location.path.display(), location.kind.as_str())?;
    match args.kind {
        Some(wanted) if !wanted.matches(location.kind) => {
            writeln!(
                ctx.out,
                "{} is not a {}",
                args.path.display(),
                format!("{wanted:?}").to_lowercase()
            )?;
            Ok(Outcome::Negative)
        }
        _ => Ok(Outcome::Success),
    }
}

pub fn meta(ctx: &mut Context<'_>, args: MetaArgs) -> Result<Outcome> {
    let report = inspect(&args.path)?;
    let entry = &report.entry;
    writeln!(ctx.out, "name:     {}", entry.name)?;
    writeln!(ctx.out, "path:     {}", entry.path.display())?;
    writeln!(ctx.out, "kind:     {}", entry.kind.as_str())?;
    writeln!(ctx.out, "size:     {}", format_size(entry.size, false))?;
    writeln!(
        ctx.out,
        "mode:     {:o} ({})",
        entry.mode,
        entry.permissions_string()
    )?;
    writeln!(ctx.out, "modified: {}", format_timestamp(entry.modified))?;
    writeln!(ctx.out, "accessed: {}", format_timestamp(entry.accessed))?;
    writeln!(
        ctx.out,
        "created:  {}",
        format_timestamp(report.created.unwrap_or(0))
    )?;
    if let (FileKind::Symlink, Some(target)) = (entry.kind, &report.link_target) {
        writeln!(ctx.out, "target:   {}", target.display())?;
    }
    Ok(Outcome::Success)
}
