use std::path::Path;

use crate::cli::args::{Answer, AskArgs, CompareArgs, FindArgs, SearchArgs};
use crate::cli::{Context, Outcome};
use crate::core::errors::{Error, Result};
use crate::services::compare::{
    compare_files, compare_trees, BinaryOutcome, CompareModes, FileComparison, LineDifference,
    TreeDifference,
};
use crate::services::search::{find_entries, search_file, FindRequest};

pub fn find(ctx: &mut Context<'_>, args: FindArgs) -> Result<Outcome> {
    let request = FindRequest {
        kind: args.kind,
        size: args.size,
        include_hidden: args.hidden,
        ignore_case: args.ignore_case,
        recursive: args.recursive,
        ..FindRequest::new(&args.directory, &args.pattern)
    };
    let entries = find_entries(&request)?;
    for entry in &entries {
        let suffix = if entry.is_dir() { "/" } else { "" };
        writeln!(ctx.out, "{}{suffix}", entry.path.display())?;
    }
    Ok(Outcome::Success)
}

pub fn search(ctx: &mut Context<'_>, args: SearchArgs) -> Result<Outcome> {
    let results = search_file(&args.file, &args.pattern, args.ignore_case)?;
    if args.count {
        writeln!(ctx.out, "{}", results.len())?;
        return Ok(Outcome::Success);
    }
    for hit in &results {
        writeln!(ctx.out, "{}: {}", hit.line_number, hit.line_content)?;
    }
    Ok(Outcome::Success)
}

pub fn compare(ctx: &mut Context<'_>, args: CompareArgs) -> Result<Outcome> {
    let modes = CompareModes {
        binary: args.binary,
        diff: args.diff,
        hash: args.hash,
    };

    if args.recursive {
        let report = compare_trees(&args.left, &args.right, modes)?;
        for difference in &report.differences {
            let path = difference.path().display();
            match difference {
                TreeDifference::OnlyLeft(_) => writeln!(ctx.out, "only in {}: {path}", args.left.display())?,
                TreeDifference::OnlyRight(_) => writeln!(ctx.out, "only in {}: {path}", args.right.display())?,
                TreeDifference::KindMismatch(_) => writeln!(ctx.out, "type differs: {path}")?,
                TreeDifference::Content(_) => writeln!(ctx.out, "differs: {path}")?,
            }
        }
        if report.is_identical() {
            writeln!(ctx.out, "Directories are identical ({} files compared).", report.files_compared)?;
        } else {
            writeln!(
                ctx.out,
                "{} differences ({} files compared).",
                report.differences.len(),
                report.files_compared
            )?;
        }
        return Ok(Outcome::Success);
    }

    for side in [&args.left, &args.right] {
        if side.is_dir() {
            return Err(Error::IsADirectory(side.clone()));
        }
    }
    let comparison = compare_files(&args.left, &args.right, modes)?;
    report_files(ctx, &args.left, &args.right, &comparison)?;
    Ok(Outcome::Success)
}

fn report_files(
    ctx: &mut Context<'_>,
    left: &Path,
    right: &Path,
    comparison: &FileComparison,
) -> Result<()> {
    match comparison.binary {
        Some(BinaryOutcome::Identical) => {
            writeln!(ctx.out, "Files are identical (binary comparison).")?
        }
        Some(BinaryOutcome::Differ { offset }) => {
            writeln!(ctx.out, "Files differ at byte {offset} (binary comparison).")?
        }
        None => {}
    }

    if let Some(differences) = &comparison.diff {
        if differences.is_empty() {
            writeln!(ctx.out, "Files are identical (line comparison).")?;
        }
        for difference in differences {
            match difference {
                LineDifference::Changed { line, left: l, right: r } => {
                    writeln!(ctx.out, "line {line}:")?;
                    writeln!(ctx.out, "< {l}")?;
                    writeln!(ctx.out, "> {r}")?;
                }
                LineDifference::ExtraLeft { line, text } => {
                    writeln!(ctx.out, "line {line} only in {}:", left.display())?;
                    writeln!(ctx.out, "< {text}")?;
                }
                LineDifference::ExtraRight { line, text } => {
                    writeln!(ctx.out, "line {line} only in {}:", right.display())?;
                    writeln!(ctx.out, "> {text}")?;
                }
            }
        }
    }

    if let Some(hash) = comparison.hash {
        if hash.is_identical() {
            writeln!(ctx.out, "Files are identical (hash {:016x}).", hash.left)?;
        } else {
            writeln!(
                ctx.out,
                "Files differ (hash {:016x} vs {:016x}).",
                hash.left, hash.right
            )?;
        }
    }
    Ok(())
}

pub fn ask(ctx: &mut Context<'_>, args: AskArgs) -> Result<Outcome> {
    if let Some(secs) = args.timeout {
        tracing::debug!(secs, "ask timeout is not enforced");
    }
    let default = args.default == Some(Answer::Yes);
    if ctx.prompt.confirm(&args.question, default)? {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::Negative)
    }
}
