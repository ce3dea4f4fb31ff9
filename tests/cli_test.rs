use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use shark::cli::{self, Cli, Context, Outcome};
use shark::core::config::AppConfig;
use shark::services::prompt::LinePrompt;
use shark::Error;
use std::ffi::OsString;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

struct Run {
    outcome: Option<Outcome>,
    stdout: String,
}

fn parse<I, S>(args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let argv: Vec<OsString> = std::iter::once(OsString::from("shark"))
        .chain(args.into_iter().map(Into::into))
        .collect();
    Cli::try_parse_from(argv)
}

/// Runs one command line with `input` as the prompt's stdin.
fn shark_with_input<I, S>(args: I, input: &str) -> Result<shark::Result<Run>>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let cli = parse(args)?;
    let config = AppConfig::default();
    let mut out = Vec::new();
    let mut prompt = LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let result = {
        let mut ctx = Context {
            config: &config,
            out: &mut out,
            prompt: &mut prompt,
        };
        cli::run(cli, &mut ctx)
    };
    let stdout = String::from_utf8(out)?;
    Ok(result.map(|outcome| Run { outcome, stdout }))
}

fn shark<I, S>(args: I) -> Result<shark::Result<Run>>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    shark_with_input(args, "")
}

fn arg(path: &Path) -> OsString {
    path.as_os_str().to_os_string()
}

#[test]
fn scenario_list_tree_and_size() -> Result<()> {
    let root = tempdir()?;
    let d = root.path().join("d");
    fs::create_dir(&d)?;
    fs::write(d.join("x.txt"), "hello")?;

    let run = shark([arg(Path::new("list")), arg(&d)])??;
    assert_eq!(run.outcome, Some(Outcome::Success));
    assert_eq!(run.stdout, "x.txt\n");

    let run = shark([arg(Path::new("tree")), arg(&d)])??;
    assert!(run.stdout.contains("└── x.txt"));
    assert!(run.stdout.contains("0 directories, 1 file"));

    let run = shark([arg(Path::new("size")), arg(&d), OsString::from("--total")])??;
    assert!(run.stdout.contains(": 5 bytes in 1 file"), "{}", run.stdout);
    Ok(())
}

#[test]
fn list_json_reports_entries() -> Result<()> {
    let root = tempdir()?;
    fs::write(root.path().join("a.txt"), "abc")?;
    fs::create_dir(root.path().join("sub"))?;

    let run = shark([
        arg(Path::new("list")),
        arg(root.path()),
        OsString::from("--format"),
        OsString::from("json"),
    ])??;
    let value: serde_json::Value = serde_json::from_str(&run.stdout)?;
    let names: Vec<&str> = value
        .as_array()
        .map(|entries| entries.iter().filter_map(|e| e["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, ["sub", "a.txt"]);
    Ok(())
}

#[test]
fn move_relocates_content() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("src.txt");
    let dst = root.path().join("dst.txt");
    fs::write(&src, "payload")?;

    let run = shark([arg(Path::new("move")), arg(&src), arg(&dst)])??;
    assert_eq!(run.outcome, Some(Outcome::Success));
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(&dst)?, "payload");
    Ok(())
}

#[test]
fn move_into_directory_keeps_name() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("note.txt");
    let dir = root.path().join("box");
    fs::write(&src, "n")?;
    fs::create_dir(&dir)?;

    shark([arg(Path::new("move")), arg(&src), arg(&dir)])??;
    assert_eq!(fs::read_to_string(dir.join("note.txt"))?, "n");
    Ok(())
}

#[test]
fn move_refuses_to_overwrite_without_force() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("a");
    let dst = root.path().join("b");
    fs::write(&src, "new")?;
    fs::write(&dst, "old")?;

    let result = shark([arg(Path::new("move")), arg(&src), arg(&dst)])?;
    assert!(matches!(result, Err(Error::AlreadyExists(_))));
    assert_eq!(fs::read_to_string(&src)?, "new");
    assert_eq!(fs::read_to_string(&dst)?, "old");
    Ok(())
}

#[test]
fn declined_interactive_move_leaves_both() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("a");
    let dst = root.path().join("b");
    fs::write(&src, "new")?;
    fs::write(&dst, "old")?;

    let run = shark_with_input(
        [arg(Path::new("move")), arg(&src), arg(&dst), OsString::from("-i")],
        "n\n",
    )??;
    assert!(run.stdout.starts_with("skipped"));
    assert_eq!(fs::read_to_string(&src)?, "new");
    assert_eq!(fs::read_to_string(&dst)?, "old");

    shark_with_input(
        [arg(Path::new("move")), arg(&src), arg(&dst), OsString::from("-i")],
        "yes\n",
    )??;
    assert!(!src.exists());
    assert_eq!(fs::read_to_string(&dst)?, "new");
    Ok(())
}

#[test]
fn copy_duplicates_content() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("a.txt");
    let dst = root.path().join("b.txt");
    fs::write(&src, "same bytes")?;

    shark([arg(Path::new("copy")), arg(&src), arg(&dst)])??;
    assert_eq!(fs::read(&src)?, fs::read(&dst)?);
    Ok(())
}

#[test]
fn copy_directory_needs_recursive() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("tree");
    fs::create_dir_all(src.join("inner"))?;
    fs::write(src.join("inner/leaf.txt"), "leaf")?;
    let dst = root.path().join("clone");

    let result = shark([arg(Path::new("copy")), arg(&src), arg(&dst)])?;
    assert!(matches!(result, Err(Error::IsADirectory(_))));
    assert!(!dst.exists());

    shark([arg(Path::new("copy")), arg(&src), arg(&dst), OsString::from("-r")])??;
    assert_eq!(fs::read_to_string(dst.join("inner/leaf.txt"))?, "leaf");
    Ok(())
}

#[test]
fn rename_respects_force() -> Result<()> {
    let root = tempdir()?;
    let old = root.path().join("old");
    let new = root.path().join("new");
    fs::write(&old, "from old")?;
    fs::write(&new, "from new")?;

    let result = shark([arg(Path::new("rename")), arg(&old), arg(&new)])?;
    assert!(matches!(result, Err(Error::AlreadyExists(_))));
    assert_eq!(fs::read_to_string(&old)?, "from old");
    assert_eq!(fs::read_to_string(&new)?, "from new");

    shark([arg(Path::new("rename")), arg(&old), arg(&new), OsString::from("--force")])??;
    assert!(!old.exists());
    assert_eq!(fs::read_to_string(&new)?, "from old");
    Ok(())
}

#[test]
fn compare_file_with_itself_in_every_mode() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("same.txt");
    fs::write(&file, "one\ntwo\n")?;

    let run = shark([
        arg(Path::new("compare")),
        arg(&file),
        arg(&file),
        OsString::from("--binary"),
        OsString::from("--diff"),
        OsString::from("--hash"),
    ])??;
    assert!(run.stdout.contains("identical (binary comparison)"));
    assert!(run.stdout.contains("identical (line comparison)"));
    assert!(run.stdout.contains("identical (hash"));
    Ok(())
}

#[test]
fn compare_diff_lists_changed_lines() -> Result<()> {
    let root = tempdir()?;
    let left = root.path().join("l.txt");
    let right = root.path().join("r.txt");
    fs::write(&left, "same\nleft\n")?;
    fs::write(&right, "same\nright\nextra\n")?;

    let run = shark([arg(Path::new("compare")), arg(&left), arg(&right), OsString::from("--diff")])??;
    assert!(run.stdout.contains("line 2:\n< left\n> right\n"), "{}", run.stdout);
    assert!(run.stdout.contains("> extra"));
    assert!(!run.stdout.contains("binary"));
    Ok(())
}

#[test]
fn compare_recursive_reports_tree_differences() -> Result<()> {
    let root = tempdir()?;
    let left = root.path().join("left");
    let right = root.path().join("right");
    fs::create_dir_all(&left)?;
    fs::create_dir_all(&right)?;
    fs::write(left.join("shared.txt"), "a")?;
    fs::write(right.join("shared.txt"), "b")?;
    fs::write(left.join("lonely.txt"), "x")?;

    let run = shark([arg(Path::new("compare")), arg(&left), arg(&right), OsString::from("-r")])??;
    assert!(run.stdout.contains("differs: shared.txt"), "{}", run.stdout);
    assert!(run.stdout.contains("lonely.txt"));
    assert!(run.stdout.contains("2 differences"));
    Ok(())
}

#[test]
fn delete_directory_requires_recursive() -> Result<()> {
    let root = tempdir()?;
    let dir = root.path().join("full");
    fs::create_dir(&dir)?;
    fs::write(dir.join("f"), "f")?;

    let result = shark([arg(Path::new("delete")), arg(&dir)])?;
    assert!(matches!(result, Err(Error::IsADirectory(_))));
    assert!(dir.exists());

    shark([arg(Path::new("delete")), arg(&dir), OsString::from("-r")])??;
    assert!(!dir.exists());

    let run = shark([arg(Path::new("delete")), arg(&dir), OsString::from("-f")])??;
    assert_eq!(run.outcome, Some(Outcome::Success));
    Ok(())
}

#[test]
fn missing_source_is_not_found() -> Result<()> {
    let root = tempdir()?;
    let missing = root.path().join("ghost");

    let result = shark([arg(Path::new("show")), arg(&missing)])?;
    assert!(matches!(result, Err(Error::NotFound(_))));
    let result = shark([arg(Path::new("delete")), arg(&missing)])?;
    assert!(matches!(result, Err(Error::NotFound(_))));
    Ok(())
}

#[test]
fn show_selects_line_range() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("lines.txt");
    fs::write(&file, "a\nb\nc\nd\n")?;

    let run = shark([arg(Path::new("show")), arg(&file), OsString::from("--lines=2:3")])??;
    assert_eq!(run.stdout, "b\nc\n");

    let run = shark([arg(Path::new("show")), arg(&file), OsString::from("--tail=1"), OsString::from("-n")])??;
    assert_eq!(run.stdout, "     4  d\n");
    Ok(())
}

#[test]
fn search_prints_numbered_hits_or_count() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("log.txt");
    fs::write(&file, "ok\nERROR one\nok\nerror two\n")?;

    let run = shark([arg(Path::new("search")), arg(&file), OsString::from("ERROR")])??;
    assert_eq!(run.stdout, "2: ERROR one\n");

    let run = shark([
        arg(Path::new("search")),
        arg(&file),
        OsString::from("error"),
        OsString::from("-i"),
        OsString::from("--count"),
    ])??;
    assert_eq!(run.stdout, "2\n");
    Ok(())
}

#[test]
fn find_walks_subdirectories_when_recursive() -> Result<()> {
    let root = tempdir()?;
    fs::create_dir_all(root.path().join("a/b"))?;
    fs::write(root.path().join("top.rs"), "")?;
    fs::write(root.path().join("a/b/deep.rs"), "")?;

    let run = shark([arg(Path::new("find")), arg(root.path()), OsString::from(".rs")])??;
    assert_eq!(run.stdout.lines().count(), 1);

    let run = shark([
        arg(Path::new("find")),
        arg(root.path()),
        OsString::from(".rs"),
        OsString::from("-r"),
        OsString::from("--type=file"),
    ])??;
    assert_eq!(run.stdout.lines().count(), 2);
    assert!(run.stdout.contains("deep.rs"));
    Ok(())
}

#[test]
fn create_directory_with_parents() -> Result<()> {
    let root = tempdir()?;
    let nested = root.path().join("x/y/z");

    let result = shark([arg(Path::new("create")), arg(&nested), OsString::from("--type=dir")])?;
    assert!(result.is_err());

    shark([
        arg(Path::new("create")),
        arg(&nested),
        OsString::from("--type=dir"),
        OsString::from("--parents"),
    ])??;
    assert!(nested.is_dir());
    Ok(())
}

#[test]
fn ask_maps_answers_to_outcomes() -> Result<()> {
    let run = shark_with_input(["ask", "continue?"], "y\n")??;
    assert_eq!(run.outcome, Some(Outcome::Success));

    let run = shark_with_input(["ask", "continue?"], "no\n")??;
    assert_eq!(run.outcome, Some(Outcome::Negative));

    let run = shark_with_input(["ask", "continue?", "--default=yes", "--timeout=5"], "\n")??;
    assert_eq!(run.outcome, Some(Outcome::Success));

    let run = shark_with_input(["ask", "continue?"], "")??;
    assert_eq!(run.outcome, Some(Outcome::Negative));
    Ok(())
}

#[test]
fn where_checks_kind() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("f.txt");
    fs::write(&file, "")?;

    let run = shark([arg(Path::new("where")), arg(&file)])??;
    assert!(run.stdout.trim_end().ends_with("(file)"));
    assert_eq!(run.outcome, Some(Outcome::Success));

    let run = shark([arg(Path::new("where")), arg(&file), OsString::from("--type=dir")])??;
    assert_eq!(run.outcome, Some(Outcome::Negative));

    let run = shark([arg(Path::new("where")), arg(&root.path().join("nope")), OsString::from("--type=file")])??;
    assert_eq!(run.outcome, Some(Outcome::Negative));
    Ok(())
}

#[test]
fn name_flag_and_missing_command() -> Result<()> {
    let run = shark(["--name"])??;
    assert_eq!(run.stdout, "Shark\n");

    let run = shark(Vec::<OsString>::new())??;
    assert_eq!(run.outcome, None);
    Ok(())
}

#[test]
fn usage_errors_come_from_the_parser() {
    let err = parse(["move", "only-one"]).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::MissingRequiredArgument));

    let err = parse(["teleport", "a"]).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::InvalidSubcommand));

    let err = parse(["list", "--sort=colour"]).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::InvalidValue));

    let err = parse(["--help"]).err().map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::DisplayHelp));
}

#[cfg(unix)]
#[test]
fn edit_spawns_editor_and_keeps_backup() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("notes.txt");
    fs::write(&file, "draft")?;

    let run = shark([
        arg(Path::new("edit")),
        arg(&file),
        OsString::from("--editor=true"),
        OsString::from("--backup"),
    ])??;
    assert_eq!(run.outcome, Some(Outcome::Success));
    assert!(run.stdout.starts_with("backed up"));
    assert_eq!(fs::read_to_string(root.path().join("notes.txt.bak"))?, "draft");

    let result = shark([arg(Path::new("edit")), arg(&file), OsString::from("--editor=false")])?;
    assert!(matches!(result, Err(Error::Other(_))));
    Ok(())
}

#[cfg(unix)]
#[test]
fn disk_reports_capacity() -> Result<()> {
    let root = tempdir()?;
    let run = shark([arg(Path::new("disk")), arg(root.path())])??;
    for field in ["total:", "used:", "free:", "available:"] {
        assert!(run.stdout.contains(field), "{field} missing from {}", run.stdout);
    }
    assert!(run.stdout.contains(" bytes"));
    Ok(())
}

#[test]
fn meta_prints_entry_details() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("x.txt");
    fs::write(&file, "hello")?;

    let run = shark([arg(Path::new("meta")), arg(&file)])??;
    assert!(run.stdout.contains("name:     x.txt\n"));
    assert!(run.stdout.contains("kind:     file\n"));
    assert!(run.stdout.contains("size:     5 bytes\n"));
    assert!(run.stdout.contains("modified: "));
    Ok(())
}

#[cfg(unix)]
#[test]
fn chmod_sets_permission_bits() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let root = tempdir()?;
    let file = root.path().join("script.sh");
    fs::write(&file, "")?;

    let run = shark([arg(Path::new("chmod")), arg(&file), OsString::from("750")])??;
    assert!(run.stdout.ends_with("set to 750\n"));
    assert_eq!(fs::metadata(&file)?.permissions().mode() & 0o777, 0o750);

    let result = shark([arg(Path::new("chmod")), arg(&file), OsString::from("rwx")])?;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    Ok(())
}

#[cfg(unix)]
#[test]
fn ownership_accepts_numeric_ids() -> Result<()> {
    use std::os::unix::fs::MetadataExt;
    let root = tempdir()?;
    let file = root.path().join("owned");
    fs::write(&file, "")?;
    let meta = fs::metadata(&file)?;
    let owner = format!("{}:{}", meta.uid(), meta.gid());

    let run = shark([arg(Path::new("ownership")), arg(&file), OsString::from(&owner)])??;
    assert_eq!(run.stdout, format!("owner of {} set to {owner}\n", file.display()));

    let err = parse([arg(Path::new("ownership")), arg(&file), OsString::from("nobody")])
        .err()
        .map(|e| e.kind());
    assert_eq!(err, Some(ErrorKind::ValueValidation));
    Ok(())
}

#[test]
fn tree_hides_dot_entries_unless_all() -> Result<()> {
    let root = tempdir()?;
    fs::create_dir(root.path().join(".cache"))?;
    fs::write(root.path().join(".cache/blob"), "")?;
    fs::write(root.path().join("visible.txt"), "")?;

    let run = shark([arg(Path::new("tree")), arg(root.path())])??;
    assert!(!run.stdout.contains(".cache"));
    assert!(!run.stdout.contains("blob"));
    assert!(run.stdout.contains("0 directories, 1 file"));

    let run = shark([arg(Path::new("tree")), arg(root.path()), OsString::from("--all")])??;
    assert!(run.stdout.contains(".cache/"));
    assert!(run.stdout.contains("blob"));
    assert!(run.stdout.contains("1 directory, 2 files"));
    Ok(())
}

#[test]
fn interactive_delete_asks_first() -> Result<()> {
    let root = tempdir()?;
    let file = root.path().join("victim");
    fs::write(&file, "v")?;

    let run = shark_with_input([arg(Path::new("delete")), arg(&file), OsString::from("-i")], "n\n")??;
    assert!(run.stdout.starts_with("skipped"));
    assert!(file.exists());

    let run = shark_with_input([arg(Path::new("delete")), arg(&file), OsString::from("-i")], "y\n")??;
    assert!(run.stdout.starts_with("deleted"));
    assert!(!file.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn copy_can_link_instead() -> Result<()> {
    let root = tempdir()?;
    let src = root.path().join("origin");
    fs::write(&src, "v1")?;
    let sym = root.path().join("sym");
    let hard = root.path().join("hard");

    let run = shark([arg(Path::new("copy")), arg(&src), arg(&sym), OsString::from("--link=sym")])??;
    assert!(run.stdout.starts_with("linked"));
    assert!(fs::symlink_metadata(&sym)?.file_type().is_symlink());

    shark([arg(Path::new("copy")), arg(&src), arg(&hard), OsString::from("--link=hard")])??;
    fs::write(&src, "v2")?;
    assert_eq!(fs::read_to_string(&sym)?, "v2");
    assert_eq!(fs::read_to_string(&hard)?, "v2");

    let result = shark([arg(Path::new("copy")), arg(&src), arg(&hard), OsString::from("--force")])?;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(fs::read_to_string(&src)?, "v2");
    Ok(())
}

#[cfg(unix)]
#[test]
fn move_between_hard_links_removes_source() -> Result<()> {
    let root = tempdir()?;
    let a = root.path().join("a");
    let b = root.path().join("b");
    fs::write(&a, "same inode")?;
    fs::hard_link(&a, &b)?;

    let run = shark([arg(Path::new("move")), arg(&a), arg(&b), OsString::from("--force")])??;
    assert_eq!(run.outcome, Some(Outcome::Success));
    assert!(!a.exists());
    assert_eq!(fs::read_to_string(&b)?, "same inode");
    Ok(())
}
