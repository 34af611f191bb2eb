use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::warn;
use twig_sdk::{
    ChangeKind, CommitShow, CommitSummary, FileChange, ObjectId, Repository, SdkError, TWIG_DIR,
};
use walkdir::WalkDir;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let root = cli.repo;
    match cli.command {
        Command::Init(_) => cmd_init(&root),
        Command::Add(args) => cmd_add(&root, args),
        Command::Commit(args) => cmd_commit(&root, args),
        Command::Log(args) => cmd_log(&root, args),
        Command::Show(args) => cmd_show(&root, args),
        Command::Status(_) => cmd_status(&root),
    }
}

fn open(root: &Path) -> anyhow::Result<Repository> {
    Repository::open(root).with_context(|| format!("cannot open repository at {}", root.display()))
}

fn cmd_init(root: &Path) -> anyhow::Result<()> {
    match Repository::init(root) {
        Ok(repo) => {
            println!(
                "{} Initialized empty Twig repository in {}",
                "✓".green().bold(),
                repo.twig_dir().display().to_string().bold()
            );
            Ok(())
        }
        Err(SdkError::AlreadyInitialized(_)) => {
            println!("already initialized the .Twig folder");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_add(root: &Path, args: AddArgs) -> anyhow::Result<()> {
    let repo = open(root)?;

    let mut paths = Vec::new();
    for path in args.paths {
        if path == "." {
            paths.extend(working_files(repo.root())?);
        } else {
            paths.push(path);
        }
    }

    let already = paths
        .iter()
        .map(|p| repo.is_staged(p))
        .collect::<Result<Vec<_>, _>>()?;

    for (entry, updated) in repo.add_many(&paths)?.into_iter().zip(already) {
        let label = if updated { "updated:" } else { "staged:" };
        println!("File Hash: {}", entry.hash.to_string().yellow());
        println!("  {} {}", label.green(), entry.path);
    }
    Ok(())
}

/// Regular files directly under `root`, sorted by name, skipping
/// `.Twig`, `node_modules`, and dotfiles.
fn working_files(root: &Path) -> anyhow::Result<Vec<String>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.with_context(|| format!("cannot list {}", root.display()))?;
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if name == TWIG_DIR || name == "node_modules" || name.starts_with('.') {
            continue;
        }
        if entry.file_type().is_file() {
            files.push(name.to_string());
        }
    }
    Ok(files)
}

fn cmd_commit(root: &Path, args: CommitArgs) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id = repo.commit(&args.message)?;
    println!(
        "{} Commit successfully created with hash: {}",
        "✓".green().bold(),
        id.to_string().yellow()
    );
    Ok(())
}

fn cmd_log(root: &Path, args: LogArgs) -> anyhow::Result<()> {
    let repo = open(root)?;
    let history = repo.history(args.limit)?;
    if history.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    print!("{}", render_log(&history, args.oneline));
    Ok(())
}

fn cmd_show(root: &Path, args: ShowArgs) -> anyhow::Result<()> {
    let repo = open(root)?;
    let id: ObjectId = args
        .commit
        .parse()
        .with_context(|| format!("invalid commit hash: {}", args.commit))?;
    let show = repo.show(&id)?;
    print!("{}", render_show(&show));
    Ok(())
}

fn cmd_status(root: &Path) -> anyhow::Result<()> {
    let repo = open(root)?;
    let staged = repo.status()?;
    if staged.is_empty() {
        println!("Nothing staged.");
        return Ok(());
    }
    println!("Staged for commit:");
    for entry in &staged {
        println!("  {} {}", entry.hash.short_hex().dimmed(), entry.path.green());
    }
    Ok(())
}

fn render_log(history: &[CommitSummary], oneline: bool) -> String {
    let mut out = String::new();
    for commit in history {
        if oneline {
            let _ = writeln!(out, "{} {}", commit.id.short_hex().yellow(), commit.message);
        } else {
            let _ = writeln!(out, "-------------------------");
            let _ = writeln!(out, "Commit: {}", commit.id.to_string().yellow());
            let _ = writeln!(out, "Date: {}", commit.timestamp_iso());
            let _ = writeln!(out, "Message: {}", commit.message);
        }
    }
    out
}

fn render_show(show: &CommitShow) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Commit: {}", show.id.to_string().yellow());
    let _ = writeln!(out, "Date: {}", show.record.summary(show.id).timestamp_iso());
    let _ = writeln!(out, "Message: {}", show.record.message);
    if show.record.is_root() {
        let _ = writeln!(out, "first commit");
    }

    for file in &show.files {
        let _ = writeln!(out);
        let _ = writeln!(out, "File: {}, Hash: {}", file.path.bold(), file.hash);
        let _ = writeln!(out, "Content:");
        let content = String::from_utf8_lossy(&file.content);
        let _ = write!(out, "{content}");
        if !content.is_empty() && !content.ends_with('\n') {
            let _ = writeln!(out);
        }

        match &file.change {
            FileChange::RootCommit => {}
            FileChange::Added => {
                let _ = writeln!(out, "new file in this commit");
            }
            FileChange::Modified(diff) => {
                let _ = writeln!(out, "Diff:");
                for run in &diff.runs {
                    for line in run.text.lines() {
                        let rendered = match run.kind {
                            ChangeKind::Added => format!("++{}", line.green()),
                            ChangeKind::Removed => format!("--{}", line.red()),
                            ChangeKind::Equal => line.bright_black().to_string(),
                        };
                        let _ = writeln!(out, "{rendered}");
                    }
                }
            }
        }
    }
    out
}
