use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "twig",
    about = "Twig: a tiny content-addressed version control system",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Repository root (the directory holding .Twig)
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    pub repo: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init(InitArgs),
    /// Stage files for the next commit
    Add(AddArgs),
    /// Record the staged files as a new commit
    Commit(CommitArgs),
    /// Show commit history, newest first
    Log(LogArgs),
    /// Show the files of a commit and their diff against its parent
    Show(ShowArgs),
    /// List staged files
    Status(StatusArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct AddArgs {
    /// Files to stage; `.` stages every regular file in the repository root
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct CommitArgs {
    pub message: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub commit: String,
}

#[derive(Args)]
pub struct StatusArgs {}
