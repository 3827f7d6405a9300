mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, check, export, init, show, ApplyArgs, CheckArgs, ExportArgs, InitArgs, ShowArgs,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Branchtree CLI - sketch git branch trees and export them
#[derive(Parser, Debug)]
#[command(name = "branchtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file and an empty tree
    Init(InitArgs),

    /// Print the tree
    Show(ShowArgs),

    /// Export the tree as ASCII or a Mermaid gitGraph
    Export(ExportArgs),

    /// Run a JSON script of editor commands against the tree
    Apply(ApplyArgs),

    /// Validate the stored tree document
    Check(CheckArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_cwd(dir: Option<PathBuf>) -> anyhow::Result<String> {
    let cwd = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    Ok(cwd.display().to_string())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = resolve_cwd(cli.dir)?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Show(args) => show(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Check(args) => check(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
