use super::open_session;
use crate::config::Config;
use anyhow::{Context, Result};
use branchtree_editor::{Command, EditSession};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// JSON file holding an array of editor commands
    pub script: PathBuf,

    /// Run the script without saving the result
    #[arg(long)]
    pub dry_run: bool,
}

/// Load a command script.
fn read_script(path: &Path) -> Result<Vec<Command>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read script {}", path.display()))?;
    let commands = serde_json::from_str(&text)
        .with_context(|| format!("Invalid command script {}", path.display()))?;
    Ok(commands)
}

/// Run `commands` in order, returning how many changed the session.
fn run_script(session: &mut EditSession, commands: Vec<Command>) -> usize {
    let mut changed = 0;
    for (index, command) in commands.into_iter().enumerate() {
        debug!(index, ?command, "Dispatching");
        if session.dispatch(command) {
            changed += 1;
        }
    }
    changed
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let commands = read_script(&args.script)?;
    let total = commands.len();

    let opened = open_session(&config, cwd)?;
    let mut session = if args.dry_run {
        EditSession::from_document(opened.document().clone(), &config.editor_config())
    } else {
        opened
    };

    let changed = run_script(&mut session, commands);
    if !args.dry_run {
        session.save()?;
    }

    println!("{}", session.export_ascii());
    println!();
    println!(
        "✨ {} {} of {} commands changed the tree",
        if args.dry_run { "Dry run:".yellow().bold() } else { "Done:".green().bold() },
        changed,
        total
    );
    if !args.dry_run {
        println!("   Saved {}", config.document_path);
    }

    Ok(())
}
