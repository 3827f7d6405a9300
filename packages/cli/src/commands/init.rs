use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use branchtree_editor::{EditSession, FileStore};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Where to store the tree document
    #[arg(short, long, default_value = "branchtree.json")]
    pub document: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "🌳 Initializing branch tree...".bright_blue().bold());

    let config = Config {
        document_path: args.document,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    // Opening an empty store writes a fresh document; an existing one is kept
    let document_path = config.get_document_path(cwd);
    let existed = document_path.exists();
    let session = EditSession::open(FileStore::new(&document_path), &config.editor_config());
    if existed {
        println!("  {} Kept existing {}", "✓".green(), config.document_path);
    } else {
        println!("  {} Created {}", "✓".green(), config.document_path);
    }

    println!();
    println!("{}", session.export_ascii());
    println!();
    println!("{}", "✨ Done!".green().bold());
    println!("   Run {} to see the tree", "branchtree show".bright_white());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_config_and_document() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();

        init(
            InitArgs { document: "tree.json".into(), force: false },
            cwd,
        )
        .unwrap();

        let config = Config::load(cwd).unwrap();
        assert_eq!(config.document_path, "tree.json");
        assert!(dir.path().join("tree.json").exists());
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"historyLimit": 3}"#).unwrap();

        init(InitArgs { document: "tree.json".into(), force: false }, cwd).unwrap();

        assert_eq!(Config::load(cwd).unwrap().history_limit, 3);
        assert!(!dir.path().join("tree.json").exists());
    }
}
