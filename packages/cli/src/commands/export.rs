use super::open_session;
use crate::config::Config;
use anyhow::Result;
use branchtree_export::{build_export_text, ExportFormat};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format (ascii, mermaid); defaults to the configured format
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Print Mermaid output without the Markdown code fence
    #[arg(long)]
    pub no_fence: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let format = match args.format {
        Some(format) => format,
        None => config.export_format()?,
    };
    let fence = config.export.fence && !args.no_fence;

    let session = open_session(&config, cwd)?;
    let text = render(format, fence, session.document());

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{text}\n"))?;
            println!(
                "{} Exported {} to {}",
                "✓".green(),
                format.label(),
                path.display()
            );
        }
        None => println!("{text}"),
    }

    Ok(())
}

fn render(format: ExportFormat, fence: bool, doc: &branchtree_tree::Document) -> String {
    if fence {
        build_export_text(format, doc)
    } else {
        format.render(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchtree_tree::{Document, NodeId};

    #[test]
    fn test_render_respects_fence() {
        let doc = Document::with_root_id(NodeId::new("r"));
        assert_eq!(
            render(ExportFormat::Mermaid, true, &doc),
            "```mermaid\ngitGraph\n  commit id:\"main\"\n```"
        );
        assert_eq!(
            render(ExportFormat::Mermaid, false, &doc),
            "gitGraph\n  commit id:\"main\""
        );
        assert_eq!(render(ExportFormat::Ascii, true, &doc), "main");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let output = dir.path().join("tree.md");

        export(
            ExportArgs {
                format: Some(ExportFormat::Mermaid),
                no_fence: false,
                output: Some(output.clone()),
            },
            cwd,
        )
        .unwrap();

        let text = fs::read_to_string(output).unwrap();
        assert!(text.starts_with("```mermaid\ngitGraph\n"));
    }
}
