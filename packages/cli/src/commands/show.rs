use super::open_session;
use crate::config::Config;
use anyhow::Result;
use branchtree_export::build_ascii_rows;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print node ids next to each row
    #[arg(long)]
    pub ids: bool,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let session = open_session(&config, cwd)?;

    for row in build_ascii_rows(session.document()) {
        if args.ids {
            println!("{}  {}", row.line, row.id.as_str().dimmed());
        } else {
            println!("{}", row.line);
        }
    }

    let branches = session.document().len();
    println!();
    println!(
        "   {} {}",
        branches.to_string().bright_white(),
        if branches == 1 { "branch" } else { "branches" }
    );

    Ok(())
}
