use anyhow::Context;
use clap::CommandFactory;
use clap_mangen::Man;
use std::fs::File;
use std::path::PathBuf;

use jarjar::cli::Cli;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("jarjar.1"));
    let mut file = File::create(&path).with_context(|| format!("Creating {}", path.display()))?;
    Man::new(Cli::command())
        .render(&mut file)
        .context("Rendering man page")?;
    eprintln!("Generated man page at {}", path.display());
    Ok(())
}
