use crate::logger;
use crate::render::render_records;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rootmap_manifest::{read_from_path, RecordKind};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Rootmap file to read
    pub file: PathBuf,
    /// Print the parsed manifest as JSON
    #[arg(long)]
    pub json: bool,
    /// Only list distinct names of one kind (class, var, namespace, typedef, enum)
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<RecordKind>,
}

fn parse_kind(keyword: &str) -> Result<RecordKind, String> {
    RecordKind::from_keyword(keyword).ok_or_else(|| format!("unknown record kind '{}'", keyword))
}

pub fn handle_parse(cmd: ParseCommand, opts: &GlobalOpts) -> Result<()> {
    logger::debug(&format!("Parsing {}", cmd.file.display()));
    let manifest = read_from_path(&cmd.file)?;

    if cmd.json {
        let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        println!("{}", json);
        return Ok(());
    }

    if let Some(kind) = cmd.kind {
        for path in manifest.names_by_kind(kind) {
            println!("{}", path);
        }
        return Ok(());
    }

    println!("{}", "Libraries:".bold().green());
    for library in &manifest.libraries {
        println!("  {}", library);
    }

    println!("{}", "Records:".bold().green());
    print!("{}", render_records(&manifest));

    if !manifest.skipped.is_empty() {
        println!("{}", "Skipped lines:".bold().yellow());
        for skipped in &manifest.skipped {
            println!("{:>5}  {}", skipped.line, skipped.reason);
        }
    }

    if opts.verbosity_level() > 0 {
        println!(
            "{} records ({} distinct), max depth {}",
            manifest.len(),
            manifest.unique_records().len(),
            manifest.max_depth()
        );
    }
    Ok(())
}
