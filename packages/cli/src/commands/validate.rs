use anyhow::{anyhow, Result};
use apiforge_parser::validate as check_structure;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::open_workspace;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Specification file (JSON or YAML)
    pub file: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub async fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let workspace = open_workspace(&args.file, cwd).await?;
    let document = workspace
        .document()
        .ok_or_else(|| anyhow!("No document loaded from {}", args.file.display()))?;
    let report = check_structure(document);

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} ({})", args.file.display(), document.type_name());
        for error in &report.errors {
            println!("  {} {}: {}", "error".red().bold(), error.path.cyan(), error.message);
        }
        if report.valid {
            println!("  {} No structural issues found", "✓".green());
        } else {
            println!();
            println!("  {} {}", "Errors:".red(), report.errors.len());
        }
    }

    // Exit with error code if there are errors
    if !report.valid {
        std::process::exit(1);
    }

    Ok(())
}
