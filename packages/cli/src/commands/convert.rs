use anyhow::{anyhow, Result};
use apiforge_parser::{serialize, Format};
use apiforge_workspace::Workspace;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use super::open_workspace;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Target {
    Json,
    Yaml,
}

impl From<Target> for Format {
    fn from(target: Target) -> Self {
        match target {
            Target::Json => Format::Json,
            Target::Yaml => Format::Yaml,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Specification file (JSON or YAML)
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    pub to: Target,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn convert(args: ConvertArgs, cwd: &str) -> Result<()> {
    let workspace = open_workspace(&args.file, cwd).await?;
    let text = render(&workspace, args.to)
        .map_err(|err| anyhow!("{} ({})", err, args.file.display()))?;

    match &args.output {
        Some(output) => {
            fs::write(output, &text)?;
            println!(
                "{} {} → {}",
                "✓".green(),
                args.file.display(),
                output.display()
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn render(workspace: &Workspace, target: Target) -> Result<String> {
    let document = workspace
        .document()
        .ok_or_else(|| anyhow!("No document loaded"))?;
    Ok(serialize(document, target.into())?)
}
