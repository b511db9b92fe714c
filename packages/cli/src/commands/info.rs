use anyhow::{anyhow, Result};
use apiforge_parser::{FieldPath, HTTP_METHODS};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;

use super::open_workspace;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Specification file (JSON or YAML)
    pub file: PathBuf,
}

pub async fn info(args: InfoArgs, cwd: &str) -> Result<()> {
    let workspace = open_workspace(&args.file, cwd).await?;
    let document = workspace
        .document()
        .ok_or_else(|| anyhow!("No document loaded from {}", args.file.display()))?;

    let title = document
        .get(&FieldPath::parse("info.title"))
        .and_then(Value::as_str)
        .unwrap_or("(untitled)");
    let api_version = document
        .get(&FieldPath::parse("info.version"))
        .map(display_scalar)
        .unwrap_or_else(|| "(none)".to_string());

    println!("{}", title.bold());
    println!("   Type:        {}", document.type_name().cyan());
    println!("   Spec:        {}", document.version());
    println!("   API version: {}", api_version);
    if let Some(format) = workspace.state().format() {
        println!("   Format:      {}", format.extension());
    }

    if document.is_openapi() {
        let paths = document.section("paths").and_then(Value::as_object);
        let operations: usize = paths
            .map(|paths| {
                paths
                    .values()
                    .map(|item| HTTP_METHODS.iter().filter(|m| item.get(**m).is_some()).count())
                    .sum::<usize>()
            })
            .unwrap_or(0);
        println!("   Paths:       {}", paths.map(|p| p.len()).unwrap_or(0));
        println!("   Operations:  {}", operations);
    } else {
        let channels = document
            .section("channels")
            .and_then(Value::as_object)
            .map(|c| c.len())
            .unwrap_or(0);
        println!("   Channels:    {}", channels);
    }

    let problems = workspace.problems();
    if problems.warning_count() > 0 {
        println!(
            "   {} {} structural issue(s), run `apiforge validate` for details",
            "Warnings:".yellow(),
            problems.warning_count()
        );
    }

    Ok(())
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
