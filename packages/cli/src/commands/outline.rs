use anyhow::Result;
use apiforge_outline::TreeNode;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::open_workspace;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Specification file (JSON or YAML)
    pub file: PathBuf,

    /// Print the tree as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn outline(args: OutlineArgs, cwd: &str) -> Result<()> {
    let workspace = open_workspace(&args.file, cwd).await?;
    let tree = workspace.outline();

    if args.json {
        println!("{}", serde_json::to_string_pretty(tree)?);
        return Ok(());
    }

    if tree.is_empty() {
        println!("{}", "(empty outline)".dimmed());
    }
    for node in tree {
        print_node(node, 0);
    }
    Ok(())
}

fn print_node(node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.is_leaf() {
        println!("{}{}  {}", indent, node.label, node.id.dimmed());
    } else {
        println!("{}{}", indent, node.label.bold());
    }
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
