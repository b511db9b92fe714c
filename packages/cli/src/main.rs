mod commands;
mod host;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{convert, info, outline, validate, ConvertArgs, InfoArgs, OutlineArgs, ValidateArgs};

/// apiforge - structural editor tooling for OpenAPI and AsyncAPI documents
#[derive(Parser, Debug)]
#[command(name = "apiforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show dialect, version and title of a document
    Info(InfoArgs),

    /// Print the navigation outline
    Outline(OutlineArgs),

    /// Run the structural checks
    Validate(ValidateArgs),

    /// Re-serialize a document as JSON or YAML
    Convert(ConvertArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Info(args) => info(args, &cwd).await,
        Command::Outline(args) => outline(args, &cwd).await,
        Command::Validate(args) => validate(args, &cwd).await,
        Command::Convert(args) => convert(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
