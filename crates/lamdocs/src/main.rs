//! lamdocs CLI - lambda calculus lesson renderer.
//!
//! Provides commands for:
//! - `build`: Render every lesson page and write a site manifest
//! - `render`: Render a single markdown file to stdout
//! - `loader resolve` / `loader load`: Run the module hook chain

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, LoaderCommand, RenderArgs};
use output::Output;

/// lamdocs - lambda calculus lesson renderer.
#[derive(Parser)]
#[command(name = "lamdocs", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logging).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render all lesson pages to HTML.
    Build(BuildArgs),
    /// Render one markdown file to stdout.
    Render(RenderArgs),
    /// Module resolution commands.
    #[command(subcommand)]
    Loader(LoaderCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Loader(cmd) => cmd.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
