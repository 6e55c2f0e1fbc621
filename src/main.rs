//! Tendril CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod assets;
mod commands;

#[derive(Parser)]
#[command(name = "tendril")]
#[command(about = "Dependency graph analysis for JavaScript and TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Analysis root path (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Maximum number of files parsed concurrently
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Keep going when a file fails to parse
    #[arg(long, global = true)]
    continue_on_error: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dependency tree of the given entrypoints
    Tree {
        /// Files, directories or globs to start from
        #[arg(required = true)]
        files: Vec<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Fail if there are circular dependencies
    Check {
        /// Entrypoints, defaults to `check.entrypoints` from the config file
        files: Vec<String>,
    },
    /// Show all the dependencies between two parts of the code
    Explain {
        /// File, directory or glob the dependencies start from
        from: String,
        /// File, directory or glob the dependencies end at
        to: String,
    },
    /// Render the graph as JSON or as an interactive HTML page
    Render {
        #[arg(required = true)]
        files: Vec<String>,

        /// Print the graph as JSON instead of writing HTML
        #[arg(long)]
        json: bool,

        /// Where to write the HTML page (defaults to the temp directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not open the page in a browser
        #[arg(long)]
        no_browser: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "tendril={log_level},tendril_core={log_level},tendril_indexer={log_level},tendril_render={log_level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Tendril v{}", env!("CARGO_PKG_VERSION"));

    let session = commands::Session::open(&cli.root, cli.workers, cli.continue_on_error)?;

    match cli.command {
        Commands::Tree { files, no_color } => commands::tree(&session, &files, !no_color).await,
        Commands::Check { files } => commands::check(&session, &files).await,
        Commands::Explain { from, to } => commands::explain(&session, &from, &to).await,
        Commands::Render {
            files,
            json,
            output,
            no_browser,
        } => commands::render(&session, &files, json, output, !no_browser).await,
    }
}
