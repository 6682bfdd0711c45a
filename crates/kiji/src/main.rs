//! kiji CLI - publish Markdown articles into a static site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "kiji")]
#[command(about = "Publish Markdown articles into a static site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to kiji.toml config file
    #[arg(short, long, global = true, default_value = "kiji.toml")]
    config: PathBuf,

    /// Site root directory (overrides the config file)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter site with an article template and listing page
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Publish a new article, prompting for anything not given
    New(commands::new::NewArgs),

    /// Start the publishing server
    Serve {
        /// Port to listen on (defaults to config or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to config or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Open the article form in a browser
        #[arg(long)]
        open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init { force } => {
            commands::init::run(&config, &cli.config, cli.root, force).await?;
        }
        Commands::New(args) => {
            commands::new::run(&config, cli.root, args).await?;
        }
        Commands::Serve { port, host, open } => {
            commands::serve::run(&config, cli.root, port, host, open).await?;
        }
    }

    Ok(())
}
