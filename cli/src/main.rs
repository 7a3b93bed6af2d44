//! txqr CLI - Scan and parse transaction QR payloads
//!
//! A command-line tool for parsing `transfer:`/`deposit:` payloads,
//! running scan sessions over decoded text, and managing scanner settings.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "txqr")]
#[command(author, version, about = "Scan and parse transaction QR payloads")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a payload into a transaction request
    Parse {
        /// Decoded QR text, e.g. transfer:ACC123:Jane Doe:500
        payload: String,
    },

    /// Check whether a payload has a known prefix
    Check {
        /// Decoded QR text
        payload: String,
    },

    /// Run a scan session over decoded frames, one per line
    Scan {
        /// Read frames from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Stop after this many transactions
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Display target to bind to (defaults to the configured one)
        #[arg(long)]
        element: Option<String>,
    },

    /// Show or change scanner settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current settings
    Show,
    /// Change settings
    Set {
        /// Display target id
        #[arg(long)]
        element: Option<String>,
        /// Frames per second (1-1000)
        #[arg(long)]
        fps: Option<u32>,
        /// Side of the square detection region
        #[arg(long)]
        qr_box: Option<u32>,
        /// Camera to prefer: environment or user
        #[arg(long)]
        facing: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { payload } => commands::parse::run(&payload, cli.json)?,
        Commands::Check { payload } => commands::parse::check(&payload, cli.json)?,
        Commands::Scan {
            input,
            limit,
            element,
        } => commands::scan::run(input, limit, element, cli.json).await?,
        Commands::Config { action } => match action {
            None | Some(ConfigAction::Show) => commands::config::show(cli.json).await?,
            Some(ConfigAction::Set {
                element,
                fps,
                qr_box,
                facing,
            }) => commands::config::set(element, fps, qr_box, facing).await?,
        },
    }

    Ok(())
}
