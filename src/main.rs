//! CLI entry point for duangjai-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duangjai_rs::{commands, server, Studio};

#[derive(Parser)]
#[command(name = "duangjai-rs")]
#[command(version)]
#[command(about = "Server for the Duangjai studio site", long_about = None)]
struct Cli {
    /// Set the site root (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the site server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no content watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Print the HTML served for a page URL
    Render {
        /// Page URL, e.g. "/stories.html?category=Video"
        url: String,

        /// Render as a visitor who accepted cookies
        #[arg(long)]
        consent: bool,
    },

    /// List site content
    List {
        /// Type of content to list (post, student, activity, testimonial, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Validate the content collections
    Check {
        /// Exit with an error when anything is found
        #[arg(long)]
        strict: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "duangjai_rs=debug,info"
    } else {
        "duangjai_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine site root
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading current directory")?,
    };

    match cli.command {
        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let studio = Studio::new(&base_dir)?;
            let port = port.unwrap_or(studio.config.server.port);
            let ip = ip.unwrap_or_else(|| studio.config.server.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&studio, &ip, port, !r#static, open).await?;
        }

        Commands::Render { url, consent } => {
            let studio = Studio::new(&base_dir)?;
            commands::render::run(&studio, &url, consent)?;
        }

        Commands::List { r#type } => {
            let studio = Studio::new(&base_dir)?;
            commands::list::run(&studio, &r#type)?;
        }

        Commands::Check { strict } => {
            let studio = Studio::new(&base_dir)?;
            commands::check::run(&studio, strict)?;
        }

        Commands::Version => {
            println!("duangjai-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
