/// Main entry point for the Mort payments MCP server
///
/// This file sets up logging, parses command line arguments, and either
/// starts the MCP server (JSON-RPC over stdin/stdout) or runs a catalogue sync.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use mort_mcp::config::{self, Config, GatewayConfig, ServerConfig};
use mort_mcp::{PaymentsServer, SqliteStorage};

/// Command line arguments for the Mort payments MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET", hide_env_values = true, global = true)]
    stripe_secret: Option<String>,

    /// Stripe API root URL
    #[arg(long, env = "MORT_STRIPE_API_BASE", default_value = config::DEFAULT_API_BASE, global = true)]
    api_base: String,

    /// HTTP timeout for each gateway request, in seconds
    #[arg(long, default_value_t = config::DEFAULT_REQUEST_TIMEOUT.as_secs(), global = true)]
    request_timeout_secs: u64,

    /// Upper bound for a whole tool call, in seconds
    #[arg(long, default_value_t = config::DEFAULT_CALL_TIMEOUT.as_secs(), global = true)]
    call_timeout_secs: u64,

    /// Longest accepted request line, in bytes
    #[arg(long, default_value_t = config::DEFAULT_MAX_LINE_BYTES, global = true)]
    max_line_bytes: usize,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server over stdin/stdout (default)
    Serve,
    /// Copy customers, products and prices into a local SQLite database
    Sync {
        /// Path to the SQLite database file
        /// If not provided, uses a default location in the user's home directory
        #[arg(long)]
        database: Option<PathBuf>,

        /// How many records of each type to fetch (1-100)
        #[arg(long, default_value_t = 100)]
        page_size: u32,
    },
}

impl Args {
    fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let gateway = GatewayConfig::new(
            self.stripe_secret.clone(),
            &self.api_base,
            Duration::from_secs(self.request_timeout_secs),
        )?;

        let server = ServerConfig {
            max_line_bytes: self.max_line_bytes,
            call_timeout: Duration::from_secs(self.call_timeout_secs),
        };

        let database = match &self.command {
            Some(Command::Sync { database, .. }) => database.clone(),
            _ => None,
        };

        Ok(Config {
            gateway,
            server,
            database,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("mort_mcp={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // Send logs to stderr, stdout carries the protocol
        .init();

    let config = args.config()?;
    let server = PaymentsServer::new(&config)?;

    match args.command {
        None | Some(Command::Serve) => {
            info!("Starting Mort payments MCP server");
            server.run().await?;
            info!("Mort payments MCP server shutdown complete");
        }
        Some(Command::Sync { page_size, .. }) => {
            let db_path = match config.database {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    path
                }
                None => config::default_database_path()?,
            };

            info!("Using database at: {}", db_path.display());
            let storage = SqliteStorage::new(&db_path)?;
            let report = server.sync(&storage, page_size).await?;

            eprintln!(
                "Synced {} customers, {} products, {} prices ({} prices skipped) into {}",
                report.customers,
                report.products,
                report.prices,
                report.skipped_prices,
                db_path.display()
            );
        }
    }

    Ok(())
}
