//! # salon
//!
//! Command-line host for the booking wizard.
//!
//! ```text
//! salon catalog
//! salon slots --date 2025-03-14 --employee mai --service gel-manicure
//! salon book --service gel-manicure --employee mai --date 2025-03-14 --time 10:00 \
//!            --name "Ana" --email ana@example.com --phone 555-0101
//! salon stats --date 2025-03-14
//! salon --source sqlite --db ./salon.db stats --weekly
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use salon_booking::{open_source, BookingConfig, SourceKind};

/// Book salon appointments from the terminal.
#[derive(Parser, Debug)]
#[command(name = "salon", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data source: memory | sqlite.
    #[arg(long, global = true)]
    source: Option<String>,

    /// SQLite database file (implies --source sqlite).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List services by category and the staff.
    Catalog,
    /// Show bookable time slots for a day.
    Slots {
        /// Day to show (YYYY-MM-DD, default today).
        #[arg(long)]
        date: Option<String>,
        /// Hide slots this employee is already booked in.
        #[arg(long)]
        employee: Option<String>,
        /// Service whose duration is checked against bookings.
        #[arg(long)]
        service: Option<String>,
    },
    /// Walk the wizard non-interactively and save the booking.
    Book(BookArgs),
    /// Daily figures, or per-week buckets with --weekly.
    Stats {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        weekly: bool,
    },
    /// Print the effective configuration.
    Config {
        /// Write it to the config file.
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Service id; repeat to add more or raise the quantity.
    #[arg(long = "service", required = true)]
    pub services: Vec<String>,
    #[arg(long)]
    pub employee: String,
    /// YYYY-MM-DD, default today.
    #[arg(long)]
    pub date: Option<String>,
    /// HH:MM slot.
    #[arg(long)]
    pub time: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(source = %config.source.kind, "Configuration loaded");

    if let Commands::Config { save } = &cli.command {
        return commands::show_config(&config, *save, cli.config.clone());
    }

    let source = open_source(&config)
        .await
        .with_context(|| format!("failed to open {} data source", config.source.kind))?;
    info!(source = source.name(), "Data source ready");

    match cli.command {
        Commands::Catalog => commands::catalog(source.as_ref(), cli.json).await,
        Commands::Slots {
            date,
            employee,
            service,
        } => {
            commands::slots(
                source.as_ref(),
                &config,
                date.as_deref(),
                employee.as_deref(),
                service.as_deref(),
                cli.json,
            )
            .await
        }
        Commands::Book(args) => commands::book(source, &config, &args, cli.json).await.map(|_| ()),
        Commands::Stats { date, weekly } => {
            commands::stats(source.as_ref(), date.as_deref(), weekly, cli.json).await
        }
        Commands::Config { .. } => Ok(()),
    }
}

/// File + env config, then command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<BookingConfig> {
    let mut config = BookingConfig::load(cli.config.clone()).context("failed to load configuration")?;

    if let Some(kind) = &cli.source {
        config.source.kind = kind.parse::<SourceKind>()?;
    }
    if let Some(path) = &cli.db {
        config.source.kind = SourceKind::Sqlite;
        config.source.database_path = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=salon_booking=trace` - Trace one crate
/// - Default: `info,salon=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,salon=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
