use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geolens::{cli, config};

#[derive(Parser)]
#[command(name = "geolens", version, about = "Spatial-historical gazetteer queries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize the database schema
    Init {
        /// Load sample data after initialization
        #[arg(long)]
        with_sample_data: bool,
    },
    /// Find locations near a point
    Near {
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Search radius in meters
        #[arg(long)]
        distance: Option<f64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Find features architecturally similar to a reference feature
    Similar {
        feature_id: i64,
        /// Minimum similarity, exclusive, in [0, 1]
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List a location's historical events
    Timeline {
        location_id: i64,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Trace architectural influence chains from a location
    Influences {
        location_id: i64,
        /// Maximum number of hops
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Show store statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::GeoLensConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for JSON output.
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init { with_sample_data } => cli::init_db(&config, with_sample_data),
        Command::Near {
            lat,
            lon,
            distance,
            limit,
        } => cli::near(&config, lat, lon, distance, limit),
        Command::Similar {
            feature_id,
            threshold,
            limit,
        } => cli::similar(&config, feature_id, threshold, limit),
        Command::Timeline {
            location_id,
            from,
            to,
        } => cli::timeline(&config, location_id, from, to),
        Command::Influences { location_id, depth } => {
            cli::influences(&config, location_id, depth)
        }
        Command::Stats => cli::stats(&config),
    }
}
