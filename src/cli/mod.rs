//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions. Results are
//! printed as the same canonical JSON entities the library returns.

pub mod resolve;
pub mod search;
pub mod status;

use crate::config::Config;
use crate::error::Result;
use crate::service::LocationService;
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Geolocation resolution engine
#[derive(Parser)]
#[command(name = "geolocus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an address to coordinates
    Geocode(resolve::GeocodeArgs),

    /// Resolve coordinates to an address
    Reverse(resolve::ReverseArgs),

    /// Suggest addresses for partial input
    Suggest(resolve::SuggestArgs),

    /// Locate an IP address
    Locate(resolve::LocateArgs),

    /// Search points of interest by keyword
    Search(search::SearchArgs),

    /// Search points of interest around a coordinate
    Nearby(search::NearbyArgs),

    /// Show provider availability
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Geocode(args) => resolve::geocode(args).await,
        Commands::Reverse(args) => resolve::reverse(args).await,
        Commands::Suggest(args) => resolve::suggest(args).await,
        Commands::Locate(args) => resolve::locate(args).await,
        Commands::Search(args) => search::search(args).await,
        Commands::Nearby(args) => search::nearby(args).await,
        Commands::Status(args) => status::run(args),
    }
}

/// Build the location service from the default configuration
pub(crate) fn build_service() -> Result<LocationService> {
    let config = Config::load()?;
    LocationService::from_config(&config)
}

/// Print any serializable value as pretty JSON
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
