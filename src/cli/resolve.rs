//! Address resolution command handlers
//!
//! geocode, reverse, suggest, and locate commands.

use crate::cli::{build_service, print_json};
use crate::error::Result;
use crate::model::Coordinate;
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Address to resolve
    pub address: String,
}

/// Reverse geocode command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Longitude in degrees
    pub longitude: f64,

    /// Latitude in degrees
    pub latitude: f64,
}

/// Suggest command arguments
#[derive(Args)]
pub struct SuggestArgs {
    /// Partial address or place name
    pub input: String,

    /// Restrict suggestions to a city
    #[arg(long, short = 'c')]
    pub city: Option<String>,
}

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// IP address to locate; omit for the current machine
    pub ip: Option<String>,
}

/// Run the geocode command
pub async fn geocode(args: GeocodeArgs) -> Result<()> {
    let service = build_service()?;
    let info = service.geocode(&args.address).await?;
    print_json(&info)
}

/// Run the reverse geocode command
pub async fn reverse(args: ReverseArgs) -> Result<()> {
    let service = build_service()?;
    let info = service
        .reverse_geocode(Coordinate::new(args.longitude, args.latitude))
        .await?;
    print_json(&info)
}

/// Run the suggest command
pub async fn suggest(args: SuggestArgs) -> Result<()> {
    let service = build_service()?;
    let suggestions = service
        .search_address(&args.input, args.city.as_deref())
        .await?;
    print_json(&suggestions)
}

/// Run the locate command
pub async fn locate(args: LocateArgs) -> Result<()> {
    let service = build_service()?;
    let info = service.current_location(args.ip.as_deref()).await?;
    print_json(&info)
}
