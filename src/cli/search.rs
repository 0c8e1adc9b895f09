//! POI search command handlers

use crate::cli::{build_service, print_json};
use crate::error::Result;
use crate::model::{Coordinate, PoiQuery};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Search keyword
    pub keyword: String,

    /// Restrict the search to a city
    #[arg(long, short = 'c')]
    pub city: Option<String>,

    /// Result page, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long, default_value = "20")]
    pub limit: u32,
}

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Longitude of the center point
    pub longitude: f64,

    /// Latitude of the center point
    pub latitude: f64,

    /// Search radius in meters
    #[arg(long, short = 'r', default_value = "1000")]
    pub radius: f64,

    /// POI category filter
    #[arg(long, short = 't')]
    pub poi_type: Option<String>,
}

/// Run the search command
pub async fn search(args: SearchArgs) -> Result<()> {
    let service = build_service()?;

    let query = PoiQuery {
        keyword: args.keyword,
        city: args.city,
        page: args.page,
        limit: args.limit,
    };

    let page = service.search_poi(&query).await?;
    print_json(&page)
}

/// Run the nearby command
pub async fn nearby(args: NearbyArgs) -> Result<()> {
    let service = build_service()?;

    let pois = service
        .nearby_poi(
            Coordinate::new(args.longitude, args.latitude),
            args.radius,
            args.poi_type.as_deref(),
        )
        .await?;
    print_json(&pois)
}
