//! Geocoding provider adapters
//!
//! This module defines the `GeoProvider` trait and one implementation per
//! external service. Each adapter is a single file implementing the trait.
//!
//! Adding a new provider requires:
//! 1. Create `src/provider/{provider_name}.rs` implementing `GeoProvider`
//! 2. Add `pub mod {provider_name};` below
//! 3. Wire it up in `registry::ProviderRegistry::from_config`

pub mod amap;
pub mod tencent;

use crate::error::{Error, Result};
use crate::model::{AddressInfo, Coordinate, PoiInfo, PoiPage, PoiQuery};
use async_trait::async_trait;

/// Contract every geocoding provider must implement
///
/// Implementations must be thread-safe (Send + Sync) so a single registry can
/// serve concurrent requests. All network methods enforce a bounded timeout
/// and surface a single failed attempt immediately; there is no retry here.
/// Dropping a returned future aborts the underlying HTTP request.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Provider name used in configuration and status (e.g. "amap")
    fn name(&self) -> &'static str;

    /// Human-readable description of this provider
    fn description(&self) -> &'static str;

    /// Whether required credentials are present
    ///
    /// Evaluated at query time; does not probe liveness.
    fn is_configured(&self) -> bool;

    /// Resolve an address to a single best match
    ///
    /// Fails with `NotFound` when the provider returns zero matches.
    async fn geocode(&self, address: &str) -> Result<AddressInfo>;

    /// Resolve a coordinate to an address
    ///
    /// Fails with `NotFound` when nothing resolves at the provider's
    /// precision.
    async fn reverse_geocode(&self, location: Coordinate) -> Result<AddressInfo>;

    /// Keyword POI search with provider-relative pagination
    ///
    /// Zero matches is a valid empty page, not an error.
    async fn search_poi(&self, query: &PoiQuery) -> Result<PoiPage>;

    /// Ranked address suggestions for partial input
    ///
    /// Returns an empty list when nothing matches.
    async fn search_address(&self, input: &str, city: Option<&str>) -> Result<Vec<AddressInfo>>;

    /// POIs within a radius of a point; the provider performs the spatial
    /// filter
    async fn nearby_poi(
        &self,
        center: Coordinate,
        radius_meters: f64,
        poi_type: Option<&str>,
    ) -> Result<Vec<PoiInfo>>;

    /// Locate an IP address
    ///
    /// `None` means "the caller's observed address", resolved by the provider
    /// from the requesting connection.
    async fn locate_ip(&self, ip: Option<&str>) -> Result<AddressInfo>;
}

/// Parse a provider "lng,lat" string into a validated coordinate
///
/// Out-of-range or malformed values are a `Provider` error: a payload that
/// carries an invalid coordinate must never leak into callers.
pub(crate) fn parse_lng_lat(provider: &str, raw: &str) -> Result<Coordinate> {
    let mut parts = raw.split(',');

    let (Some(lng), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::Provider(format!(
            "{provider}: malformed location '{raw}'"
        )));
    };

    let longitude: f64 = lng
        .trim()
        .parse()
        .map_err(|_| Error::Provider(format!("{provider}: invalid longitude '{lng}'")))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| Error::Provider(format!("{provider}: invalid latitude '{lat}'")))?;

    let coordinate = Coordinate::new(longitude, latitude);
    if coordinate.validate().is_err() {
        return Err(Error::Provider(format!(
            "{provider}: location '{raw}' is out of range"
        )));
    }

    Ok(coordinate)
}

/// Build a validated coordinate from numeric provider fields
pub(crate) fn checked_coordinate(provider: &str, longitude: f64, latitude: f64) -> Result<Coordinate> {
    let coordinate = Coordinate::new(longitude, latitude);
    if coordinate.validate().is_err() {
        return Err(Error::Provider(format!(
            "{provider}: location {longitude},{latitude} is out of range"
        )));
    }
    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lng_lat() {
        let c = parse_lng_lat("amap", "116.397428,39.90923").unwrap();
        assert!((c.longitude - 116.397428).abs() < 1e-9);
        assert!((c.latitude - 39.90923).abs() < 1e-9);
    }

    #[test]
    fn test_parse_lng_lat_malformed() {
        assert!(parse_lng_lat("amap", "116.397428").is_err());
        assert!(parse_lng_lat("amap", "a,b").is_err());
        assert!(parse_lng_lat("amap", "1,2,3").is_err());
        assert!(parse_lng_lat("amap", "").is_err());
    }

    #[test]
    fn test_parse_lng_lat_out_of_range() {
        let err = parse_lng_lat("amap", "200.0,39.9").unwrap_err();
        assert!(matches!(err, Error::Provider(_)));

        let err = parse_lng_lat("amap", "116.4,99.0").unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[test]
    fn test_checked_coordinate() {
        assert!(checked_coordinate("tencent", 116.4, 39.9).is_ok());
        assert!(checked_coordinate("tencent", 116.4, 91.0).is_err());
    }
}
