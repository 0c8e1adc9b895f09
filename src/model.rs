//! Canonical domain entities
//!
//! Every provider adapter maps its native payloads into these shapes, so
//! callers see the same fields regardless of which provider answered.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A geographic coordinate (longitude, latitude) in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Validate that the coordinate is within valid ranges
    ///
    /// Longitude: -180 to 180
    /// Latitude: -90 to 90
    ///
    /// NaN and infinite values fail both checks.
    pub fn validate(&self) -> Result<()> {
        if !(self.longitude >= -180.0 && self.longitude <= 180.0) {
            return Err(Error::InvalidInput(format!(
                "Longitude {} is out of range [-180, 180]",
                self.longitude
            )));
        }
        if !(self.latitude >= -90.0 && self.latitude <= 90.0) {
            return Err(Error::InvalidInput(format!(
                "Latitude {} is out of range [-90, 90]",
                self.latitude
            )));
        }
        Ok(())
    }
}

/// A resolved address with optional administrative components
///
/// Fields a provider could not resolve are `None`, never an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Full formatted address
    pub address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub township: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,

    /// Resolved coordinate, when the provider returned one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,

    /// Administrative precision of the match (e.g. "street", "district")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Administrative region code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adcode: Option<String>,
}

impl AddressInfo {
    /// Create an address with only the formatted string set
    pub fn bare(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            province: None,
            city: None,
            district: None,
            township: None,
            neighborhood: None,
            building: None,
            location: None,
            level: None,
            adcode: None,
        }
    }
}

/// A point of interest returned by POI search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiInfo {
    /// Provider-scoped identifier
    pub id: String,

    pub name: String,

    /// Category tag
    #[serde(rename = "type")]
    pub poi_type: String,

    pub address: String,

    pub location: Coordinate,

    /// Meters from the reference point. Present only for nearby queries,
    /// always recomputed with the crate's own haversine formula.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
}

/// One page of POI search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoiPage {
    pub pois: Vec<PoiInfo>,

    /// Provider-reported total match count, not the page size
    pub total: u64,
}

/// Parameters for a paged POI keyword search
#[derive(Debug, Clone)]
pub struct PoiQuery {
    pub keyword: String,
    pub city: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl PoiQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            city: None,
            page: 1,
            limit: 20,
        }
    }
}

/// Configuration presence of a single provider, not live reachability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub name: String,
    pub configured: bool,
}

/// Snapshot of provider availability, recomputed on demand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub available: bool,

    /// Name of the currently active provider, if any
    pub provider: Option<String>,

    pub providers: Vec<ProviderDescriptor>,
}
