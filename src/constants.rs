//! Centralized constants for the geolocus crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// External API endpoints
pub mod api {
    /// Amap (Gaode) web service API
    pub const AMAP_URL: &str = "https://restapi.amap.com";

    /// Tencent LBS web service API
    pub const TENCENT_URL: &str = "https://apis.map.qq.com";
}

/// Input limits enforced at the service boundary
pub mod limits {
    /// Maximum address length for geocoding, in characters
    pub const MAX_ADDRESS_LEN: usize = 200;

    /// Maximum POI search keyword length, in characters
    pub const MAX_KEYWORD_LEN: usize = 50;

    /// Maximum city name length, in characters
    pub const MAX_CITY_LEN: usize = 50;

    /// Maximum address suggestion input length, in characters
    pub const MAX_SUGGEST_LEN: usize = 100;

    /// Maximum POI results per page
    pub const MAX_PAGE_SIZE: u32 = 50;

    /// Minimum nearby search radius in meters
    pub const MIN_RADIUS_METERS: f64 = 100.0;

    /// Maximum nearby search radius in meters
    pub const MAX_RADIUS_METERS: f64 = 10_000.0;
}

/// HTTP client settings
pub mod http {
    /// Default per-request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

    /// Upper bound accepted for the configured timeout
    pub const MAX_TIMEOUT_SECS: u64 = 60;
}
