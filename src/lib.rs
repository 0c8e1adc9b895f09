//! geolocus: geolocation resolution engine
//!
//! A library and CLI tool for resolving human addresses to coordinates and
//! back, searching points of interest, and performing geometric reasoning,
//! backed by interchangeable external geocoding providers.
//!
//! ## Features
//!
//! - Multiple geocoding providers (Amap, Tencent LBS) behind one trait
//! - Deterministic provider selection by configured priority order
//! - Canonical address/POI entities regardless of provider
//! - Pure geometry (haversine distance, centroid, point-in-polygon) that
//!   keeps working when no provider is configured
//!
//! ## Quick Start
//!
//! ```rust
//! use geolocus::geomath;
//! use geolocus::model::Coordinate;
//!
//! let tiananmen = Coordinate::new(116.3913, 39.9075);
//! let forbidden_city = Coordinate::new(116.3972, 39.9163);
//!
//! let meters = geomath::distance(tiananmen, forbidden_city);
//! assert!(meters > 900.0 && meters < 1200.0);
//!
//! let center = geomath::centroid(&[tiananmen, forbidden_city]).unwrap();
//! assert!(center.latitude > 39.9075 && center.latitude < 39.9163);
//! ```
//!
//! Provider-backed operations go through [`service::LocationService`], which
//! is constructed from a [`config::Config`] and owns the provider registry.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod geomath;
pub mod model;
pub mod provider;
pub mod registry;
pub mod service;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use model::{AddressInfo, Coordinate, PoiInfo, PoiPage, PoiQuery, ProviderDescriptor, ServiceStatus};
pub use registry::ProviderRegistry;
pub use service::LocationService;
