//! Location service facade
//!
//! Orchestrates the provider registry and the geometry primitives behind one
//! call surface. Each provider-backed operation validates its inputs, selects
//! the active adapter (failing fast with `ServiceUnavailable` before any
//! network I/O when none is configured), delegates, and applies the
//! cross-provider invariants.
//!
//! Geometry operations never touch a provider. They keep working when no
//! provider is configured, which is the deliberate degradation boundary.

use crate::config::Config;
use crate::constants::limits;
use crate::error::{Error, Result};
use crate::geomath;
use crate::model::{AddressInfo, Coordinate, PoiInfo, PoiPage, PoiQuery, ServiceStatus};
use crate::provider::GeoProvider;
use crate::registry::ProviderRegistry;

/// Facade over provider selection, normalization, and geometry
///
/// Stateless per call beyond the registry's configuration snapshot; safe to
/// share across concurrent requests.
pub struct LocationService {
    registry: ProviderRegistry,
}

impl LocationService {
    /// Create a service over an existing registry
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Create a service from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ProviderRegistry::from_config(config)?))
    }

    /// The active adapter, or `ServiceUnavailable` when none is configured
    fn active(&self) -> Result<&dyn GeoProvider> {
        self.registry.select().ok_or(Error::ServiceUnavailable)
    }

    /// Whether any provider is configured
    pub fn is_available(&self) -> bool {
        self.registry.is_available()
    }

    /// Provider availability snapshot, recomputed on demand
    pub fn status(&self) -> ServiceStatus {
        self.registry.status()
    }

    /// Resolve an address string to a single best match
    pub async fn geocode(&self, address: &str) -> Result<AddressInfo> {
        validate_text("address", address, limits::MAX_ADDRESS_LEN)?;
        self.active()?.geocode(address).await
    }

    /// Resolve a coordinate to an address
    pub async fn reverse_geocode(&self, location: Coordinate) -> Result<AddressInfo> {
        location.validate()?;
        self.active()?.reverse_geocode(location).await
    }

    /// Keyword POI search with pagination
    pub async fn search_poi(&self, query: &PoiQuery) -> Result<PoiPage> {
        validate_text("keyword", &query.keyword, limits::MAX_KEYWORD_LEN)?;
        validate_city(query.city.as_deref())?;
        if query.page == 0 {
            return Err(Error::InvalidInput("page must be at least 1".to_string()));
        }
        if query.limit == 0 || query.limit > limits::MAX_PAGE_SIZE {
            return Err(Error::InvalidInput(format!(
                "limit {} is out of range [1, {}]",
                query.limit,
                limits::MAX_PAGE_SIZE
            )));
        }

        self.active()?.search_poi(query).await
    }

    /// Ranked address suggestions for partial input
    pub async fn search_address(
        &self,
        input: &str,
        city: Option<&str>,
    ) -> Result<Vec<AddressInfo>> {
        validate_text("input", input, limits::MAX_SUGGEST_LEN)?;
        validate_city(city)?;
        self.active()?.search_address(input, city).await
    }

    /// POIs within a radius of a point
    ///
    /// Every returned POI carries a `distance` recomputed with the crate's
    /// own haversine formula against the query coordinate, overriding
    /// whatever the provider reported. One distance semantics across all
    /// providers.
    pub async fn nearby_poi(
        &self,
        center: Coordinate,
        radius_meters: f64,
        poi_type: Option<&str>,
    ) -> Result<Vec<PoiInfo>> {
        center.validate()?;
        if !(radius_meters >= limits::MIN_RADIUS_METERS && radius_meters <= limits::MAX_RADIUS_METERS)
        {
            return Err(Error::InvalidInput(format!(
                "radius {} is out of range [{}, {}] meters",
                radius_meters,
                limits::MIN_RADIUS_METERS,
                limits::MAX_RADIUS_METERS
            )));
        }

        let mut pois = self
            .active()?
            .nearby_poi(center, radius_meters, poi_type)
            .await?;

        for poi in &mut pois {
            poi.distance = Some(geomath::distance(center, poi.location));
        }

        Ok(pois)
    }

    /// Locate an IP address, or the caller's observed address when `ip` is
    /// None
    pub async fn current_location(&self, ip: Option<&str>) -> Result<AddressInfo> {
        self.active()?.locate_ip(ip).await
    }

    /// Great-circle distance between two points in meters
    ///
    /// Works without any configured provider.
    pub fn calculate_distance(&self, a: Coordinate, b: Coordinate) -> Result<f64> {
        a.validate()?;
        b.validate()?;
        Ok(geomath::distance(a, b))
    }

    /// Centroid of a set of points
    ///
    /// Works without any configured provider.
    pub fn calculate_center(&self, points: &[Coordinate]) -> Result<Coordinate> {
        for point in points {
            point.validate()?;
        }
        geomath::centroid(points)
    }

    /// Whether a point lies inside a polygon
    ///
    /// Works without any configured provider.
    pub fn is_point_in_polygon(&self, point: Coordinate, polygon: &[Coordinate]) -> Result<bool> {
        point.validate()?;
        if polygon.len() < 3 {
            return Err(Error::InvalidInput(format!(
                "polygon needs at least 3 vertices, got {}",
                polygon.len()
            )));
        }
        for vertex in polygon {
            vertex.validate()?;
        }

        Ok(geomath::point_in_polygon(point, polygon))
    }

    /// Validate a longitude/latitude pair
    pub fn validate_coordinates(&self, longitude: f64, latitude: f64) -> bool {
        geomath::validate_coordinate(longitude, latitude)
    }
}

fn validate_text(label: &str, value: &str, max_chars: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", label)));
    }
    let chars = value.chars().count();
    if chars > max_chars {
        return Err(Error::InvalidInput(format!(
            "{} is {} characters long, maximum is {}",
            label, chars, max_chars
        )));
    }
    Ok(())
}

fn validate_city(city: Option<&str>) -> Result<()> {
    if let Some(city) = city {
        validate_text("city", city, limits::MAX_CITY_LEN)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::FakeProvider;

    fn service_with(providers: Vec<Box<dyn GeoProvider>>) -> LocationService {
        LocationService::new(ProviderRegistry::new(providers))
    }

    fn unavailable_service() -> LocationService {
        service_with(vec![Box::new(FakeProvider::new("alpha", false))])
    }

    #[tokio::test]
    async fn test_geocode_through_active_provider() {
        let service = service_with(vec![Box::new(FakeProvider::new("alpha", true))]);

        let info = service.geocode("景山前街4号").await.unwrap();
        assert_eq!(info.address, "resolved: 景山前街4号");

        let location = info.location.unwrap();
        assert!(service.validate_coordinates(location.longitude, location.latitude));
    }

    #[tokio::test]
    async fn test_geocode_rejects_empty_and_oversized() {
        let service = service_with(vec![Box::new(FakeProvider::new("alpha", true))]);

        let err = service.geocode("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let long = "地".repeat(201);
        let err = service.geocode(&long).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // 200 characters is still accepted
        let max = "地".repeat(200);
        assert!(service.geocode(&max).await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_calls_fail_fast_when_unavailable() {
        let service = unavailable_service();

        assert!(!service.is_available());
        assert!(matches!(
            service.geocode("x").await.unwrap_err(),
            Error::ServiceUnavailable
        ));
        assert!(matches!(
            service
                .reverse_geocode(Coordinate::new(116.4, 39.9))
                .await
                .unwrap_err(),
            Error::ServiceUnavailable
        ));
        assert!(matches!(
            service.search_poi(&PoiQuery::new("饭店")).await.unwrap_err(),
            Error::ServiceUnavailable
        ));
        assert!(matches!(
            service.current_location(None).await.unwrap_err(),
            Error::ServiceUnavailable
        ));
    }

    #[tokio::test]
    async fn test_geometry_survives_unavailable_service() {
        let service = unavailable_service();

        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let d = service.calculate_distance(a, b).unwrap();
        assert!(d > 110_000.0 && d < 112_000.0);

        let center = service.calculate_center(&[a, b]).unwrap();
        assert_eq!(center.latitude, 0.5);

        let square = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
        ];
        assert!(service
            .is_point_in_polygon(Coordinate::new(5.0, 5.0), &square)
            .unwrap());
        assert!(service.validate_coordinates(116.4, 39.9));
    }

    #[tokio::test]
    async fn test_reverse_geocode_validates_coordinate() {
        let service = service_with(vec![Box::new(FakeProvider::new("alpha", true))]);

        let err = service
            .reverse_geocode(Coordinate::new(200.0, 39.9))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_search_poi_validates_pagination() {
        let service = service_with(vec![Box::new(FakeProvider::new("alpha", true))]);

        let mut query = PoiQuery::new("饭店");
        query.page = 0;
        assert!(matches!(
            service.search_poi(&query).await.unwrap_err(),
            Error::InvalidInput(_)
        ));

        let mut query = PoiQuery::new("饭店");
        query.limit = 51;
        assert!(matches!(
            service.search_poi(&query).await.unwrap_err(),
            Error::InvalidInput(_)
        ));

        let mut query = PoiQuery::new("饭店");
        query.limit = 0;
        assert!(matches!(
            service.search_poi(&query).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_search_poi_validates_keyword_and_city() {
        let service = service_with(vec![Box::new(FakeProvider::new("alpha", true))]);

        let query = PoiQuery::new("关".repeat(51));
        assert!(matches!(
            service.search_poi(&query).await.unwrap_err(),
            Error::InvalidInput(_)
        ));

        let mut query = PoiQuery::new("饭店");
        query.city = Some("市".repeat(51));
        assert!(matches!(
            service.search_poi(&query).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_nearby_poi_validates_radius() {
        let service = service_with(vec![Box::new(FakeProvider::new("alpha", true))]);
        let center = Coordinate::new(116.4, 39.9);

        assert!(matches!(
            service.nearby_poi(center, 99.0, None).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            service.nearby_poi(center, 10_001.0, None).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            service.nearby_poi(center, f64::NAN, None).await.unwrap_err(),
            Error::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_nearby_poi_recomputes_distance() {
        let center = Coordinate::new(116.4, 39.9);
        let poi_location = Coordinate::new(116.41, 39.91);

        let mut provider = FakeProvider::new("alpha", true);
        provider.pois = vec![PoiInfo {
            id: "p1".to_string(),
            name: "某餐厅".to_string(),
            poi_type: "餐饮服务".to_string(),
            address: "某路1号".to_string(),
            location: poi_location,
            // Deliberately wrong provider-reported value
            distance: Some(99_999.0),
            tel: None,
        }];

        let service = service_with(vec![Box::new(provider)]);
        let pois = service.nearby_poi(center, 5000.0, None).await.unwrap();

        assert_eq!(pois.len(), 1);
        let expected = geomath::distance(center, poi_location);
        assert_eq!(pois[0].distance, Some(expected));
        assert!(expected < 2000.0, "sanity: {}", expected);
    }

    #[tokio::test]
    async fn test_status_reflects_registry() {
        let service = service_with(vec![
            Box::new(FakeProvider::new("alpha", false)),
            Box::new(FakeProvider::new("beta", true)),
        ]);

        let status = service.status();
        assert!(status.available);
        assert_eq!(status.provider.as_deref(), Some("beta"));
        assert_eq!(status.providers.len(), 2);
    }

    #[test]
    fn test_polygon_needs_three_vertices() {
        let service = unavailable_service();
        let err = service
            .is_point_in_polygon(
                Coordinate::new(5.0, 5.0),
                &[Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0)],
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_calculate_center_rejects_invalid_point() {
        let service = unavailable_service();
        let err = service
            .calculate_center(&[Coordinate::new(0.0, 0.0), Coordinate::new(181.0, 0.0)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
