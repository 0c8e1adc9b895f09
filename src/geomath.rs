//! Stateless geometric primitives
//!
//! Pure functions over [`Coordinate`] values. None of them touch a provider,
//! so they keep working when no geocoding service is configured.
//!
//! Caller contract: coordinates passed to [`distance`] and
//! [`point_in_polygon`] have already been range-validated. The service layer
//! validates every entry point before delegating here.

use crate::constants::geo::EARTH_RADIUS_METERS;
use crate::error::{Error, Result};
use crate::model::Coordinate;
use std::f64::consts::PI;

/// Convert degrees to radians
pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Validate a longitude/latitude pair
///
/// Longitude must be in [-180, 180] and latitude in [-90, 90].
/// NaN and infinite values are always invalid.
pub fn validate_coordinate(longitude: f64, latitude: f64) -> bool {
    longitude >= -180.0 && longitude <= 180.0 && latitude >= -90.0 && latitude <= 90.0
}

/// Great-circle distance between two points in meters (haversine formula)
///
/// Symmetric: `distance(a, b) == distance(b, a)` within floating point
/// tolerance.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = to_radians(a.latitude);
    let lat2 = to_radians(b.latitude);
    let delta_lat = to_radians(b.latitude - a.latitude);
    let delta_lng = to_radians(b.longitude - a.longitude);

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Arithmetic-mean centroid of a set of points
///
/// Planar approximation: longitudes and latitudes are averaged independently,
/// which is adequate for short-range clustering but not for point sets that
/// span the antimeridian.
pub fn centroid(points: &[Coordinate]) -> Result<Coordinate> {
    if points.is_empty() {
        return Err(Error::InvalidInput(
            "Cannot compute the centroid of an empty point set".to_string(),
        ));
    }

    let n = points.len() as f64;
    let longitude = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    let latitude = points.iter().map(|p| p.latitude).sum::<f64>() / n;

    Ok(Coordinate::new(longitude, latitude))
}

/// Test whether a point lies inside a polygon (ray casting)
///
/// Casts a horizontal ray from the point and counts edge crossings; an odd
/// count means inside. The polygon is an open ring: the first and last
/// vertices need not coincide, the closing edge is implied.
///
/// A point exactly on a vertex or edge may land on either side, but the same
/// input always yields the same output. Polygons with fewer than 3 vertices
/// contain nothing.
pub fn point_in_polygon(point: Coordinate, polygon: &[Coordinate]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].longitude, polygon[i].latitude);
        let (xj, yj) = (polygon[j].longitude, polygon[j].latitude);

        let crosses = (yi > point.latitude) != (yj > point.latitude)
            && point.longitude < (xj - xi) * (point.latitude - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = Coordinate::new(116.397, 39.909);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Coordinate::new(116.397, 39.909);
        let b = Coordinate::new(121.474, 31.230);

        assert_relative_eq!(distance(a, b), distance(b, a), max_relative = 1e-6);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        // One degree of latitude is about 111.2 km everywhere on the sphere
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);

        let d = distance(a, b);
        assert_relative_eq!(d, 111_195.0, max_relative = 0.01);
    }

    #[test]
    fn test_distance_known_value() {
        // Beijing to Shanghai is roughly 1,070 km
        let beijing = Coordinate::new(116.397, 39.909);
        let shanghai = Coordinate::new(121.474, 31.230);

        let d = distance(beijing, shanghai);
        assert!(d > 1_050_000.0 && d < 1_090_000.0, "got {}", d);
    }

    #[test]
    fn test_centroid_single_point() {
        let c = centroid(&[Coordinate::new(0.0, 0.0)]).unwrap();
        assert_eq!(c.longitude, 0.0);
        assert_eq!(c.latitude, 0.0);
    }

    #[test]
    fn test_centroid_mean() {
        let c = centroid(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)]).unwrap();
        assert_eq!(c.longitude, 0.0);
        assert_eq!(c.latitude, 1.0);
    }

    #[test]
    fn test_centroid_empty_is_invalid() {
        let err = centroid(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_coordinate_ranges() {
        assert!(validate_coordinate(0.0, 0.0));
        assert!(validate_coordinate(-180.0, -90.0));
        assert!(validate_coordinate(180.0, 90.0));

        assert!(!validate_coordinate(180.1, 0.0));
        assert!(!validate_coordinate(-180.1, 0.0));
        assert!(!validate_coordinate(0.0, 90.1));
        assert!(!validate_coordinate(0.0, -90.1));
    }

    #[test]
    fn test_validate_coordinate_non_finite() {
        assert!(!validate_coordinate(f64::NAN, 0.0));
        assert!(!validate_coordinate(0.0, f64::NAN));
        assert!(!validate_coordinate(f64::INFINITY, 0.0));
        assert!(!validate_coordinate(0.0, f64::NEG_INFINITY));
    }

    #[test]
    fn test_to_radians() {
        assert_relative_eq!(to_radians(180.0), PI, max_relative = 1e-12);
        assert_relative_eq!(to_radians(90.0), PI / 2.0, max_relative = 1e-12);
        assert_eq!(to_radians(0.0), 0.0);
    }

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
        ]
    }

    #[test]
    fn test_point_in_polygon_square() {
        assert!(point_in_polygon(Coordinate::new(5.0, 5.0), &square()));
        assert!(!point_in_polygon(Coordinate::new(15.0, 15.0), &square()));
    }

    #[test]
    fn test_point_in_polygon_near_edges() {
        assert!(point_in_polygon(Coordinate::new(0.001, 0.001), &square()));
        assert!(!point_in_polygon(Coordinate::new(-0.001, 5.0), &square()));
        assert!(!point_in_polygon(Coordinate::new(10.001, 5.0), &square()));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // L-shaped polygon: the notch at the top right is outside
        let polygon = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(5.0, 10.0),
            Coordinate::new(5.0, 5.0),
            Coordinate::new(10.0, 5.0),
            Coordinate::new(10.0, 0.0),
        ];

        assert!(point_in_polygon(Coordinate::new(2.0, 8.0), &polygon));
        assert!(!point_in_polygon(Coordinate::new(8.0, 8.0), &polygon));
        assert!(point_in_polygon(Coordinate::new(8.0, 2.0), &polygon));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        let line = vec![Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 10.0)];
        assert!(!point_in_polygon(Coordinate::new(5.0, 5.0), &line));
        assert!(!point_in_polygon(Coordinate::new(5.0, 5.0), &[]));
    }

    #[test]
    fn test_point_in_polygon_deterministic_on_boundary() {
        // Boundary inclusion is not guaranteed, but it must be stable
        let on_edge = Coordinate::new(0.0, 5.0);
        let first = point_in_polygon(on_edge, &square());
        for _ in 0..10 {
            assert_eq!(point_in_polygon(on_edge, &square()), first);
        }
    }
}
