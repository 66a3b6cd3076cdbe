use crate::models::GeoPoint;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the Haversine distance between two points in meters
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Great-circle distance in meters
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Haversine distance between two coordinates, in meters
#[inline]
pub fn distance_between(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!(
            (distance - 344_000.0).abs() < 10_000.0,
            "Distance should be ~344km, got {}m",
            distance
        );
    }

    #[test]
    fn test_haversine_zero_for_same_point() {
        let distance = haversine_distance(31.2304, 121.4737, 31.2304, 121.4737);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = GeoPoint::new(31.2304, 121.4737);
        let b = GeoPoint::new(31.2400, 121.4900);

        assert_eq!(distance_between(a, b), distance_between(b, a));
    }

    #[test]
    fn test_city_block_scale() {
        // Two points ~130m apart in downtown Shanghai
        let distance = haversine_distance(31.2304, 121.4737, 31.2314, 121.4742);
        assert!(
            distance > 100.0 && distance < 200.0,
            "Expected ~130m, got {}m",
            distance
        );
    }
}
