use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::sort_by_distance;
use crate::models::{GeoPoint, Restaurant};
use crate::services::catalog::{Catalog, CatalogError};
use crate::services::delay::Sleeper;

/// Stub restaurant discovery service.
///
/// Waits for the configured simulated latency, loads the bundled catalog,
/// and ranks everything by distance from the caller. There is no paging
/// and no server-side filtering; the catalog is small enough to return
/// whole.
pub struct RestaurantService {
    catalog: Arc<Catalog>,
    sleeper: Arc<dyn Sleeper>,
    latency: Duration,
}

impl RestaurantService {
    pub fn new(catalog: Arc<Catalog>, sleeper: Arc<dyn Sleeper>, latency: Duration) -> Self {
        Self {
            catalog,
            sleeper,
            latency,
        }
    }

    /// Fetch all restaurants ordered nearest-first from `location`.
    pub async fn fetch_nearby(&self, location: GeoPoint) -> Result<Vec<Restaurant>, CatalogError> {
        self.sleeper.sleep(self.latency).await;

        let restaurants = self.catalog.load_restaurants()?;
        debug!(
            "ranking {} restaurants around ({}, {})",
            restaurants.len(),
            location.latitude,
            location.longitude
        );

        Ok(sort_by_distance(location, restaurants))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::delay::NoDelay;
    use std::io::Write;

    fn fixture_catalog() -> Arc<Catalog> {
        let path = std::env::temp_dir().join("restaurant_service_test.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"{"restaurants": [
                {"id": "far", "name": "Far", "type": "western", "address": "a",
                 "latitude": 31.2500, "longitude": 121.4737, "rating": 4.0,
                 "priceLevel": "$$", "openTime": "10:00-22:00"},
                {"id": "near", "name": "Near", "type": "coffee", "address": "b",
                 "latitude": 31.2305, "longitude": 121.4737, "rating": 4.2,
                 "priceLevel": "$", "openTime": "08:00-20:00"}
            ]}"#,
        )
        .unwrap();

        Arc::new(Catalog::new(&path, std::env::temp_dir().join("unused.json")))
    }

    #[test]
    fn test_fetch_nearby_orders_by_distance() {
        let service = RestaurantService::new(fixture_catalog(), Arc::new(NoDelay), Duration::ZERO);

        let restaurants = tokio_test::block_on(
            service.fetch_nearby(GeoPoint::new(31.2304, 121.4737)),
        )
        .unwrap();

        assert_eq!(restaurants.len(), 2);
        assert_eq!(restaurants[0].id, "near");
        assert_eq!(restaurants[1].id, "far");
    }
}
