use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::find_nearby;
use crate::models::{Locatable, Restaurant, User};
use crate::services::catalog::{Catalog, CatalogError};
use crate::services::delay::Sleeper;

/// Errors that can occur when finding candidates or issuing a request
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("match request failed: {0}")]
    RequestFailed(String),
}

/// Decides whether the other party accepts a match request.
///
/// The production decider is a coin flip; tests substitute fixed or
/// failing deciders to drive each outcome branch.
pub trait Decider: Send + Sync {
    fn decide(&self, user_id: &str) -> Result<bool, MatchingError>;
}

/// Accepts with a fixed probability, the way the backend stub always has
pub struct RandomDecider {
    accept_rate: f64,
}

impl RandomDecider {
    pub fn new(accept_rate: f64) -> Self {
        Self { accept_rate }
    }
}

impl Decider for RandomDecider {
    fn decide(&self, _user_id: &str) -> Result<bool, MatchingError> {
        Ok(rand::thread_rng().gen::<f64>() < self.accept_rate)
    }
}

/// Always answers the same way; for tests and demos
pub struct FixedDecider(pub bool);

impl Decider for FixedDecider {
    fn decide(&self, _user_id: &str) -> Result<bool, MatchingError> {
        Ok(self.0)
    }
}

/// Stub matching service.
///
/// Candidate discovery loads the bundled user catalog and runs the
/// proximity matcher around the chosen restaurant; request delivery is a
/// simulated wait followed by the injected decision.
pub struct MatchingService {
    catalog: Arc<Catalog>,
    sleeper: Arc<dyn Sleeper>,
    decider: Arc<dyn Decider>,
    search_latency: Duration,
    request_latency: Duration,
    radius_m: f64,
    limit: usize,
}

impl MatchingService {
    pub fn new(
        catalog: Arc<Catalog>,
        sleeper: Arc<dyn Sleeper>,
        decider: Arc<dyn Decider>,
        search_latency: Duration,
        request_latency: Duration,
        radius_m: f64,
        limit: usize,
    ) -> Self {
        Self {
            catalog,
            sleeper,
            decider,
            search_latency,
            request_latency,
            radius_m,
            limit,
        }
    }

    /// Find users near `restaurant` who could join a meal at `time`.
    ///
    /// The proposed time is accepted but not yet used for filtering: the
    /// user catalog carries no availability data.
    pub async fn find_matches(
        &self,
        restaurant: &Restaurant,
        time: DateTime<Utc>,
    ) -> Result<Vec<User>, MatchingError> {
        self.sleeper.sleep(self.search_latency).await;

        let users = self.catalog.load_users()?;
        debug!(
            "matching {} users near {} for {}",
            users.len(),
            restaurant.name,
            time
        );

        let nearby = find_nearby(restaurant.coordinate(), users, self.radius_m, self.limit);
        info!(
            "found {} candidates within {}m of {}",
            nearby.len(),
            self.radius_m,
            restaurant.name
        );

        Ok(nearby)
    }

    /// Ask `user_id` to join; true means accepted, false rejected.
    pub async fn send_match_request(&self, user_id: &str) -> Result<bool, MatchingError> {
        self.sleeper.sleep(self.request_latency).await;

        let accepted = self.decider.decide(user_id)?;
        info!(
            "match request to {} was {}",
            user_id,
            if accepted { "accepted" } else { "rejected" }
        );
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::delay::NoDelay;
    use std::io::Write;

    fn fixture_restaurant() -> Restaurant {
        serde_json::from_str(
            r#"{"id": "r1", "name": "Tech Park Kitchen", "type": "chinese",
                "address": "1 Tech Park Rd", "latitude": 31.2304,
                "longitude": 121.4737, "rating": 4.5, "priceLevel": "$$",
                "openTime": "10:00-21:30"}"#,
        )
        .unwrap()
    }

    // Per-test file names: these tests run in parallel and must not
    // truncate a file another test is reading
    fn fixture_catalog(file_name: &str) -> Arc<Catalog> {
        let path = std::env::temp_dir().join(file_name);
        let mut file = std::fs::File::create(&path).unwrap();
        // One user at the restaurant, one ~1.2km north
        file.write_all(
            br#"{"users": [
                {"id": "close", "nickname": "Close", "gender": "female",
                 "avatar": "a1", "preferences": [], "latitude": 31.2304, "longitude": 121.4737},
                {"id": "far", "nickname": "Far", "gender": "male",
                 "avatar": "a2", "preferences": [], "latitude": 31.2412, "longitude": 121.4737}
            ]}"#,
        )
        .unwrap();

        Arc::new(Catalog::new(std::env::temp_dir().join("unused.json"), &path))
    }

    fn service(file_name: &str, decider: Arc<dyn Decider>) -> MatchingService {
        MatchingService::new(
            fixture_catalog(file_name),
            Arc::new(NoDelay),
            decider,
            Duration::ZERO,
            Duration::ZERO,
            1000.0,
            3,
        )
    }

    #[test]
    fn test_find_matches_filters_radius() {
        let service = service(
            "matching_filters_radius_users.json",
            Arc::new(FixedDecider(true)),
        );
        let matches = tokio_test::block_on(
            service.find_matches(&fixture_restaurant(), Utc::now()),
        )
        .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "close");
    }

    #[test]
    fn test_send_request_uses_decider() {
        let accepting = service(
            "matching_request_accept_users.json",
            Arc::new(FixedDecider(true)),
        );
        let rejecting = service(
            "matching_request_reject_users.json",
            Arc::new(FixedDecider(false)),
        );

        assert!(tokio_test::block_on(accepting.send_match_request("u1")).unwrap());
        assert!(!tokio_test::block_on(rejecting.send_match_request("u1")).unwrap());
    }

    #[test]
    fn test_random_decider_rates() {
        let always = RandomDecider::new(1.0);
        let never = RandomDecider::new(0.0);

        for _ in 0..50 {
            assert!(always.decide("u1").unwrap());
            assert!(!never.decide("u1").unwrap());
        }
    }
}
