use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::GeoPoint;

/// Authorization state of the platform location capability
///
/// `NotDetermined` can move to any of the other three. `Denied` and
/// `Restricted` are terminal from the app's perspective; the only way out
/// is an external settings change, which arrives as an observed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

/// Errors that can occur while acquiring a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location access restricted on this device")]
    PermissionRestricted,

    #[error("location unavailable, try again later")]
    Unavailable,

    #[error("location error: {0}")]
    Other(String),
}

/// Platform location capability, abstracted so the engine never touches
/// the OS API directly and tests can script arbitrary behavior.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Prompt the user for permission and return the resulting status.
    async fn request_permission(&self) -> AuthorizationStatus;

    /// Acquire one coordinate fix.
    async fn acquire(&self) -> Result<GeoPoint, LocationError>;
}

/// Provider that is always authorized and reports a constant coordinate.
///
/// Backs the demo binary, where there is no real device to ask.
pub struct FixedLocationProvider {
    point: GeoPoint,
}

impl FixedLocationProvider {
    pub fn new(point: GeoPoint) -> Self {
        Self { point }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn authorization_status(&self) -> AuthorizationStatus {
        AuthorizationStatus::Authorized
    }

    async fn request_permission(&self) -> AuthorizationStatus {
        AuthorizationStatus::Authorized
    }

    async fn acquire(&self) -> Result<GeoPoint, LocationError> {
        Ok(self.point)
    }
}

/// Tracks the current coordinate and authorization state for one session.
///
/// All mutable state is owned here and accessed from one logical flow; a
/// failed acquisition leaves the previous coordinate intact and records a
/// typed error for the UI to surface. Acquisitions are guarded by a
/// generation counter so a superseded completion can never overwrite
/// newer state.
pub struct LocationTracker {
    provider: Arc<dyn LocationProvider>,
    status: AuthorizationStatus,
    current: Option<GeoPoint>,
    last_error: Option<LocationError>,
    acquiring: bool,
    generation: u64,
}

impl LocationTracker {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        let status = provider.authorization_status();
        debug!("location tracker created with status {:?}", status);
        Self {
            provider,
            status,
            current: None,
            last_error: None,
            acquiring: false,
            generation: 0,
        }
    }

    pub fn status(&self) -> AuthorizationStatus {
        self.status
    }

    pub fn current_location(&self) -> Option<GeoPoint> {
        self.current
    }

    pub fn last_error(&self) -> Option<&LocationError> {
        self.last_error.as_ref()
    }

    pub fn is_acquiring(&self) -> bool {
        self.acquiring
    }

    /// Ask the provider for permission if it has not been decided yet.
    ///
    /// Entering `Authorized` immediately attempts one acquisition; a
    /// denied or restricted answer records the matching error so the UI
    /// can offer the settings shortcut.
    pub async fn request_permission(&mut self) {
        match self.status {
            AuthorizationStatus::NotDetermined => {
                info!("requesting location permission");
                let status = self.provider.request_permission().await;
                self.apply_status(status);
                if self.status == AuthorizationStatus::Authorized {
                    self.refresh().await;
                }
            }
            AuthorizationStatus::Authorized => {
                self.refresh().await;
            }
            AuthorizationStatus::Denied => {
                self.last_error = Some(LocationError::PermissionDenied);
            }
            AuthorizationStatus::Restricted => {
                self.last_error = Some(LocationError::PermissionRestricted);
            }
        }
    }

    /// Apply an authorization change observed from outside (for example a
    /// settings-app change). Entering `Authorized` attempts one
    /// acquisition.
    pub async fn observe_status(&mut self, status: AuthorizationStatus) {
        self.apply_status(status);
        if status == AuthorizationStatus::Authorized {
            self.refresh().await;
        }
    }

    /// Acquire a coordinate from the provider, guarding against a stale
    /// completion.
    pub async fn refresh(&mut self) {
        match self.status {
            AuthorizationStatus::Authorized => {}
            AuthorizationStatus::Denied => {
                self.last_error = Some(LocationError::PermissionDenied);
                return;
            }
            AuthorizationStatus::Restricted => {
                self.last_error = Some(LocationError::PermissionRestricted);
                return;
            }
            AuthorizationStatus::NotDetermined => {
                return;
            }
        }

        let token = self.begin_refresh();
        let result = self.provider.acquire().await;
        self.complete_refresh(token, result);
    }

    /// Start an acquisition and return its generation token. Starting a
    /// new acquisition supersedes any still-pending one.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation += 1;
        self.acquiring = true;
        self.last_error = None;
        self.generation
    }

    /// Apply the result of the acquisition started with `token`. Results
    /// from a superseded acquisition are dropped.
    pub fn complete_refresh(&mut self, token: u64, result: Result<GeoPoint, LocationError>) {
        if token != self.generation {
            debug!(
                "dropping stale acquisition result (token {}, current {})",
                token, self.generation
            );
            return;
        }

        self.acquiring = false;
        match result {
            Ok(point) => {
                debug!(
                    "location updated: ({}, {})",
                    point.latitude, point.longitude
                );
                self.current = Some(point);
            }
            Err(e) => {
                warn!("location acquisition failed: {}", e);
                self.last_error = Some(e);
            }
        }
    }

    fn apply_status(&mut self, status: AuthorizationStatus) {
        debug!("authorization status changed to {:?}", status);
        self.status = status;
        match status {
            AuthorizationStatus::Authorized | AuthorizationStatus::NotDetermined => {
                self.last_error = None;
            }
            AuthorizationStatus::Denied => {
                self.acquiring = false;
                self.last_error = Some(LocationError::PermissionDenied);
            }
            AuthorizationStatus::Restricted => {
                self.acquiring = false;
                self.last_error = Some(LocationError::PermissionRestricted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Provider whose permission answer and acquisition results are
    /// scripted up front.
    struct ScriptedProvider {
        initial: AuthorizationStatus,
        granted: AuthorizationStatus,
        fixes: Mutex<Vec<Result<GeoPoint, LocationError>>>,
    }

    impl ScriptedProvider {
        fn new(
            initial: AuthorizationStatus,
            granted: AuthorizationStatus,
            fixes: Vec<Result<GeoPoint, LocationError>>,
        ) -> Self {
            Self {
                initial,
                granted,
                fixes: Mutex::new(fixes),
            }
        }
    }

    #[async_trait]
    impl LocationProvider for ScriptedProvider {
        fn authorization_status(&self) -> AuthorizationStatus {
            self.initial
        }

        async fn request_permission(&self) -> AuthorizationStatus {
            self.granted
        }

        async fn acquire(&self) -> Result<GeoPoint, LocationError> {
            self.fixes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LocationError::Unavailable))
        }
    }

    #[test]
    fn test_grant_then_acquire() {
        let provider = Arc::new(ScriptedProvider::new(
            AuthorizationStatus::NotDetermined,
            AuthorizationStatus::Authorized,
            vec![Ok(GeoPoint::new(31.2304, 121.4737))],
        ));
        let mut tracker = LocationTracker::new(provider);

        tokio_test::block_on(tracker.request_permission());

        assert_eq!(tracker.status(), AuthorizationStatus::Authorized);
        assert!(tracker.current_location().is_some());
        assert!(tracker.last_error().is_none());
        assert!(!tracker.is_acquiring());
    }

    #[test]
    fn test_denied_records_error() {
        let provider = Arc::new(ScriptedProvider::new(
            AuthorizationStatus::NotDetermined,
            AuthorizationStatus::Denied,
            vec![],
        ));
        let mut tracker = LocationTracker::new(provider);

        tokio_test::block_on(tracker.request_permission());

        assert_eq!(tracker.status(), AuthorizationStatus::Denied);
        assert!(tracker.current_location().is_none());
        assert_eq!(tracker.last_error(), Some(&LocationError::PermissionDenied));
    }

    #[test]
    fn test_failed_acquisition_keeps_previous_coordinate() {
        let provider = Arc::new(ScriptedProvider::new(
            AuthorizationStatus::Authorized,
            AuthorizationStatus::Authorized,
            // Popped back to front: first fix succeeds, second fails
            vec![Err(LocationError::Unavailable), Ok(GeoPoint::new(31.23, 121.47))],
        ));
        let mut tracker = LocationTracker::new(provider);

        tokio_test::block_on(tracker.refresh());
        let first = tracker.current_location();
        assert!(first.is_some());

        tokio_test::block_on(tracker.refresh());
        assert_eq!(tracker.current_location(), first);
        assert_eq!(tracker.last_error(), Some(&LocationError::Unavailable));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let provider = Arc::new(ScriptedProvider::new(
            AuthorizationStatus::Authorized,
            AuthorizationStatus::Authorized,
            vec![],
        ));
        let mut tracker = LocationTracker::new(provider);

        let stale = tracker.begin_refresh();
        let fresh = tracker.begin_refresh();

        tracker.complete_refresh(fresh, Ok(GeoPoint::new(31.24, 121.48)));
        // The superseded acquisition must not overwrite the newer fix
        tracker.complete_refresh(stale, Ok(GeoPoint::new(0.0, 0.0)));

        let current = tracker.current_location().unwrap();
        assert_eq!(current.latitude, 31.24);
    }

    #[test]
    fn test_observed_settings_change_reauthorizes() {
        let provider = Arc::new(ScriptedProvider::new(
            AuthorizationStatus::Denied,
            AuthorizationStatus::Denied,
            vec![Ok(GeoPoint::new(31.23, 121.47))],
        ));
        let mut tracker = LocationTracker::new(provider);
        assert_eq!(tracker.status(), AuthorizationStatus::Denied);

        tokio_test::block_on(tracker.observe_status(AuthorizationStatus::Authorized));

        assert_eq!(tracker.status(), AuthorizationStatus::Authorized);
        assert!(tracker.current_location().is_some());
    }
}
