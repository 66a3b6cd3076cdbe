//! FoodMate Core - matching engine for the FoodMate restaurant meetup app
//!
//! This library provides the proximity matcher, the location availability
//! state machine, the match session protocol, and the stubbed services the
//! app runs against until a real backend exists.

pub mod config;
pub mod core;
pub mod location;
pub mod models;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use core::{find_nearby, haversine_distance, sort_by_distance};
pub use models::{GeoPoint, Locatable, Restaurant, User};
pub use session::{MatchSession, MatchStatus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let distance = haversine_distance(31.2304, 121.4737, 31.2304, 121.4737);
        assert_eq!(distance, 0.0);
    }
}
