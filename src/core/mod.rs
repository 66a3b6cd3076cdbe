// Core algorithm exports
pub mod distance;
pub mod proximity;

pub use distance::{distance_between, haversine_distance};
pub use proximity::{find_nearby, sort_by_distance};
