// Service exports
pub mod catalog;
pub mod chat;
pub mod delay;
pub mod matching;
pub mod restaurants;

pub use catalog::{Catalog, CatalogError};
pub use chat::ChatService;
pub use delay::{NoDelay, Sleeper, TokioSleeper};
pub use matching::{Decider, FixedDecider, MatchingError, MatchingService, RandomDecider};
pub use restaurants::RestaurantService;
