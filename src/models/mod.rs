// Model exports
pub mod domain;

pub use domain::{
    Chat, Cuisine, Gender, GeoPoint, Locatable, Message, MessageType, Restaurant,
    RestaurantsDocument, User, UsersDocument,
};
