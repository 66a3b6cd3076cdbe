use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in degrees.
///
/// Valid ranges are -90..90 latitude and -180..180 longitude; values are
/// taken as-is from the catalog files and not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Anything with a fixed coordinate that can be ranked by distance.
pub trait Locatable {
    fn coordinate(&self) -> GeoPoint;
}

/// Restaurant category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cuisine {
    FastFood,
    Japanese,
    Coffee,
    Chinese,
    Western,
}

impl Cuisine {
    /// Emoji shown by clients next to the restaurant name
    pub fn icon(&self) -> &'static str {
        match self {
            Cuisine::FastFood => "🍔",
            Cuisine::Japanese => "🍱",
            Cuisine::Coffee => "☕️",
            Cuisine::Chinese => "🥘",
            Cuisine::Western => "🍝",
        }
    }
}

/// Restaurant record with location and display metadata
///
/// Loaded wholesale from the bundled catalog and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub cuisine: Cuisine,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Rating in [0, 5]
    pub rating: f64,
    #[serde(rename = "priceLevel")]
    pub price_level: String,
    #[serde(rename = "openTime")]
    pub open_time: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
}

impl Locatable for Restaurant {
    fn coordinate(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Candidate user with location and preference tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: String,
    pub gender: Gender,
    pub avatar: String,
    /// Order is significant: tags are shown in the order the user picked them
    #[serde(default)]
    pub preferences: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Locatable for User {
    fn coordinate(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Location,
}

/// Chat message between two users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    #[serde(rename = "receiverId")]
    pub receiver_id: String,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "type")]
    pub message_type: MessageType,
}

/// One conversation: the matched users, the restaurant they agreed on,
/// and the latest message state for the chat list screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub users: Vec<User>,
    pub restaurant: Restaurant,
    #[serde(rename = "lastMessage", default)]
    pub last_message: Option<Message>,
    #[serde(rename = "unreadCount")]
    pub unread_count: u32,
    #[serde(rename = "matchTime")]
    pub match_time: chrono::DateTime<chrono::Utc>,
}

/// Top-level shape of the bundled restaurants.json
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantsDocument {
    pub restaurants: Vec<Restaurant>,
}

/// Top-level shape of the bundled users.json
#[derive(Debug, Clone, Deserialize)]
pub struct UsersDocument {
    pub users: Vec<User>,
}
