use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. The password hash never leaves the db crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A short post authored by a user (its "twixester").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Twix {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub twixester_id: Uuid,
}

/// Sidebar entry in the twixes layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwixListItem {
    pub id: Uuid,
    pub title: String,
}

/// A twix joined with its author's username, as needed by the RSS feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedTwix {
    pub twix: Twix,
    pub twixester_username: String,
}
