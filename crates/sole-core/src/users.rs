use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A locally registered account.
///
/// The password is only ever held as a salted hash; see `sole-store`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Hex-encoded SHA-256 of `salt || password`.
    pub password_hash: String,
    /// Hex-encoded random salt.
    pub password_salt: String,
    /// Liked `styleID`s in the order they were liked. Never contains duplicates.
    #[serde(default)]
    pub liked_style_ids: Vec<String>,
    #[serde(default)]
    pub shoe_size: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn has_liked(&self, style_id: &str) -> bool {
        self.liked_style_ids.iter().any(|id| id == style_id)
    }

    /// Public view of the account without credentials.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            liked_style_ids: self.liked_style_ids.clone(),
            shoe_size: self.shoe_size.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(rename = "likedStyleIDs")]
    pub liked_style_ids: Vec<String>,
    pub shoe_size: Option<String>,
    pub created_at: DateTime<Utc>,
}
