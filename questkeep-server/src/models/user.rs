//! User profiles keyed by wallet address

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::patch::{nullable, set};
use super::{Entity, WalletAddress};

/// Starting experience for a new user
pub const DEFAULT_EXPERIENCE_POINTS: i32 = 0;

/// Starting level for a new user
pub const DEFAULT_LEVEL: i32 = 1;

/// Persisted user record
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub wallet_address: WalletAddress,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_image: Option<String>,
    pub experience_points: i32,
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create payload: `POST /users`
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub wallet_address: WalletAddress,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_image: Option<String>,
}

/// Partial update: `PUT /users/{wallet_address}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub avatar_image: Option<Option<String>>,
    #[serde(default)]
    pub experience_points: Option<i32>,
    #[serde(default)]
    pub level: Option<i32>,
}

impl Entity for User {
    type Key = WalletAddress;
    type New = NewUser;
    type Patch = UserPatch;

    const RESOURCE: &'static str = "user";
    const LABEL: &'static str = "User";

    fn key(&self) -> &WalletAddress {
        &self.wallet_address
    }

    fn requested_key(new: &NewUser) -> Option<&WalletAddress> {
        Some(&new.wallet_address)
    }

    fn apply(&mut self, patch: UserPatch) {
        set(&mut self.username, patch.username);
        set(&mut self.email, patch.email);
        set(&mut self.avatar_image, patch.avatar_image);
        set(&mut self.experience_points, patch.experience_points);
        set(&mut self.level, patch.level);
    }
}
