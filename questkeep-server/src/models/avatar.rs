//! Avatars: one per user, sharing the user's wallet address as key

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::patch::set;
use super::{Entity, WalletAddress};

/// Free-form key-value details (cosmetics, preferences)
pub type Details = Map<String, JsonValue>;

/// Persisted avatar record
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub wallet_address: WalletAddress,
    /// Item ids in equip order
    pub equipped_items: Vec<String>,
    pub cosmetic_details: Details,
    pub preferences: Details,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create payload: `POST /avatars`
#[derive(Debug, Clone, Deserialize)]
pub struct NewAvatar {
    pub wallet_address: WalletAddress,
    pub equipped_items: Vec<String>,
    pub cosmetic_details: Details,
    pub preferences: Details,
}

/// Partial update: `PUT /avatars/{wallet_address}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AvatarPatch {
    #[serde(default)]
    pub equipped_items: Option<Vec<String>>,
    #[serde(default)]
    pub cosmetic_details: Option<Details>,
    #[serde(default)]
    pub preferences: Option<Details>,
}

impl Entity for Avatar {
    type Key = WalletAddress;
    type New = NewAvatar;
    type Patch = AvatarPatch;

    const RESOURCE: &'static str = "avatar";
    const LABEL: &'static str = "Avatar";

    fn key(&self) -> &WalletAddress {
        &self.wallet_address
    }

    fn requested_key(new: &NewAvatar) -> Option<&WalletAddress> {
        Some(&new.wallet_address)
    }

    fn apply(&mut self, patch: AvatarPatch) {
        set(&mut self.equipped_items, patch.equipped_items);
        set(&mut self.cosmetic_details, patch.cosmetic_details);
        set(&mut self.preferences, patch.preferences);
    }
}
