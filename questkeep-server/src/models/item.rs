//! Items, optionally owned by a user

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::patch::{base64_bytes, nullable, set};
use super::{Entity, ItemId, WalletAddress};

/// Persisted item record
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub item_id: ItemId,
    pub owner_wallet: Option<WalletAddress>,
    pub name: String,
    pub description: String,
    pub attributes: Map<String, JsonValue>,
    pub image_url: String,
    pub metadata_uri: String,
    pub image_data: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create payload: `POST /items`
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub item_id: ItemId,
    pub owner_wallet: WalletAddress,
    pub name: String,
    pub description: String,
    pub attributes: Map<String, JsonValue>,
    pub image_url: String,
    pub metadata_uri: String,
    /// Base64 on the wire
    #[serde(default, with = "base64_bytes")]
    pub image_data: Option<Vec<u8>>,
}

/// Partial update: `PUT /items/{item_id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub owner_wallet: Option<Option<WalletAddress>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Option<Map<String, JsonValue>>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub metadata_uri: Option<String>,
    #[serde(default, deserialize_with = "base64_bytes::deserialize_nullable")]
    pub image_data: Option<Option<Vec<u8>>>,
}

impl Entity for Item {
    type Key = ItemId;
    type New = NewItem;
    type Patch = ItemPatch;

    const RESOURCE: &'static str = "item";
    const LABEL: &'static str = "Item";

    fn key(&self) -> &ItemId {
        &self.item_id
    }

    fn requested_key(new: &NewItem) -> Option<&ItemId> {
        Some(&new.item_id)
    }

    fn apply(&mut self, patch: ItemPatch) {
        set(&mut self.owner_wallet, patch.owner_wallet);
        set(&mut self.name, patch.name);
        set(&mut self.description, patch.description);
        set(&mut self.attributes, patch.attributes);
        set(&mut self.image_url, patch.image_url);
        set(&mut self.metadata_uri, patch.metadata_uri);
        set(&mut self.image_data, patch.image_data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sword() -> NewItem {
        serde_json::from_value(json!({
            "item_id": "sword_of_truth",
            "owner_wallet": "0xabc",
            "name": "Sword of Truth",
            "description": "A legendary sword with immense power.",
            "attributes": {"damage": 100, "durability": 250},
            "image_url": "https://example.com/items/sword_of_truth.png",
            "metadata_uri": "https://metadata.example.com/items/sword_of_truth.json"
        }))
        .unwrap()
    }

    #[test]
    fn image_payload_is_optional() {
        let new = sword();
        assert_eq!(new.image_data, None);
        assert_eq!(new.attributes["damage"], 100);
    }

    #[test]
    fn patch_can_transfer_and_clear_image() {
        let new = sword();
        let mut item = Item {
            item_id: new.item_id,
            owner_wallet: Some(new.owner_wallet),
            name: new.name,
            description: new.description,
            attributes: new.attributes,
            image_url: new.image_url,
            metadata_uri: new.metadata_uri,
            image_data: Some(vec![1, 2, 3]),
            created_at: Utc::now(),
            updated_at: None,
        };

        let patch: ItemPatch = serde_json::from_value(json!({
            "owner_wallet": "0xdef",
            "image_data": null,
            "name": "Enhanced Sword of Truth"
        }))
        .unwrap();
        item.apply(patch);

        assert_eq!(item.owner_wallet.as_ref().map(|w| w.as_str()), Some("0xdef"));
        assert_eq!(item.image_data, None);
        assert_eq!(item.name, "Enhanced Sword of Truth");
        assert_eq!(item.description, "A legendary sword with immense power.");
    }
}
