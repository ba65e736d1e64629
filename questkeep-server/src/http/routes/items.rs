//! Item endpoints
//!
//! `image_data` travels as standard base64 in both directions.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::{rfc3339, DeleteResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidItemId, ValidJson};
use crate::http::server::AppState;
use crate::models::patch::base64_bytes;
use crate::models::{Item, ItemPatch, NewItem};

/// Item response
#[derive(Serialize)]
pub struct ItemResponse {
    pub item_id: String,
    pub owner_wallet: Option<String>,
    pub name: String,
    pub description: String,
    pub attributes: Map<String, JsonValue>,
    pub image_url: String,
    pub metadata_uri: String,
    #[serde(serialize_with = "base64_bytes::serialize")]
    pub image_data: Option<Vec<u8>>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Item> for ItemResponse {
    fn from(i: Item) -> Self {
        Self {
            item_id: i.item_id.into_string(),
            owner_wallet: i.owner_wallet.map(|w| w.into_string()),
            name: i.name,
            description: i.description,
            attributes: i.attributes,
            image_url: i.image_url,
            metadata_uri: i.metadata_uri,
            image_data: i.image_data,
            created_at: i.created_at.to_rfc3339(),
            updated_at: rfc3339(i.updated_at),
        }
    }
}

/// POST /items
async fn create_item(
    State(state): State<Arc<AppState>>,
    ValidJson(new): ValidJson<NewItem>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.create(new).await?;
    Ok(Json(ItemResponse::from(item)))
}

/// GET /items/{item_id}
async fn get_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state
        .items
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found::<Item>(&id))?;
    Ok(Json(ItemResponse::from(item)))
}

/// PUT /items/{item_id}
async fn update_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
    ValidJson(patch): ValidJson<ItemPatch>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state
        .items
        .update(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found::<Item>(&id))?;
    Ok(Json(ItemResponse::from(item)))
}

/// DELETE /items/{item_id}
async fn delete_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.items.delete(&id).await? {
        return Err(ApiError::not_found::<Item>(&id));
    }
    Ok(Json(DeleteResponse::deleted::<Item>()))
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", post(create_item))
        .route(
            "/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}
