//! Avatar endpoints

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
use crate::http::extractors::{ValidJson, ValidWallet};
use crate::http::server::AppState;
use crate::models::{Avatar, AvatarPatch, NewAvatar};

/// Avatar response
#[derive(Serialize)]
pub struct AvatarResponse {
    pub wallet_address: String,
    pub equipped_items: Vec<String>,
    pub cosmetic_details: Map<String, JsonValue>,
    pub preferences: Map<String, JsonValue>,
    pub updated_at: Option<String>,
}

impl From<Avatar> for AvatarResponse {
    fn from(a: Avatar) -> Self {
        Self {
            wallet_address: a.wallet_address.into_string(),
            equipped_items: a.equipped_items,
            cosmetic_details: a.cosmetic_details,
            preferences: a.preferences,
            updated_at: rfc3339(a.updated_at),
        }
    }
}

/// POST /avatars
async fn create_avatar(
    State(state): State<Arc<AppState>>,
    ValidJson(new): ValidJson<NewAvatar>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let avatar = state.avatars.create(new).await?;
    Ok(Json(AvatarResponse::from(avatar)))
}

/// GET /avatars/{wallet_address}
async fn get_avatar(
    State(state): State<Arc<AppState>>,
    ValidWallet(wallet): ValidWallet,
) -> Result<Json<AvatarResponse>, ApiError> {
    let avatar = state
        .avatars
        .get(&wallet)
        .await?
        .ok_or_else(|| ApiError::not_found::<Avatar>(&wallet))?;
    Ok(Json(AvatarResponse::from(avatar)))
}

/// PUT /avatars/{wallet_address}
async fn update_avatar(
    State(state): State<Arc<AppState>>,
    ValidWallet(wallet): ValidWallet,
    ValidJson(patch): ValidJson<AvatarPatch>,
) -> Result<Json<AvatarResponse>, ApiError> {
    let avatar = state
        .avatars
        .update(&wallet, patch)
        .await?
        .ok_or_else(|| ApiError::not_found::<Avatar>(&wallet))?;
    Ok(Json(AvatarResponse::from(avatar)))
}

/// DELETE /avatars/{wallet_address}
async fn delete_avatar(
    State(state): State<Arc<AppState>>,
    ValidWallet(wallet): ValidWallet,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.avatars.delete(&wallet).await? {
        return Err(ApiError::not_found::<Avatar>(&wallet));
    }
    Ok(Json(DeleteResponse::deleted::<Avatar>()))
}

/// Avatar routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/avatars", post(create_avatar))
        .route(
            "/avatars/{wallet_address}",
            get(get_avatar).put(update_avatar).delete(delete_avatar),
        )
}
