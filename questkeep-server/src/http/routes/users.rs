//! User endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::{rfc3339, DeleteResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidWallet};
use crate::http::server::AppState;
use crate::models::{NewUser, User, UserPatch};

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub wallet_address: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_image: Option<String>,
    pub experience_points: i32,
    pub level: i32,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            wallet_address: u.wallet_address.into_string(),
            username: u.username,
            email: u.email,
            avatar_image: u.avatar_image,
            experience_points: u.experience_points,
            level: u.level,
            created_at: u.created_at.to_rfc3339(),
            updated_at: rfc3339(u.updated_at),
        }
    }
}

/// POST /users - register a wallet
async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(new): ValidJson<NewUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.create(new).await?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /users - every user, oldest first
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{wallet_address}
async fn get_user(
    State(state): State<Arc<AppState>>,
    ValidWallet(wallet): ValidWallet,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get(&wallet)
        .await?
        .ok_or_else(|| ApiError::not_found::<User>(&wallet))?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/{wallet_address} - partial update
async fn update_user(
    State(state): State<Arc<AppState>>,
    ValidWallet(wallet): ValidWallet,
    ValidJson(patch): ValidJson<UserPatch>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .update(&wallet, patch)
        .await?
        .ok_or_else(|| ApiError::not_found::<User>(&wallet))?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/{wallet_address}
async fn delete_user(
    State(state): State<Arc<AppState>>,
    ValidWallet(wallet): ValidWallet,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.users.delete(&wallet).await? {
        return Err(ApiError::not_found::<User>(&wallet));
    }
    Ok(Json(DeleteResponse::deleted::<User>()))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{wallet_address}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
