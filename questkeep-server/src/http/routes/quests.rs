//! Quest endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::{rfc3339, DeleteResponse};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidUuid};
use crate::http::server::AppState;
use crate::models::{NewQuest, Quest, QuestPatch, QuestStatus, Rewards, TimeWindow};

/// Quest response
#[derive(Serialize)]
pub struct QuestResponse {
    pub quest_id: String,
    pub creator_wallet: String,
    pub participant_wallet: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub time_window: TimeWindow,
    pub rewards: Rewards,
    pub status: QuestStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Quest> for QuestResponse {
    fn from(q: Quest) -> Self {
        Self {
            quest_id: q.quest_id.to_string(),
            creator_wallet: q.creator_wallet.into_string(),
            participant_wallet: q.participant_wallet.map(|w| w.into_string()),
            title: q.title,
            description: q.description,
            location: q.location,
            longitude: q.longitude,
            latitude: q.latitude,
            time_window: q.time_window,
            rewards: q.rewards,
            status: q.status,
            created_at: q.created_at.to_rfc3339(),
            updated_at: rfc3339(q.updated_at),
        }
    }
}

/// POST /quests - status defaults to `available`
async fn create_quest(
    State(state): State<Arc<AppState>>,
    ValidJson(new): ValidJson<NewQuest>,
) -> Result<Json<QuestResponse>, ApiError> {
    let quest = state.quests.create(new).await?;
    Ok(Json(QuestResponse::from(quest)))
}

/// GET /quests
async fn list_quests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuestResponse>>, ApiError> {
    let quests = state.quests.list().await?;
    Ok(Json(quests.into_iter().map(QuestResponse::from).collect()))
}

/// GET /quests/{quest_id}
async fn get_quest(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<QuestResponse>, ApiError> {
    let quest = state
        .quests
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found::<Quest>(&id))?;
    Ok(Json(QuestResponse::from(quest)))
}

/// PUT /quests/{quest_id} - any status may be written
async fn update_quest(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(patch): ValidJson<QuestPatch>,
) -> Result<Json<QuestResponse>, ApiError> {
    let quest = state
        .quests
        .update(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found::<Quest>(&id))?;
    Ok(Json(QuestResponse::from(quest)))
}

/// DELETE /quests/{quest_id}
async fn delete_quest(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<DeleteResponse>, ApiError> {
    if !state.quests.delete(&id).await? {
        return Err(ApiError::not_found::<Quest>(&id));
    }
    Ok(Json(DeleteResponse::deleted::<Quest>()))
}

/// Quest routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quests", get(list_quests).post(create_quest))
        .route(
            "/quests/{quest_id}",
            get(get_quest).put(update_quest).delete(delete_quest),
        )
}
