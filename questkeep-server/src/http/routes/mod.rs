//! Route handlers organized by resource

pub mod health;
pub mod users;
pub mod avatars;
pub mod items;
pub mod quests;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::Entity;

/// Body returned by every successful DELETE
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub detail: String,
}

impl DeleteResponse {
    pub fn deleted<E: Entity>() -> Self {
        Self {
            detail: format!("{} deleted successfully", E::LABEL),
        }
    }
}

fn rfc3339(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339())
}
