//! Quests created by one user and optionally taken up by another

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::patch::{nullable, set};
use super::{Entity, WalletAddress};

/// Quest lifecycle status.
///
/// Any status may be written by an update; no transition order is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "quest_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    #[default]
    Available,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl QuestStatus {
    pub const ALL: [QuestStatus; 5] = [
        Self::Available,
        Self::Accepted,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the quest can be attempted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// What completing the quest pays out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rewards {
    pub experience_points: i32,
    /// Item ids granted on completion
    pub items: Vec<String>,
}

/// Persisted quest record
#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    pub quest_id: Uuid,
    pub creator_wallet: WalletAddress,
    pub participant_wallet: Option<WalletAddress>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub time_window: TimeWindow,
    pub rewards: Rewards,
    pub status: QuestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create payload: `POST /quests`
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuest {
    pub creator_wallet: WalletAddress,
    #[serde(default)]
    pub participant_wallet: Option<WalletAddress>,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    pub time_window: TimeWindow,
    pub rewards: Rewards,
    #[serde(default)]
    pub status: QuestStatus,
}

/// Partial update: `PUT /quests/{quest_id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuestPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub participant_wallet: Option<Option<WalletAddress>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub rewards: Option<Rewards>,
    #[serde(default)]
    pub status: Option<QuestStatus>,
}

impl Entity for Quest {
    type Key = Uuid;
    type New = NewQuest;
    type Patch = QuestPatch;

    const RESOURCE: &'static str = "quest";
    const LABEL: &'static str = "Quest";

    fn key(&self) -> &Uuid {
        &self.quest_id
    }

    fn requested_key(_new: &NewQuest) -> Option<&Uuid> {
        None
    }

    fn apply(&mut self, patch: QuestPatch) {
        set(&mut self.participant_wallet, patch.participant_wallet);
        set(&mut self.title, patch.title);
        set(&mut self.description, patch.description);
        set(&mut self.location, patch.location);
        set(&mut self.longitude, patch.longitude);
        set(&mut self.latitude, patch.latitude);
        set(&mut self.time_window, patch.time_window);
        set(&mut self.rewards, patch.rewards);
        set(&mut self.status, patch.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dragon() -> NewQuest {
        serde_json::from_value(json!({
            "creator_wallet": "0xabc",
            "title": "Defeat the Dragon",
            "description": "Slay the dragon terrorizing the village.",
            "location": "Dragon's Lair",
            "time_window": {
                "start_time": "2023-01-20T08:00:00Z",
                "end_time": "2023-01-20T18:00:00Z"
            },
            "rewards": {"experience_points": 1000, "items": ["dragon_scale_armor"]}
        }))
        .unwrap()
    }

    fn quest_from(new: NewQuest) -> Quest {
        Quest {
            quest_id: Uuid::new_v4(),
            creator_wallet: new.creator_wallet,
            participant_wallet: new.participant_wallet,
            title: new.title,
            description: new.description,
            location: new.location,
            longitude: new.longitude,
            latitude: new.latitude,
            time_window: new.time_window,
            rewards: new.rewards,
            status: new.status,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn status_defaults_to_available() {
        assert_eq!(dragon().status, QuestStatus::Available);
    }

    #[test]
    fn status_wire_names() {
        for status in QuestStatus::ALL {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, json!(status.as_str()));
        }
        let parsed: QuestStatus = serde_json::from_value(json!("in_progress")).unwrap();
        assert_eq!(parsed, QuestStatus::InProgress);
        assert!(serde_json::from_value::<QuestStatus>(json!("abandoned")).is_err());
    }

    #[test]
    fn any_status_can_be_written() {
        let mut quest = quest_from(dragon());
        quest.apply(QuestPatch {
            status: Some(QuestStatus::Completed),
            ..QuestPatch::default()
        });
        quest.apply(QuestPatch {
            status: Some(QuestStatus::Accepted),
            ..QuestPatch::default()
        });
        assert_eq!(quest.status, QuestStatus::Accepted);
    }

    #[test]
    fn patch_assigns_participant_and_keeps_rest() {
        let mut quest = quest_from(dragon());
        let before = quest.clone();

        let patch: QuestPatch = serde_json::from_value(json!({
            "participant_wallet": "0xdef",
            "longitude": 13.4
        }))
        .unwrap();
        quest.apply(patch);

        assert_eq!(quest.participant_wallet.as_ref().map(|w| w.as_str()), Some("0xdef"));
        assert_eq!(quest.longitude, Some(13.4));
        assert_eq!(quest.latitude, None);
        assert_eq!(quest.title, before.title);
        assert_eq!(quest.time_window, before.time_window);
        assert_eq!(quest.status, before.status);
    }
}
