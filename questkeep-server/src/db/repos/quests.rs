//! Quest repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::{Entity, NewQuest, Quest, QuestPatch, Rewards, TimeWindow, WalletAddress};
use super::{key_column, optional_key_column, DbError, ListRepository, Repository};

impl<'r> FromRow<'r, PgRow> for Quest {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(time_window): Json<TimeWindow> = row.try_get("time_window")?;
        let Json(rewards): Json<Rewards> = row.try_get("rewards")?;

        Ok(Self {
            quest_id: row.try_get("quest_id")?,
            creator_wallet: key_column(row, "creator_wallet")?,
            participant_wallet: optional_key_column(row, "participant_wallet")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            location: row.try_get("location")?,
            longitude: row.try_get("longitude")?,
            latitude: row.try_get("latitude")?,
            time_window,
            rewards,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Quest repository
#[derive(Clone)]
pub struct PgQuestRepo {
    pool: PgPool,
}

impl PgQuestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Quest> for PgQuestRepo {
    async fn get(&self, key: &Uuid) -> Result<Option<Quest>, DbError> {
        let quest = sqlx::query_as::<_, Quest>(
            r#"
            SELECT quest_id, creator_wallet, participant_wallet, title, description,
                   location, longitude, latitude, time_window, rewards, status,
                   created_at, updated_at
            FROM quests
            WHERE quest_id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quest)
    }

    /// Insert a quest under a freshly generated id.
    async fn create(&self, new: NewQuest) -> Result<Quest, DbError> {
        sqlx::query_as::<_, Quest>(
            r#"
            INSERT INTO quests (quest_id, creator_wallet, participant_wallet, title,
                                description, location, longitude, latitude,
                                time_window, rewards, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING quest_id, creator_wallet, participant_wallet, title, description,
                      location, longitude, latitude, time_window, rewards, status,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.creator_wallet.as_str())
        .bind(new.participant_wallet.as_ref().map(|w| w.as_str()))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.location)
        .bind(new.longitude)
        .bind(new.latitude)
        .bind(Json(&new.time_window))
        .bind(Json(&new.rewards))
        .bind(new.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_sqlx(Quest::RESOURCE, e))
    }

    async fn update(&self, key: &Uuid, patch: QuestPatch) -> Result<Quest, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE quests SET ");
        let mut set = qb.separated(", ");
        if let Some(participant_wallet) = patch.participant_wallet {
            set.push("participant_wallet = ")
                .push_bind_unseparated(participant_wallet.map(WalletAddress::into_string));
        }
        if let Some(title) = patch.title {
            set.push("title = ").push_bind_unseparated(title);
        }
        if let Some(description) = patch.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(location) = patch.location {
            set.push("location = ").push_bind_unseparated(location);
        }
        if let Some(longitude) = patch.longitude {
            set.push("longitude = ").push_bind_unseparated(longitude);
        }
        if let Some(latitude) = patch.latitude {
            set.push("latitude = ").push_bind_unseparated(latitude);
        }
        if let Some(time_window) = patch.time_window {
            set.push("time_window = ").push_bind_unseparated(Json(time_window));
        }
        if let Some(rewards) = patch.rewards {
            set.push("rewards = ").push_bind_unseparated(Json(rewards));
        }
        if let Some(status) = patch.status {
            set.push("status = ").push_bind_unseparated(status);
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE quest_id = ").push_bind(*key).push(
            " RETURNING quest_id, creator_wallet, participant_wallet, title, description, \
             location, longitude, latitude, time_window, rewards, status, \
             created_at, updated_at",
        );

        qb.build_query_as::<Quest>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(Quest::RESOURCE, e))?
            .ok_or_else(|| DbError::NotFound {
                resource: Quest::RESOURCE,
                id: key.to_string(),
            })
    }

    async fn delete(&self, existing: &Quest) -> Result<(), DbError> {
        sqlx::query("DELETE FROM quests WHERE quest_id = $1")
            .bind(existing.quest_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ListRepository<Quest> for PgQuestRepo {
    async fn list(&self) -> Result<Vec<Quest>, DbError> {
        let quests = sqlx::query_as::<_, Quest>(
            r#"
            SELECT quest_id, creator_wallet, participant_wallet, title, description,
                   location, longitude, latitude, time_window, rewards, status,
                   created_at, updated_at
            FROM quests
            ORDER BY created_at, quest_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quests)
    }
}
