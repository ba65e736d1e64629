//! Avatar repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::models::avatar::Details;
use crate::models::{Avatar, AvatarPatch, Entity, NewAvatar, WalletAddress};
use super::{key_column, DbError, Repository};

impl<'r> FromRow<'r, PgRow> for Avatar {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(equipped_items): Json<Vec<String>> = row.try_get("equipped_items")?;
        let Json(cosmetic_details): Json<Details> = row.try_get("cosmetic_details")?;
        let Json(preferences): Json<Details> = row.try_get("preferences")?;

        Ok(Self {
            wallet_address: key_column(row, "wallet_address")?,
            equipped_items,
            cosmetic_details,
            preferences,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Avatar repository
#[derive(Clone)]
pub struct PgAvatarRepo {
    pool: PgPool,
}

impl PgAvatarRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Avatar> for PgAvatarRepo {
    async fn get(&self, key: &WalletAddress) -> Result<Option<Avatar>, DbError> {
        let avatar = sqlx::query_as::<_, Avatar>(
            r#"
            SELECT wallet_address, equipped_items, cosmetic_details, preferences, updated_at
            FROM avatars
            WHERE wallet_address = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(avatar)
    }

    /// Insert an avatar; the wallet must belong to an existing user.
    async fn create(&self, new: NewAvatar) -> Result<Avatar, DbError> {
        sqlx::query_as::<_, Avatar>(
            r#"
            INSERT INTO avatars (wallet_address, equipped_items, cosmetic_details, preferences)
            VALUES ($1, $2, $3, $4)
            RETURNING wallet_address, equipped_items, cosmetic_details, preferences, updated_at
            "#,
        )
        .bind(new.wallet_address.as_str())
        .bind(Json(&new.equipped_items))
        .bind(Json(&new.cosmetic_details))
        .bind(Json(&new.preferences))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_sqlx(Avatar::RESOURCE, e))
    }

    async fn update(&self, key: &WalletAddress, patch: AvatarPatch) -> Result<Avatar, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE avatars SET ");
        let mut set = qb.separated(", ");
        if let Some(equipped_items) = patch.equipped_items {
            set.push("equipped_items = ")
                .push_bind_unseparated(Json(equipped_items));
        }
        if let Some(cosmetic_details) = patch.cosmetic_details {
            set.push("cosmetic_details = ")
                .push_bind_unseparated(Json(cosmetic_details));
        }
        if let Some(preferences) = patch.preferences {
            set.push("preferences = ").push_bind_unseparated(Json(preferences));
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE wallet_address = ")
            .push_bind(key.as_str())
            .push(" RETURNING wallet_address, equipped_items, cosmetic_details, preferences, updated_at");

        qb.build_query_as::<Avatar>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(Avatar::RESOURCE, e))?
            .ok_or_else(|| DbError::NotFound {
                resource: Avatar::RESOURCE,
                id: key.to_string(),
            })
    }

    async fn delete(&self, existing: &Avatar) -> Result<(), DbError> {
        sqlx::query("DELETE FROM avatars WHERE wallet_address = $1")
            .bind(existing.wallet_address.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
