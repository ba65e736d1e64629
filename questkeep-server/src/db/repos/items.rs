//! Item repository

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::models::{Entity, Item, ItemId, ItemPatch, NewItem, WalletAddress};
use super::{key_column, optional_key_column, DbError, Repository};

impl<'r> FromRow<'r, PgRow> for Item {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(attributes): Json<Map<String, JsonValue>> = row.try_get("attributes")?;

        Ok(Self {
            item_id: key_column(row, "item_id")?,
            owner_wallet: optional_key_column(row, "owner_wallet")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            attributes,
            image_url: row.try_get("image_url")?,
            metadata_uri: row.try_get("metadata_uri")?,
            image_data: row.try_get("image_data")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Item repository
#[derive(Clone)]
pub struct PgItemRepo {
    pool: PgPool,
}

impl PgItemRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Item> for PgItemRepo {
    async fn get(&self, key: &ItemId) -> Result<Option<Item>, DbError> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT item_id, owner_wallet, name, description, attributes,
                   image_url, metadata_uri, image_data, created_at, updated_at
            FROM items
            WHERE item_id = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    async fn create(&self, new: NewItem) -> Result<Item, DbError> {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (item_id, owner_wallet, name, description, attributes,
                               image_url, metadata_uri, image_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING item_id, owner_wallet, name, description, attributes,
                      image_url, metadata_uri, image_data, created_at, updated_at
            "#,
        )
        .bind(new.item_id.as_str())
        .bind(new.owner_wallet.as_str())
        .bind(&new.name)
        .bind(&new.description)
        .bind(Json(&new.attributes))
        .bind(&new.image_url)
        .bind(&new.metadata_uri)
        .bind(&new.image_data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_sqlx(Item::RESOURCE, e))
    }

    async fn update(&self, key: &ItemId, patch: ItemPatch) -> Result<Item, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE items SET ");
        let mut set = qb.separated(", ");
        if let Some(owner_wallet) = patch.owner_wallet {
            set.push("owner_wallet = ")
                .push_bind_unseparated(owner_wallet.map(WalletAddress::into_string));
        }
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = patch.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(attributes) = patch.attributes {
            set.push("attributes = ").push_bind_unseparated(Json(attributes));
        }
        if let Some(image_url) = patch.image_url {
            set.push("image_url = ").push_bind_unseparated(image_url);
        }
        if let Some(metadata_uri) = patch.metadata_uri {
            set.push("metadata_uri = ").push_bind_unseparated(metadata_uri);
        }
        if let Some(image_data) = patch.image_data {
            set.push("image_data = ").push_bind_unseparated(image_data);
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE item_id = ").push_bind(key.as_str()).push(
            " RETURNING item_id, owner_wallet, name, description, attributes, \
             image_url, metadata_uri, image_data, created_at, updated_at",
        );

        qb.build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(Item::RESOURCE, e))?
            .ok_or_else(|| DbError::NotFound {
                resource: Item::RESOURCE,
                id: key.to_string(),
            })
    }

    async fn delete(&self, existing: &Item) -> Result<(), DbError> {
        sqlx::query("DELETE FROM items WHERE item_id = $1")
            .bind(existing.item_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
