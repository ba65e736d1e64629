//! User repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Row};

use crate::models::{Entity, NewUser, User, UserPatch, WalletAddress};
use super::{key_column, DbError, ListRepository, Repository};

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            wallet_address: key_column(row, "wallet_address")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            avatar_image: row.try_get("avatar_image")?,
            experience_points: row.try_get("experience_points")?,
            level: row.try_get("level")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// User repository
#[derive(Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<User> for PgUserRepo {
    async fn get(&self, key: &WalletAddress) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT wallet_address, username, email, avatar_image,
                   experience_points, level, created_at, updated_at
            FROM users
            WHERE wallet_address = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user; experience and level take their column defaults.
    async fn create(&self, new: NewUser) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (wallet_address, username, email, avatar_image)
            VALUES ($1, $2, $3, $4)
            RETURNING wallet_address, username, email, avatar_image,
                      experience_points, level, created_at, updated_at
            "#,
        )
        .bind(new.wallet_address.as_str())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.avatar_image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_sqlx(User::RESOURCE, e))
    }

    /// Only the fields present in `patch` are written.
    async fn update(&self, key: &WalletAddress, patch: UserPatch) -> Result<User, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut set = qb.separated(", ");
        if let Some(username) = patch.username {
            set.push("username = ").push_bind_unseparated(username);
        }
        if let Some(email) = patch.email {
            set.push("email = ").push_bind_unseparated(email);
        }
        if let Some(avatar_image) = patch.avatar_image {
            set.push("avatar_image = ").push_bind_unseparated(avatar_image);
        }
        if let Some(experience_points) = patch.experience_points {
            set.push("experience_points = ")
                .push_bind_unseparated(experience_points);
        }
        if let Some(level) = patch.level {
            set.push("level = ").push_bind_unseparated(level);
        }
        set.push("updated_at = NOW()");

        qb.push(" WHERE wallet_address = ")
            .push_bind(key.as_str())
            .push(
                " RETURNING wallet_address, username, email, avatar_image, \
                 experience_points, level, created_at, updated_at",
            );

        qb.build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(User::RESOURCE, e))?
            .ok_or_else(|| DbError::NotFound {
                resource: User::RESOURCE,
                id: key.to_string(),
            })
    }

    async fn delete(&self, existing: &User) -> Result<(), DbError> {
        sqlx::query("DELETE FROM users WHERE wallet_address = $1")
            .bind(existing.wallet_address.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from_sqlx(User::RESOURCE, e))?;
        Ok(())
    }
}

#[async_trait]
impl ListRepository<User> for PgUserRepo {
    async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT wallet_address, username, email, avatar_image,
                   experience_points, level, created_at, updated_at
            FROM users
            ORDER BY created_at, wallet_address
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
