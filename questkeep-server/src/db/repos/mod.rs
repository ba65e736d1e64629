//! Repository traits and their PostgreSQL implementations
//!
//! Each repository call is one statement against one row:
//! - `get` returns `None` for a missing key
//! - `create` relies on the primary key / unique constraints
//! - `update` writes only the columns present in the patch, keyed by primary key

pub mod avatars;
pub mod items;
pub mod quests;
pub mod users;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::keys::StoredKey;
use crate::models::Entity;

pub use avatars::PgAvatarRepo;
pub use items::PgItemRepo;
pub use quests::PgQuestRepo;
pub use users::PgUserRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// No row matched the key of an update.
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} violates unique constraint {}", .constraint.as_deref().unwrap_or("(unnamed)"))]
    UniqueViolation {
        resource: &'static str,
        constraint: Option<String>,
    },

    #[error("{resource} violates foreign key {}", .constraint.as_deref().unwrap_or("(unnamed)"))]
    ForeignKeyViolation {
        resource: &'static str,
        constraint: Option<String>,
    },
}

impl DbError {
    /// Classify constraint violations; everything else stays a driver error.
    pub fn from_sqlx(resource: &'static str, err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().map(str::to_owned);
            if db_err.is_unique_violation() {
                return Self::UniqueViolation {
                    resource,
                    constraint,
                };
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKeyViolation {
                    resource,
                    constraint,
                };
            }
        }
        Self::Sqlx(err)
    }
}

/// Single-row data access for one entity type.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Look up by primary key.
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DbError>;

    /// Insert and return the stored row, including generated fields.
    async fn create(&self, new: E::New) -> Result<E, DbError>;

    /// Write the fields present in `patch` to the row for `key` and return
    /// the stored row. Columns the patch omits keep their current value.
    ///
    /// A missing row is `DbError::NotFound`.
    async fn update(&self, key: &E::Key, patch: E::Patch) -> Result<E, DbError>;

    /// Remove the row for `existing`.
    async fn delete(&self, existing: &E) -> Result<(), DbError>;
}

/// Repositories that also support a full scan.
#[async_trait]
pub trait ListRepository<E: Entity>: Repository<E> {
    /// All rows, oldest first.
    async fn list(&self) -> Result<Vec<E>, DbError>;
}

/// Read a key column as stored, without re-validating it.
pub(crate) fn key_column<K: StoredKey>(row: &PgRow, column: &str) -> Result<K, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Ok(K::from_stored(raw))
}

/// Read a nullable key column as stored.
pub(crate) fn optional_key_column<K: StoredKey>(
    row: &PgRow,
    column: &str,
) -> Result<Option<K>, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    Ok(raw.map(K::from_stored))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_sqlx() {
        let err = DbError::from_sqlx("user", sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn violation_display_names_constraint() {
        let err = DbError::UniqueViolation {
            resource: "user",
            constraint: Some("users_email_key".into()),
        };
        assert_eq!(err.to_string(), "user violates unique constraint users_email_key");
    }
}
