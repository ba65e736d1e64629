//! Service layer
//!
//! One generic service wraps each repository with the existence checks the
//! routes rely on: duplicate keys are rejected before insert, and missing
//! rows turn into `None` / `false` instead of errors.

mod entity;

pub use entity::EntityService;

use crate::db::repos::{DbError, ListRepository};
use crate::models::{Avatar, Item, Quest, User};

pub type UserService = EntityService<User, dyn ListRepository<User>>;
pub type AvatarService = EntityService<Avatar>;
pub type ItemService = EntityService<Item>;
pub type QuestService = EntityService<Quest, dyn ListRepository<Quest>>;

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A row with the requested primary key is already stored.
    #[error("{resource} '{key}' already exists")]
    AlreadyExists { resource: &'static str, key: String },

    /// A secondary unique column (such as a user's email) is taken.
    #[error("{resource} conflicts with an existing row on {constraint}")]
    Duplicate {
        resource: &'static str,
        constraint: String,
    },

    /// A foreign key is missing, or still points at the row being deleted.
    #[error("{resource} has an unsatisfied reference ({constraint})")]
    Reference {
        resource: &'static str,
        constraint: String,
    },

    #[error(transparent)]
    Store(DbError),
}

impl ServiceError {
    /// Classify a store error; `key` is reported for primary-key collisions.
    pub(crate) fn from_store(err: DbError, key: Option<String>) -> Self {
        match err {
            DbError::UniqueViolation {
                resource,
                constraint,
            } => match (constraint, key) {
                (Some(c), _) if !c.ends_with("_pkey") => Self::Duplicate {
                    resource,
                    constraint: c,
                },
                (_, Some(key)) => Self::AlreadyExists { resource, key },
                (constraint, None) => Self::Duplicate {
                    resource,
                    constraint: constraint.unwrap_or_else(|| "(unnamed)".into()),
                },
            },
            DbError::ForeignKeyViolation {
                resource,
                constraint,
            } => Self::Reference {
                resource,
                constraint: constraint.unwrap_or_else(|| "(unnamed)".into()),
            },
            other => Self::Store(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        Self::from_store(err, None)
    }
}
