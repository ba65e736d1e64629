//! Generic entity service

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::Span;

use super::ServiceError;
use crate::db::repos::{DbError, ListRepository, Repository};
use crate::models::Entity;

/// Existence checks on top of a repository.
///
/// Events are recorded under the span handed in at construction, so callers
/// decide how a service's logs are labelled.
pub struct EntityService<E: Entity, R: ?Sized = dyn Repository<E>> {
    repo: Arc<R>,
    span: Span,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: ?Sized> Clone for EntityService<E, R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            span: self.span.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    pub fn new(repo: Arc<R>, span: Span) -> Self {
        Self {
            repo,
            span,
            _entity: PhantomData,
        }
    }

    pub async fn get(&self, key: &E::Key) -> Result<Option<E>, ServiceError> {
        Ok(self.repo.get(key).await?)
    }

    /// Insert a new row, rejecting caller-chosen keys that are already taken.
    ///
    /// The lookup only improves the error; a concurrent insert that wins the
    /// race is still caught by the store's unique constraint.
    pub async fn create(&self, new: E::New) -> Result<E, ServiceError> {
        let requested = E::requested_key(&new).cloned();

        if let Some(key) = &requested {
            if self.repo.get(key).await?.is_some() {
                tracing::warn!(parent: &self.span, resource = E::RESOURCE, %key, "rejected duplicate create");
                return Err(ServiceError::AlreadyExists {
                    resource: E::RESOURCE,
                    key: key.to_string(),
                });
            }
        }

        let created = self
            .repo
            .create(new)
            .await
            .map_err(|e| ServiceError::from_store(e, requested.as_ref().map(ToString::to_string)))?;

        tracing::info!(parent: &self.span, resource = E::RESOURCE, key = %created.key(), "created");
        Ok(created)
    }

    /// Apply a partial update; `None` when no row has `key`.
    ///
    /// Only the fields present in `patch` are written, so concurrent updates
    /// of different fields do not undo each other.
    pub async fn update(&self, key: &E::Key, patch: E::Patch) -> Result<Option<E>, ServiceError> {
        match self.repo.update(key, patch).await {
            Ok(updated) => {
                tracing::info!(parent: &self.span, resource = E::RESOURCE, %key, "updated");
                Ok(Some(updated))
            }
            Err(DbError::NotFound { .. }) => Ok(None),
            Err(e) => Err(ServiceError::from_store(e, Some(key.to_string()))),
        }
    }

    /// Remove the row for `key`; `false` when there was none.
    pub async fn delete(&self, key: &E::Key) -> Result<bool, ServiceError> {
        let Some(existing) = self.repo.get(key).await? else {
            return Ok(false);
        };

        self.repo.delete(&existing).await?;
        tracing::info!(parent: &self.span, resource = E::RESOURCE, %key, "deleted");
        Ok(true)
    }
}

impl<E, R> EntityService<E, R>
where
    E: Entity,
    R: ListRepository<E> + ?Sized,
{
    pub async fn list(&self) -> Result<Vec<E>, ServiceError> {
        Ok(self.repo.list().await?)
    }
}
