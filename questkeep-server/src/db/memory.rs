//! In-process store
//!
//! Mirrors the Postgres schema's constraints (primary keys, unique email,
//! foreign keys to `users`, no cascades) so the service and HTTP layers
//! behave the same against either backend. Rows are kept in insertion order.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Avatar, AvatarPatch, Entity, Item, ItemId, ItemPatch, NewAvatar, NewItem, NewQuest, NewUser,
    Quest, QuestPatch, User, UserPatch, WalletAddress,
};
use super::repos::{DbError, ListRepository, Repository};

/// Memory-backed implementation of every repository
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    avatars: Vec<Avatar>,
    items: Vec<Item>,
    quests: Vec<Quest>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn require_user(
        &self,
        wallet: &WalletAddress,
        resource: &'static str,
        constraint: &str,
    ) -> Result<(), DbError> {
        if find(&self.users, wallet).is_some() {
            Ok(())
        } else {
            Err(DbError::ForeignKeyViolation {
                resource,
                constraint: Some(constraint.to_owned()),
            })
        }
    }

    fn require_unique_email(&self, user: &User) -> Result<(), DbError> {
        let Some(email) = user.email.as_deref() else {
            return Ok(());
        };
        let taken = self
            .users
            .iter()
            .any(|u| u.wallet_address != user.wallet_address && u.email.as_deref() == Some(email));
        if taken {
            return Err(DbError::UniqueViolation {
                resource: User::RESOURCE,
                constraint: Some("users_email_key".into()),
            });
        }
        Ok(())
    }

    /// Name of the first foreign key still pointing at `wallet`.
    fn reference_to(&self, wallet: &WalletAddress) -> Option<&'static str> {
        if self.avatars.iter().any(|a| &a.wallet_address == wallet) {
            return Some("avatars_wallet_address_fkey");
        }
        if self.items.iter().any(|i| i.owner_wallet.as_ref() == Some(wallet)) {
            return Some("items_owner_wallet_fkey");
        }
        if self.quests.iter().any(|q| &q.creator_wallet == wallet) {
            return Some("quests_creator_wallet_fkey");
        }
        if self
            .quests
            .iter()
            .any(|q| q.participant_wallet.as_ref() == Some(wallet))
        {
            return Some("quests_participant_wallet_fkey");
        }
        None
    }
}

fn find<'a, E: Entity>(rows: &'a [E], key: &E::Key) -> Option<&'a E> {
    rows.iter().find(|row| row.key() == key)
}

fn ensure_absent<E: Entity>(rows: &[E], key: &E::Key, constraint: &str) -> Result<(), DbError> {
    match find(rows, key) {
        Some(_) => Err(DbError::UniqueViolation {
            resource: E::RESOURCE,
            constraint: Some(constraint.to_owned()),
        }),
        None => Ok(()),
    }
}

/// Current row for `key`, copied out so a patch can be checked before it lands.
fn current<E: Entity>(rows: &[E], key: &E::Key) -> Result<E, DbError> {
    find(rows, key).cloned().ok_or_else(|| DbError::NotFound {
        resource: E::RESOURCE,
        id: key.to_string(),
    })
}

/// Store `updated` over the row with the same key.
fn replace<E: Entity>(rows: &mut [E], updated: E) -> E {
    if let Some(slot) = rows.iter_mut().find(|row| row.key() == updated.key()) {
        *slot = updated.clone();
    }
    updated
}

fn remove<E: Entity>(rows: &mut Vec<E>, key: &E::Key) {
    rows.retain(|row| row.key() != key);
}

#[async_trait]
impl Repository<User> for MemoryStore {
    async fn get(&self, key: &WalletAddress) -> Result<Option<User>, DbError> {
        Ok(find(&self.tables.read().await.users, key).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        ensure_absent(&tables.users, &new.wallet_address, "users_pkey")?;

        let user = User {
            wallet_address: new.wallet_address,
            username: new.username,
            email: new.email,
            avatar_image: new.avatar_image,
            experience_points: crate::models::user::DEFAULT_EXPERIENCE_POINTS,
            level: crate::models::user::DEFAULT_LEVEL,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.require_unique_email(&user)?;
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, key: &WalletAddress, patch: UserPatch) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        let mut user = current(&tables.users, key)?;
        user.apply(patch);
        user.updated_at = Some(Utc::now());
        tables.require_unique_email(&user)?;
        Ok(replace(&mut tables.users, user))
    }

    async fn delete(&self, existing: &User) -> Result<(), DbError> {
        let mut tables = self.tables.write().await;
        if let Some(constraint) = tables.reference_to(&existing.wallet_address) {
            return Err(DbError::ForeignKeyViolation {
                resource: User::RESOURCE,
                constraint: Some(constraint.to_owned()),
            });
        }
        remove(&mut tables.users, &existing.wallet_address);
        Ok(())
    }
}

#[async_trait]
impl ListRepository<User> for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, DbError> {
        Ok(self.tables.read().await.users.clone())
    }
}

#[async_trait]
impl Repository<Avatar> for MemoryStore {
    async fn get(&self, key: &WalletAddress) -> Result<Option<Avatar>, DbError> {
        Ok(find(&self.tables.read().await.avatars, key).cloned())
    }

    async fn create(&self, new: NewAvatar) -> Result<Avatar, DbError> {
        let mut tables = self.tables.write().await;
        ensure_absent(&tables.avatars, &new.wallet_address, "avatars_pkey")?;
        tables.require_user(&new.wallet_address, Avatar::RESOURCE, "avatars_wallet_address_fkey")?;

        let avatar = Avatar {
            wallet_address: new.wallet_address,
            equipped_items: new.equipped_items,
            cosmetic_details: new.cosmetic_details,
            preferences: new.preferences,
            updated_at: None,
        };
        tables.avatars.push(avatar.clone());
        Ok(avatar)
    }

    async fn update(&self, key: &WalletAddress, patch: AvatarPatch) -> Result<Avatar, DbError> {
        let mut tables = self.tables.write().await;
        let mut avatar = current(&tables.avatars, key)?;
        avatar.apply(patch);
        avatar.updated_at = Some(Utc::now());
        Ok(replace(&mut tables.avatars, avatar))
    }

    async fn delete(&self, existing: &Avatar) -> Result<(), DbError> {
        remove(&mut self.tables.write().await.avatars, &existing.wallet_address);
        Ok(())
    }
}

#[async_trait]
impl Repository<Item> for MemoryStore {
    async fn get(&self, key: &ItemId) -> Result<Option<Item>, DbError> {
        Ok(find(&self.tables.read().await.items, key).cloned())
    }

    async fn create(&self, new: NewItem) -> Result<Item, DbError> {
        let mut tables = self.tables.write().await;
        ensure_absent(&tables.items, &new.item_id, "items_pkey")?;
        tables.require_user(&new.owner_wallet, Item::RESOURCE, "items_owner_wallet_fkey")?;

        let item = Item {
            item_id: new.item_id,
            owner_wallet: Some(new.owner_wallet),
            name: new.name,
            description: new.description,
            attributes: new.attributes,
            image_url: new.image_url,
            metadata_uri: new.metadata_uri,
            image_data: new.image_data,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, key: &ItemId, patch: ItemPatch) -> Result<Item, DbError> {
        let mut tables = self.tables.write().await;
        let mut item = current(&tables.items, key)?;
        item.apply(patch);
        if let Some(owner) = &item.owner_wallet {
            tables.require_user(owner, Item::RESOURCE, "items_owner_wallet_fkey")?;
        }
        item.updated_at = Some(Utc::now());
        Ok(replace(&mut tables.items, item))
    }

    async fn delete(&self, existing: &Item) -> Result<(), DbError> {
        remove(&mut self.tables.write().await.items, &existing.item_id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Quest> for MemoryStore {
    async fn get(&self, key: &Uuid) -> Result<Option<Quest>, DbError> {
        Ok(find(&self.tables.read().await.quests, key).cloned())
    }

    async fn create(&self, new: NewQuest) -> Result<Quest, DbError> {
        let mut tables = self.tables.write().await;
        tables.require_user(&new.creator_wallet, Quest::RESOURCE, "quests_creator_wallet_fkey")?;
        if let Some(participant) = &new.participant_wallet {
            tables.require_user(participant, Quest::RESOURCE, "quests_participant_wallet_fkey")?;
        }

        let quest = Quest {
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
        };
        tables.quests.push(quest.clone());
        Ok(quest)
    }

    async fn update(&self, key: &Uuid, patch: QuestPatch) -> Result<Quest, DbError> {
        let mut tables = self.tables.write().await;
        let mut quest = current(&tables.quests, key)?;
        quest.apply(patch);
        if let Some(participant) = &quest.participant_wallet {
            tables.require_user(participant, Quest::RESOURCE, "quests_participant_wallet_fkey")?;
        }
        quest.updated_at = Some(Utc::now());
        Ok(replace(&mut tables.quests, quest))
    }

    async fn delete(&self, existing: &Quest) -> Result<(), DbError> {
        remove(&mut self.tables.write().await.quests, &existing.quest_id);
        Ok(())
    }
}

#[async_trait]
impl ListRepository<Quest> for MemoryStore {
    async fn list(&self) -> Result<Vec<Quest>, DbError> {
        Ok(self.tables.read().await.quests.clone())
    }
}
