//! Domain models
//!
//! Keys are validated at construction; create payloads and patches are
//! decoded straight from request bodies.

pub mod validation;
pub mod keys;
pub mod entity;
pub mod patch;
pub mod user;
pub mod avatar;
pub mod item;
pub mod quest;

pub use validation::ValidationError;
pub use keys::{ItemId, WalletAddress};
pub use entity::Entity;
pub use user::{NewUser, User, UserPatch};
pub use avatar::{Avatar, AvatarPatch, NewAvatar};
pub use item::{Item, ItemPatch, NewItem};
pub use quest::{NewQuest, Quest, QuestPatch, QuestStatus, Rewards, TimeWindow};
