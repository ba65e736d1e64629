//! questkeep-server: REST backend for game profiles and quests
//!
//! Users, avatars, items and quests are served over HTTP through a
//! route → service → repository stack, backed by PostgreSQL or by an
//! in-process store with the same constraints.

pub mod db;
pub mod http;
pub mod models;
pub mod services;

pub use db::{create_pool, create_pool_with_options, MemoryStore};
pub use http::{build_router, run_server, ApiError, App, AppState, ServerConfig, ServerError};
pub use services::{EntityService, ServiceError};
