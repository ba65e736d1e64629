//! Database layer - connection pool, schema bootstrap and repositories
//!
//! # Design Principles
//!
//! - Connection pool, one statement per repository call (auto-commit)
//! - Store constraints are the source of truth for uniqueness and references
//! - Repositories report absence as `None`, never as an error

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
