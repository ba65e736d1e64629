//! Postgres pool shared by the four repositories
//!
//! `questkeep serve` sizes the pool from `[database] max_connections`;
//! `questkeep migrate` needs only the default.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool size when the config file does not set one.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// A request waits this long for a free connection before failing with 500.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect with [`DEFAULT_MAX_CONNECTIONS`].
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Connect and verify the server is reachable.
///
/// Every repository call checks out one connection for one statement, so
/// `max_connections` bounds the number of requests hitting the database at
/// once.
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(max_connections, "connecting to postgres");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    // DATABASE_URL=postgres://... cargo test -p questkeep-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_respects_configured_size() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool_with_options(&url, 2)
            .await
            .expect("pool creation failed");

        let (one,): (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");
        assert_eq!(one, 1);
        assert!(pool.size() <= 2);
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let result = create_pool_with_options("postgres://questkeep@127.0.0.1:1/questkeep", 1).await;
        assert!(result.is_err());
    }
}
