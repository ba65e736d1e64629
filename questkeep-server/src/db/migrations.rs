//! Schema bootstrap
//!
//! Every statement is idempotent so this runs on each start. Databases
//! created before quests could be `accepted` get the enum value added.

use sqlx::PgPool;

/// Create the quest status type, tables and indexes if missing.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema bootstrap...");

    sqlx::query(
        r#"
        DO $$ BEGIN
            CREATE TYPE quest_status AS ENUM ('available', 'in_progress', 'completed', 'cancelled');
        EXCEPTION
            WHEN duplicate_object THEN NULL;
        END $$
        "#,
    )
    .execute(pool)
    .await?;

    // Cannot run inside a transaction block on older servers; the pool
    // executes it on its own.
    sqlx::query("ALTER TYPE quest_status ADD VALUE IF NOT EXISTS 'accepted' AFTER 'available'")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            wallet_address TEXT PRIMARY KEY,
            username TEXT,
            email TEXT UNIQUE,
            avatar_image TEXT,
            experience_points INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS avatars (
            wallet_address TEXT PRIMARY KEY REFERENCES users(wallet_address),
            equipped_items JSONB NOT NULL DEFAULT '[]',
            cosmetic_details JSONB NOT NULL DEFAULT '{}',
            preferences JSONB NOT NULL DEFAULT '{}',
            updated_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            item_id TEXT PRIMARY KEY,
            owner_wallet TEXT REFERENCES users(wallet_address),
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            attributes JSONB NOT NULL DEFAULT '{}',
            image_url TEXT NOT NULL,
            metadata_uri TEXT NOT NULL,
            image_data BYTEA,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS quests (
            quest_id UUID PRIMARY KEY,
            creator_wallet TEXT NOT NULL REFERENCES users(wallet_address),
            participant_wallet TEXT REFERENCES users(wallet_address),
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            location TEXT NOT NULL,
            longitude DOUBLE PRECISION,
            latitude DOUBLE PRECISION,
            time_window JSONB NOT NULL,
            rewards JSONB NOT NULL,
            status quest_status NOT NULL DEFAULT 'available',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Schema bootstrap complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_username ON users(username)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner_wallet)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_quests_creator ON quests(creator_wallet)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_quests_participant ON quests(participant_wallet) WHERE participant_wallet IS NOT NULL",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_quests_status ON quests(status)")
        .execute(pool)
        .await?;

    Ok(())
}
