//! Database Migrations
//!
//! Handles schema creation and versioned migrations.

use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::{info, warn};

/// Current database schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create migrations table if it doesn't exist
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Get current version
    let current_version = get_current_version(pool).await?;

    info!(current_version, target_version = SCHEMA_VERSION, "Checking database migrations");

    if current_version < SCHEMA_VERSION {
        info!("Running database migrations from v{} to v{}", current_version, SCHEMA_VERSION);

        // Run migrations in order
        for version in (current_version + 1)..=SCHEMA_VERSION {
            run_migration(pool, version).await?;
        }

        info!("Database migrations completed successfully");
    }

    Ok(())
}

/// Get the current schema version
async fn get_current_version(pool: &SqlitePool) -> Result<i32, sqlx::Error> {
    let result = sqlx::query("SELECT MAX(version) as version FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(result
        .and_then(|row| row.try_get::<i32, _>("version").ok())
        .unwrap_or(0))
}

/// Run a specific migration version
async fn run_migration(pool: &SqlitePool, version: i32) -> Result<(), sqlx::Error> {
    let (name, sql) = match version {
        1 => ("initial_schema", MIGRATION_V1),
        2 => ("stability_checks", MIGRATION_V2),
        _ => {
            warn!("Unknown migration version: {}", version);
            return Ok(());
        }
    };

    info!("Applying migration v{}: {}", version, name);

    // Execute migration SQL
    for statement in sql.split(";").filter(|s| !s.trim().is_empty()) {
        sqlx::query(statement.trim()).execute(pool).await?;
    }

    // Record migration
    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(version)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(())
}

/// Migration v1: Initial schema
const MIGRATION_V1: &str = r#"
-- Beyonder progression records
CREATE TABLE IF NOT EXISTS beyonders (
    user_id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    pathway TEXT,
    sequence INTEGER NOT NULL DEFAULT 9,
    spiritual_points INTEGER NOT NULL DEFAULT 0,
    total_advancements INTEGER NOT NULL DEFAULT 0,
    lose_control_count INTEGER NOT NULL DEFAULT 0,
    assigned_at TEXT,
    assigned_by TEXT,
    last_active TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_beyonders_pathway ON beyonders(pathway);
CREATE INDEX IF NOT EXISTS idx_beyonders_sequence ON beyonders(sequence);

-- Sequence change history
CREATE TABLE IF NOT EXISTS advancement_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    pathway TEXT NOT NULL,
    from_sequence INTEGER NOT NULL,
    to_sequence INTEGER NOT NULL,
    advanced_by TEXT,
    recorded_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES beyonders(user_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_advancement_history_user ON advancement_history(user_id);
CREATE INDEX IF NOT EXISTS idx_advancement_history_time ON advancement_history(recorded_at DESC);
"#;

/// Migration v2: Stability check audit trail
const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS stability_checks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    pathway TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    risk_percent INTEGER NOT NULL,
    roll REAL NOT NULL,
    lost_control INTEGER NOT NULL DEFAULT 0,
    rolled_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES beyonders(user_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_stability_checks_user ON stability_checks(user_id);
CREATE INDEX IF NOT EXISTS idx_stability_checks_time ON stability_checks(rolled_at DESC);
"#;
