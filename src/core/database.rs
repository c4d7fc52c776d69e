use crate::core::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// A column that older deployments may lack, added in place on startup
#[derive(Debug, Clone, Copy)]
pub struct ColumnUpgrade {
    pub table: &'static str,
    pub column: &'static str,
    pub definition: &'static str,
}

/// Applied in order, each at most once per database.
pub const COLUMN_UPGRADES: &[ColumnUpgrade] = &[
    ColumnUpgrade {
        table: "reports",
        column: "category",
        definition: "TEXT NOT NULL DEFAULT 'Other'",
    },
    ColumnUpgrade {
        table: "reports",
        column: "address",
        definition: "TEXT DEFAULT ''",
    },
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        // `submitted_by` may name an account that no longer exists
        .foreign_keys(false);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(options)
        .await
}

/// Execute a SQL script statement by statement, skipping `--` comment lines
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<(), sqlx::Error> {
    for statement in sql.split(';') {
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

async fn has_column(pool: &SqlitePool, table: &str, column: &str) -> Result<bool, sqlx::Error> {
    let found: Option<(String,)> =
        sqlx::query_as("SELECT name FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Create missing tables, then add any columns older deployments lack.
/// Safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    execute_sql(pool, include_str!("../../migrations/001_initial.sql")).await?;

    for upgrade in COLUMN_UPGRADES {
        if has_column(pool, upgrade.table, upgrade.column).await? {
            continue;
        }

        tracing::info!(
            "Upgrading schema: adding column '{}' to '{}'",
            upgrade.column,
            upgrade.table
        );
        let statement = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            upgrade.table, upgrade.column, upgrade.definition
        );
        sqlx::query(&statement).execute(pool).await?;
    }

    Ok(())
}
