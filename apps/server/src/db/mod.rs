//! Database module providing connection management, migrations, and queries.
//!
//! Query functions are generic over [`ConnectionTrait`] so the same code runs
//! on the pool or inside a [`sea_orm::DatabaseTransaction`].

pub mod defect_logs;
pub mod orders;
pub mod production_tasks;
pub mod qc_sheets;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::config::{Config, DatabaseSettings};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper.
///
/// Cloning is cheap; every clone shares the same underlying pool.
#[derive(Clone, Debug)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        Self::connect(&config.database).await
    }

    /// Connect using explicit settings.
    pub async fn connect(settings: &DatabaseSettings) -> AppResult<Self> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool { conn })
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        info!("Database migrations complete");
        Ok(())
    }

    /// Round-trip a trivial statement to verify connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        self.conn.ping().await?;
        Ok(())
    }
}

/// Sequence number following the highest code issued under a daily prefix.
///
/// Codes look like `PREFIX-YYYYMMDD-NNNN` and may grow past four digits, so
/// sequences are compared as numbers. Malformed codes are ignored; with no
/// valid code the sequence starts at 1.
pub(crate) fn next_sequence<'a>(codes: impl IntoIterator<Item = &'a str>) -> u32 {
    codes
        .into_iter()
        .filter_map(|code| code.rsplit_once('-'))
        .filter_map(|(_, seq)| seq.parse::<u32>().ok())
        .max()
        .map_or(1, |seq| seq.saturating_add(1))
}

/// Convert a 1-based page into the 0-based index SeaORM paginators expect.
pub(crate) fn page_index(page: u64) -> u64 {
    page.saturating_sub(1)
}
