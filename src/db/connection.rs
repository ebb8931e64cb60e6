use std::time::Duration;

use anyhow::{Context, Result, bail};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use super::seed;
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackendKind {
    Postgres,
    Sqlite,
}

impl DbBackendKind {
    pub fn from_url(url: &str) -> Result<Self> {
        let normalized = url.trim().to_ascii_lowercase();
        if normalized.starts_with("postgres://") || normalized.starts_with("postgresql://") {
            return Ok(Self::Postgres);
        }
        if normalized.starts_with("sqlite:") {
            return Ok(Self::Sqlite);
        }
        bail!(
            "unsupported database url '{}'; expected scheme postgres://, postgresql://, or sqlite:",
            redact_url(url)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Opens the pool, brings the schema in line with the entity definitions
/// and seeds the default topics.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
    let backend = DbBackendKind::from_url(&cfg.url)?;

    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if backend == DbBackendKind::Sqlite {
        // Applied to every pooled connection as it is opened.
        options.map_sqlx_sqlite_opts(|opts| {
            opts.foreign_keys(true)
                .busy_timeout(Duration::from_millis(SQLITE_BUSY_TIMEOUT_MS))
        });
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to {}", redact_url(&cfg.url)))?;

    info!(backend = backend.as_str(), "syncing database schema from entities");
    db.get_schema_registry("sticky_notes::db::entities::*")
        .sync(&db)
        .await
        .context("failed to sync database schema")?;

    seed::seed_topics(&db)
        .await
        .context("failed to seed default topics")?;
    Ok(db)
}

fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}
