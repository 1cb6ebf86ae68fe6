//! Application state for the listing service

use anyhow::Result;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;

use crate::config::{Args, DEFAULT_LATEST_LIMIT};

pub struct AppState {
    pub db: SqlitePool,
    /// Moderation key; approval is refused when `None`
    pub admin_key: Option<String>,
    pub latest_limit: u32,
}

impl AppState {
    pub async fn new(args: &Args) -> Result<Self> {
        let db_path = args.database_url.clone().unwrap_or_else(default_database_url);

        tracing::info!("Connecting to database: {}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_path)
            .await?;

        let mut state = Self::with_pool(pool).await?;
        state.admin_key = args.admin_key.clone().filter(|k| !k.is_empty());
        state.latest_limit = args.latest_limit;

        if state.admin_key.is_none() {
            tracing::warn!("ADMIN_KEY not set; listing approval is disabled");
        }
        Ok(state)
    }

    /// Wrap an existing pool, running migrations first
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        Self::run_migrations(&pool).await?;
        Ok(Self {
            db: pool,
            admin_key: None,
            latest_limit: DEFAULT_LATEST_LIMIT,
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                restaurant_name TEXT NOT NULL,
                role_category TEXT,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                apply_email TEXT,
                company_website TEXT,
                employment_type TEXT,
                pay_range TEXT,
                address TEXT,
                how_to_apply TEXT,
                description TEXT,
                active INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Listing queries only ever read active rows, newest first
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_jobs_active_created ON jobs(active, created_at)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }
}

fn default_database_url() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jobboard-api");
    std::fs::create_dir_all(&data_dir).ok();
    format!("sqlite:{}/jobboard.db?mode=rwc", data_dir.display())
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
