//! Service wiring: stores, views and static files shared by all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use garage_blog::POSTS;
use garage_infra::{
    InMemoryRecordStore, InMemoryUserStore, RecordStore, SqliteRecordStore, SqliteUserStore,
    UserStore, db,
};
use garage_inventory::CARS;

use crate::app::static_files::StaticFiles;
use crate::app::views::Views;
use crate::config::{Config, StoreKind};

/// Everything a request handler may need.
///
/// Stores are injected as trait objects so SQLite and in-memory backends are
/// interchangeable without touching the routes.
#[derive(Clone)]
pub struct AppServices {
    pub cars: Arc<dyn RecordStore>,
    pub posts: Arc<dyn RecordStore>,
    pub users: Arc<dyn UserStore>,
    pub views: Arc<Views>,
    pub public: Arc<StaticFiles>,
}

impl AppServices {
    /// Process-local stores (dev/test); nothing survives a restart.
    pub fn in_memory(public_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self {
            cars: Arc::new(InMemoryRecordStore::new(&CARS)),
            posts: Arc::new(InMemoryRecordStore::new(&POSTS)),
            users: Arc::new(InMemoryUserStore::new()),
            views: Arc::new(Views::new().context("failed to compile templates")?),
            public: Arc::new(StaticFiles::new(public_dir)),
        })
    }

    /// SQLite-backed stores over one pool; tables are created if missing.
    pub async fn sqlite(pool: sqlx::SqlitePool, public_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        db::bootstrap(&pool, &[&CARS, &POSTS]).await?;

        let users = SqliteUserStore::new(pool.clone());
        users
            .ensure_schema()
            .await
            .context("failed to create usuarios table")?;

        Ok(Self {
            cars: Arc::new(SqliteRecordStore::new(pool.clone(), &CARS)),
            posts: Arc::new(SqliteRecordStore::new(pool, &POSTS)),
            users: Arc::new(users),
            views: Arc::new(Views::new().context("failed to compile templates")?),
            public: Arc::new(StaticFiles::new(public_dir)),
        })
    }
}

pub async fn build_services(config: &Config) -> anyhow::Result<AppServices> {
    match config.store {
        StoreKind::Sqlite => {
            let pool = db::connect(&config.database_path).await?;
            tracing::info!(path = %config.database_path.display(), "using sqlite store");
            AppServices::sqlite(pool, &config.public_dir).await
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            AppServices::in_memory(&config.public_dir)
        }
    }
}
