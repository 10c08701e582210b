use crate::models::episode::Episode;
use crate::models::show::{Show, UserShowSettings};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::episode::EpisodeFieldChanges;
pub use repositories::show::ShowFieldChanges;

/// Facade over the persistence layer. Every engine goes through this type,
/// never through a repository or the connection directly.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// Single-connection in-memory store. One connection is required so the
    /// whole pool sees the same sqlite memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_options("sqlite::memory:", 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    // ========== Shows ==========

    pub async fn insert_show(&self, show: &Show) -> Result<(), DbErr> {
        self.show_repo().insert(show).await
    }

    pub async fn get_show(&self, id: i32) -> Result<Option<Show>, DbErr> {
        self.show_repo().get(id).await
    }

    pub async fn list_all_shows(&self) -> Result<Vec<Show>, DbErr> {
        self.show_repo().list_all().await
    }

    pub async fn list_active_shows(&self) -> Result<Vec<Show>, DbErr> {
        self.show_repo().list_active().await
    }

    pub async fn update_show_fields(
        &self,
        id: i32,
        changes: ShowFieldChanges,
    ) -> Result<(), DbErr> {
        self.show_repo().update_fields(id, changes).await
    }

    pub async fn set_show_popularity(&self, id: i32, popularity: f32) -> Result<(), DbErr> {
        self.show_repo().set_popularity(id, popularity).await
    }

    pub async fn set_show_ignored(&self, id: i32, ignored: bool) -> Result<(), DbErr> {
        self.show_repo().set_ignored(id, ignored).await
    }

    pub async fn touch_show_sync_time(&self, id: i32, synced_at: String) -> Result<(), DbErr> {
        self.show_repo().touch_sync_time(id, synced_at).await
    }

    pub async fn remove_show(&self, id: i32) -> Result<bool, DbErr> {
        self.show_repo().remove(id).await
    }

    // ========== Episodes ==========

    pub async fn insert_episode(&self, episode: &Episode) -> Result<bool, DbErr> {
        self.episode_repo().insert(episode).await
    }

    pub async fn episodes_for_show(&self, show_id: i32) -> Result<Vec<Episode>, DbErr> {
        self.episode_repo().list_for_show(show_id).await
    }

    pub async fn list_all_episodes(&self) -> Result<Vec<Episode>, DbErr> {
        self.episode_repo().list_all().await
    }

    pub async fn update_episode_fields(
        &self,
        id: i32,
        changes: EpisodeFieldChanges,
    ) -> Result<(), DbErr> {
        self.episode_repo().update_fields(id, changes).await
    }

    pub async fn set_episode_watched(&self, id: i32, watched: bool) -> Result<bool, DbErr> {
        self.episode_repo().set_watched(id, watched).await
    }

    pub async fn find_episode(
        &self,
        show_id: i32,
        season: i32,
        number: i32,
    ) -> Result<Option<Episode>, DbErr> {
        self.episode_repo()
            .find_by_show_season_number(show_id, season, number)
            .await
    }

    // ========== User settings ==========

    pub async fn get_user_settings(
        &self,
        user_id: i32,
        show_id: i32,
    ) -> Result<Option<UserShowSettings>, DbErr> {
        self.settings_repo().get(user_id, show_id).await
    }

    pub async fn upsert_user_settings(
        &self,
        user_id: i32,
        show_id: i32,
        ignored: bool,
    ) -> Result<(), DbErr> {
        self.settings_repo().upsert(user_id, show_id, ignored).await
    }

    pub async fn settings_for_show(&self, show_id: i32) -> Result<Vec<UserShowSettings>, DbErr> {
        self.settings_repo().list_for_show(show_id).await
    }

    pub async fn list_all_settings(&self) -> Result<Vec<UserShowSettings>, DbErr> {
        self.settings_repo().list_all().await
    }

    pub async fn list_ignored_show_ids(&self) -> Result<Vec<i32>, DbErr> {
        self.settings_repo().ignored_show_ids().await
    }

    pub async fn count_settings_for_show(&self, show_id: i32) -> Result<u64, DbErr> {
        self.settings_repo().count_for_show(show_id).await
    }
}
