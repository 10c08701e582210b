use crate::entities::prelude::UserShowSettings as SettingsEntity;
use crate::entities::user_show_settings;
use crate::models::show::UserShowSettings;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: user_show_settings::Model) -> UserShowSettings {
        UserShowSettings {
            user_id: m.user_id,
            show_id: m.show_id,
            ignored: m.ignored,
        }
    }

    pub async fn get(
        &self,
        user_id: i32,
        show_id: i32,
    ) -> Result<Option<UserShowSettings>, DbErr> {
        let row = SettingsEntity::find_by_id((user_id, show_id))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }

    /// Creates the row lazily on first toggle, updates it afterwards.
    pub async fn upsert(&self, user_id: i32, show_id: i32, ignored: bool) -> Result<(), DbErr> {
        let am = user_show_settings::ActiveModel {
            user_id: Set(user_id),
            show_id: Set(show_id),
            ignored: Set(ignored),
        };

        SettingsEntity::insert(am)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    user_show_settings::Column::UserId,
                    user_show_settings::Column::ShowId,
                ])
                .update_column(user_show_settings::Column::Ignored)
                .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn list_for_show(&self, show_id: i32) -> Result<Vec<UserShowSettings>, DbErr> {
        let rows = SettingsEntity::find()
            .filter(user_show_settings::Column::ShowId.eq(show_id))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<UserShowSettings>, DbErr> {
        let rows = SettingsEntity::find().all(&self.conn).await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Show ids any user has marked ignored. Unioned by the refresh
    /// orchestrator with the legacy per-show flag.
    pub async fn ignored_show_ids(&self) -> Result<Vec<i32>, DbErr> {
        let rows = SettingsEntity::find()
            .filter(user_show_settings::Column::Ignored.eq(true))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(|m| m.show_id).collect())
    }

    pub async fn count_for_show(&self, show_id: i32) -> Result<u64, DbErr> {
        SettingsEntity::find()
            .filter(user_show_settings::Column::ShowId.eq(show_id))
            .count(&self.conn)
            .await
    }
}
