use crate::entities::episode;
use crate::entities::prelude::Episode as EpisodeEntity;
use crate::models::episode::Episode;
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use tracing::debug;

/// Subset of episode fields the reconciliation engine rewrites, carrying
/// only the changed ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeFieldChanges {
    pub name: Option<String>,
    pub airdate: Option<String>,
    pub airtime: Option<String>,
    pub runtime: Option<Option<i32>>,
}

impl EpisodeFieldChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.airdate.is_none()
            && self.airtime.is_none()
            && self.runtime.is_none()
    }
}

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: episode::Model) -> Episode {
        Episode {
            id: m.id,
            show_id: m.show_id,
            season: m.season,
            number: m.number,
            name: m.name,
            airdate: m.airdate,
            airtime: m.airtime,
            runtime: m.runtime,
            watched: m.watched,
        }
    }

    /// Inserts an episode row. Returns `false` when a row with the same
    /// external id already exists, which is benign: another path created it
    /// first. Any other error propagates.
    pub async fn insert(&self, ep: &Episode) -> Result<bool, DbErr> {
        let am = episode::ActiveModel {
            id: Set(ep.id),
            show_id: Set(ep.show_id),
            season: Set(ep.season),
            number: Set(ep.number),
            name: Set(ep.name.clone()),
            airdate: Set(ep.airdate.clone()),
            airtime: Set(ep.airtime.clone()),
            runtime: Set(ep.runtime),
            watched: Set(ep.watched),
        };

        match EpisodeEntity::insert(am).exec(&self.conn).await {
            Ok(_) => Ok(true),
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    debug!(episode_id = ep.id, "Episode already exists, insert skipped");
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn list_for_show(&self, show_id: i32) -> Result<Vec<Episode>, DbErr> {
        let rows = EpisodeEntity::find()
            .filter(episode::Column::ShowId.eq(show_id))
            .order_by_asc(episode::Column::Season)
            .order_by_asc(episode::Column::Number)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Episode>, DbErr> {
        let rows = EpisodeEntity::find()
            .order_by_asc(episode::Column::ShowId)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn update_fields(&self, id: i32, changes: EpisodeFieldChanges) -> Result<(), DbErr> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut am = episode::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            am.name = Set(name);
        }
        if let Some(airdate) = changes.airdate {
            am.airdate = Set(airdate);
        }
        if let Some(airtime) = changes.airtime {
            am.airtime = Set(airtime);
        }
        if let Some(runtime) = changes.runtime {
            am.runtime = Set(runtime);
        }
        am.update(&self.conn).await?;
        Ok(())
    }

    /// Flips the user-facing watched flag. Returns `false` if no such row.
    pub async fn set_watched(&self, id: i32, watched: bool) -> Result<bool, DbErr> {
        if EpisodeEntity::find_by_id(id).one(&self.conn).await?.is_none() {
            return Ok(false);
        }
        let am = episode::ActiveModel {
            id: Unchanged(id),
            watched: Set(watched),
            ..Default::default()
        };
        am.update(&self.conn).await?;
        Ok(true)
    }

    pub async fn find_by_show_season_number(
        &self,
        show_id: i32,
        season: i32,
        number: i32,
    ) -> Result<Option<Episode>, DbErr> {
        let row = EpisodeEntity::find()
            .filter(episode::Column::ShowId.eq(show_id))
            .filter(episode::Column::Season.eq(season))
            .filter(episode::Column::Number.eq(number))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }
}
