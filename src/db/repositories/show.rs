use crate::constants::status;
use crate::entities::prelude::{Episode, Show as ShowEntity, UserShowSettings};
use crate::entities::{episode, show, user_show_settings};
use crate::models::show::{CastMember, Network, Show};
use sea_orm::ActiveValue::Unchanged;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

/// Subset of show fields the reconciliation engine is allowed to rewrite.
/// Only fields that actually changed are present, so updates stay minimal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowFieldChanges {
    pub name: Option<String>,
    pub status: Option<String>,
    /// Outer option: whether to write. Inner option: the normalized artwork.
    pub image: Option<Option<String>>,
}

impl ShowFieldChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.image.is_none()
    }
}

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: show::Model) -> Show {
        Show {
            id: model.id,
            name: model.name,
            search_name: model.search_name,
            image: model.image,
            status: model.status,
            summary: model.summary,
            genres: model
                .genres
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            language: model.language,
            premiered: model.premiered,
            rating: model.rating,
            network: model.network_name.map(|name| Network {
                name,
                country: model.network_country,
            }),
            runtime: model.runtime,
            official_site: model.official_site,
            cast: model
                .cast
                .and_then(|s| serde_json::from_str::<Vec<CastMember>>(&s).ok())
                .unwrap_or_default(),
            popularity: model.popularity,
            ignored: model.ignored,
            last_synced_at: model.last_synced_at,
        }
    }

    fn to_active_model(s: &Show) -> show::ActiveModel {
        show::ActiveModel {
            id: Set(s.id),
            name: Set(s.name.clone()),
            search_name: Set(s.search_name.clone()),
            image: Set(s.image.clone()),
            status: Set(s.status.clone()),
            summary: Set(s.summary.clone()),
            genres: Set(if s.genres.is_empty() {
                None
            } else {
                serde_json::to_string(&s.genres).ok()
            }),
            language: Set(s.language.clone()),
            premiered: Set(s.premiered.clone()),
            rating: Set(s.rating),
            network_name: Set(s.network.as_ref().map(|n| n.name.clone())),
            network_country: Set(s.network.as_ref().and_then(|n| n.country.clone())),
            runtime: Set(s.runtime),
            official_site: Set(s.official_site.clone()),
            cast: Set(if s.cast.is_empty() {
                None
            } else {
                serde_json::to_string(&s.cast).ok()
            }),
            popularity: Set(s.popularity),
            ignored: Set(s.ignored),
            last_synced_at: Set(s.last_synced_at.clone()),
        }
    }

    /// Plain insert. A duplicate external id is a real conflict here and
    /// surfaces to the caller, unlike episode creation.
    pub async fn insert(&self, s: &Show) -> Result<(), DbErr> {
        ShowEntity::insert(Self::to_active_model(s))
            .exec(&self.conn)
            .await?;
        info!(show_id = s.id, name = %s.name, "Added show");
        Ok(())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Show>, DbErr> {
        let row = ShowEntity::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn list_all(&self) -> Result<Vec<Show>, DbErr> {
        let rows = ShowEntity::find()
            .order_by_asc(show::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Shows still eligible for refresh, meaning not in the terminal state.
    pub async fn list_active(&self) -> Result<Vec<Show>, DbErr> {
        let rows = ShowEntity::find()
            .filter(show::Column::Status.ne(status::ENDED))
            .order_by_asc(show::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn update_fields(&self, id: i32, changes: ShowFieldChanges) -> Result<(), DbErr> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut am = show::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(name) = changes.name {
            am.name = Set(name);
        }
        if let Some(status) = changes.status {
            am.status = Set(status);
        }
        if let Some(image) = changes.image {
            am.image = Set(image);
        }
        am.update(&self.conn).await?;
        Ok(())
    }

    pub async fn set_popularity(&self, id: i32, popularity: f32) -> Result<(), DbErr> {
        let am = show::ActiveModel {
            id: Unchanged(id),
            popularity: Set(popularity),
            ..Default::default()
        };
        am.update(&self.conn).await?;
        Ok(())
    }

    pub async fn set_ignored(&self, id: i32, ignored: bool) -> Result<(), DbErr> {
        let am = show::ActiveModel {
            id: Unchanged(id),
            ignored: Set(ignored),
            ..Default::default()
        };
        am.update(&self.conn).await?;
        Ok(())
    }

    pub async fn touch_sync_time(&self, id: i32, synced_at: String) -> Result<(), DbErr> {
        let am = show::ActiveModel {
            id: Unchanged(id),
            last_synced_at: Set(Some(synced_at)),
            ..Default::default()
        };
        am.update(&self.conn).await?;
        Ok(())
    }

    /// Removes a show together with its episodes and user settings rows.
    /// The cascade is explicit so it does not depend on sqlite FK pragmas.
    pub async fn remove(&self, id: i32) -> Result<bool, DbErr> {
        let Some(existing) = ShowEntity::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let txn = self.conn.begin().await?;

        Episode::delete_many()
            .filter(episode::Column::ShowId.eq(id))
            .exec(&txn)
            .await?;
        UserShowSettings::delete_many()
            .filter(user_show_settings::Column::ShowId.eq(id))
            .exec(&txn)
            .await?;
        existing.delete(&txn).await?;

        txn.commit().await?;
        info!(show_id = id, "Removed show and dependent rows");
        Ok(true)
    }
}
