//! Reconciliation engine: diffs one show's local state against the catalog
//! and applies the minimal set of writes.

use crate::clients::{CatalogCastCredit, CatalogClient, CatalogEpisode, CatalogError, CatalogShow};
use crate::constants::{limits, status};
use crate::db::{EpisodeFieldChanges, ShowFieldChanges, Store};
use crate::domain::ShowId;
use crate::models::episode::Episode;
use crate::models::show::{CastMember, Network, Show};
use sea_orm::DbErr;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Per-show sync failure. Catalog-side variants are recoverable at per-show
/// granularity; a store failure is fatal to the surrounding run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("show {0} is not present in the catalog")]
    MissingFromCatalog(ShowId),

    #[error("show {0} is not tracked locally")]
    UnknownShow(ShowId),

    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

/// Outcome of syncing a single show end-to-end.
#[derive(Debug, Clone)]
pub struct ShowSyncReport {
    pub show_id: i32,
    pub show_name: String,
    pub show_updated: bool,
    pub episodes_added: usize,
    pub episodes_updated: usize,
    /// Episodes present locally but absent from the fresh catalog fetch.
    /// Counted and logged, never deleted: the catalog is not authoritative
    /// for episode removal.
    pub episodes_unmatched: usize,
}

#[derive(Clone)]
pub struct SyncService {
    store: Store,
    catalog: Arc<dyn CatalogClient>,
}

impl SyncService {
    #[must_use]
    pub fn new(store: Store, catalog: Arc<dyn CatalogClient>) -> Self {
        Self { store, catalog }
    }

    /// Synchronizes one show plus its episode list against the catalog.
    ///
    /// Catalog failures abort only this show's sync; the caller folds them
    /// into its summary without touching sibling shows.
    pub async fn sync_show(&self, local: &Show) -> Result<ShowSyncReport, SyncError> {
        let fresh = self
            .catalog
            .get_show(local.id)
            .await?
            .ok_or_else(|| SyncError::MissingFromCatalog(ShowId::new(local.id)))?;
        let catalog_episodes = self.catalog.get_episodes(local.id).await?;

        let changes = diff_show(local, &fresh);
        let show_updated = !changes.is_empty();
        if show_updated {
            self.store.update_show_fields(local.id, changes).await?;
        }

        let mut local_by_id: HashMap<i32, Episode> = self
            .store
            .episodes_for_show(local.id)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        let mut episodes_added = 0;
        let mut episodes_updated = 0;

        for catalog_episode in &catalog_episodes {
            if let Some(existing) = local_by_id.remove(&catalog_episode.id) {
                let changes = diff_episode(&existing, catalog_episode);
                if !changes.is_empty() {
                    self.store.update_episode_fields(existing.id, changes).await?;
                    episodes_updated += 1;
                }
            } else if self.create_episode(catalog_episode, local.id).await? {
                episodes_added += 1;
            }
        }

        let episodes_unmatched = local_by_id.len();
        if episodes_unmatched > 0 {
            debug!(
                show_id = local.id,
                count = episodes_unmatched,
                "Local episodes missing from catalog fetch, keeping them"
            );
        }

        self.store
            .touch_show_sync_time(local.id, chrono::Utc::now().to_rfc3339())
            .await?;

        debug!(
            show_id = local.id,
            show_updated, episodes_added, episodes_updated, "Show sync complete"
        );

        Ok(ShowSyncReport {
            show_id: local.id,
            show_name: local.name.clone(),
            show_updated,
            episodes_added,
            episodes_updated,
            episodes_unmatched,
        })
    }

    /// Inserts a new episode row with `watched` defaulted off. A concurrent
    /// creation of the same external id is benign and reported as `false`.
    pub async fn create_episode(
        &self,
        catalog_episode: &CatalogEpisode,
        show_id: i32,
    ) -> Result<bool, SyncError> {
        let episode = Episode {
            id: catalog_episode.id,
            show_id,
            season: catalog_episode.season,
            number: catalog_episode.number.unwrap_or(0),
            name: catalog_episode.display_name(),
            airdate: catalog_episode.normalized_airdate(),
            airtime: catalog_episode.normalized_airtime(),
            runtime: catalog_episode.runtime,
            watched: false,
        };
        Ok(self.store.insert_episode(&episode).await?)
    }

    /// Creation path used by bulk import and the add operation: fetch full
    /// detail plus cast, create the show, then create its episodes.
    pub async fn add_show_by_id(
        &self,
        id: ShowId,
        search_name: Option<&str>,
    ) -> Result<Show, SyncError> {
        let fresh = self
            .catalog
            .get_show(id.value())
            .await?
            .ok_or(SyncError::MissingFromCatalog(id))?;
        let cast = self.catalog.get_cast(id.value()).await?;

        let show = build_show(&fresh, search_name, &cast);
        self.store.insert_show(&show).await?;

        let catalog_episodes = self.catalog.get_episodes(id.value()).await?;
        let mut created = 0;
        for catalog_episode in &catalog_episodes {
            if self.create_episode(catalog_episode, id.value()).await? {
                created += 1;
            }
        }

        info!(
            show_id = id.value(),
            name = %show.name,
            episodes = created,
            "Show added from catalog"
        );
        Ok(show)
    }

    /// Explicit show removal, cascading to episodes and user settings.
    pub async fn remove_show(&self, id: ShowId) -> Result<bool, SyncError> {
        if self.store.remove_show(id.value()).await? {
            Ok(true)
        } else {
            warn!(show_id = id.value(), "Removal requested for unknown show");
            Ok(false)
        }
    }
}

/// Compares only {name, status, artwork} and keeps the changed subset.
/// Artwork on both sides is normalized so "no image" has one representation.
#[must_use]
pub fn diff_show(local: &Show, fresh: &CatalogShow) -> ShowFieldChanges {
    let mut changes = ShowFieldChanges::default();

    if local.name != fresh.name {
        changes.name = Some(fresh.name.clone());
    }

    let fresh_status = fresh
        .status
        .clone()
        .unwrap_or_else(|| status::UNKNOWN.to_string());
    if local.status != fresh_status {
        changes.status = Some(fresh_status);
    }

    let fresh_image = fresh.artwork();
    if normalize_artwork(local.image.as_deref()) != fresh_image {
        changes.image = Some(fresh_image);
    }

    changes
}

/// Compares only {title, air date, air time, runtime}, with missing air
/// fields normalized to the sentinel and missing runtime to `None`.
#[must_use]
pub fn diff_episode(local: &Episode, fresh: &CatalogEpisode) -> EpisodeFieldChanges {
    let mut changes = EpisodeFieldChanges::default();

    let fresh_name = fresh.display_name();
    if local.name != fresh_name {
        changes.name = Some(fresh_name);
    }

    let fresh_airdate = fresh.normalized_airdate();
    if local.airdate != fresh_airdate {
        changes.airdate = Some(fresh_airdate);
    }

    let fresh_airtime = fresh.normalized_airtime();
    if local.airtime != fresh_airtime {
        changes.airtime = Some(fresh_airtime);
    }

    if local.runtime != fresh.runtime {
        changes.runtime = Some(fresh.runtime);
    }

    changes
}

fn normalize_artwork(image: Option<&str>) -> Option<String> {
    image.filter(|url| !url.is_empty()).map(str::to_string)
}

/// Builds the local record for a freshly fetched catalog show. Popularity
/// starts at zero and is owned by the scoring engine from then on.
#[must_use]
pub fn build_show(
    fresh: &CatalogShow,
    search_name: Option<&str>,
    cast: &[CatalogCastCredit],
) -> Show {
    Show {
        id: fresh.id,
        name: fresh.name.clone(),
        search_name: search_name.map(str::to_string),
        image: fresh.artwork(),
        status: fresh
            .status
            .clone()
            .unwrap_or_else(|| status::UNKNOWN.to_string()),
        summary: fresh.summary.clone(),
        genres: fresh.genres.clone().unwrap_or_default(),
        language: fresh.language.clone(),
        premiered: fresh.premiered.clone(),
        rating: fresh.rating_average(),
        network: fresh.network.as_ref().map(|n| Network {
            name: n.name.clone(),
            country: n.country.as_ref().and_then(|c| c.name.clone()),
        }),
        runtime: fresh.runtime,
        official_site: fresh.official_site.clone(),
        cast: cast
            .iter()
            .take(limits::MAX_CAST_MEMBERS)
            .map(|credit| CastMember {
                person_id: credit.person.id,
                person_name: credit.person.name.clone(),
                character_name: credit.character.as_ref().and_then(|c| c.name.clone()),
                person_image: credit
                    .person
                    .image
                    .as_ref()
                    .and_then(|img| img.medium.clone().or_else(|| img.original.clone())),
            })
            .collect(),
        popularity: 0.0,
        ignored: false,
        last_synced_at: Some(chrono::Utc::now().to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{CatalogImage, CatalogRating};
    use crate::constants::TBA;

    fn catalog_show(name: &str, show_status: Option<&str>, image: Option<&str>) -> CatalogShow {
        CatalogShow {
            id: 1,
            name: name.to_string(),
            status: show_status.map(str::to_string),
            language: None,
            genres: None,
            premiered: None,
            runtime: None,
            summary: None,
            official_site: None,
            image: image.map(|url| CatalogImage {
                medium: Some(url.to_string()),
                original: None,
            }),
            rating: Some(CatalogRating { average: Some(8.2) }),
            network: None,
        }
    }

    fn local_show(name: &str, show_status: &str, image: Option<&str>) -> Show {
        Show {
            id: 1,
            name: name.to_string(),
            search_name: None,
            image: image.map(str::to_string),
            status: show_status.to_string(),
            summary: None,
            genres: vec![],
            language: None,
            premiered: None,
            rating: None,
            network: None,
            runtime: None,
            official_site: None,
            cast: vec![],
            popularity: 0.0,
            ignored: false,
            last_synced_at: None,
        }
    }

    fn local_episode(name: &str, airdate: &str, airtime: &str, runtime: Option<i32>) -> Episode {
        Episode {
            id: 10,
            show_id: 1,
            season: 1,
            number: 1,
            name: name.to_string(),
            airdate: airdate.to_string(),
            airtime: airtime.to_string(),
            runtime,
            watched: false,
        }
    }

    fn catalog_episode(
        name: &str,
        airdate: Option<&str>,
        airtime: Option<&str>,
        runtime: Option<i32>,
    ) -> CatalogEpisode {
        CatalogEpisode {
            id: 10,
            season: 1,
            number: Some(1),
            name: Some(name.to_string()),
            airdate: airdate.map(str::to_string),
            airtime: airtime.map(str::to_string),
            runtime,
        }
    }

    #[test]
    fn identical_show_produces_no_changes() {
        let local = local_show("Dark", "Running", Some("http://img/x.jpg"));
        let fresh = catalog_show("Dark", Some("Running"), Some("http://img/x.jpg"));
        assert!(diff_show(&local, &fresh).is_empty());
    }

    #[test]
    fn changed_fields_are_the_only_ones_written() {
        let local = local_show("Dark", "Running", Some("http://img/x.jpg"));
        let fresh = catalog_show("Dark", Some("Ended"), Some("http://img/x.jpg"));
        let changes = diff_show(&local, &fresh);
        assert!(changes.name.is_none());
        assert_eq!(changes.status.as_deref(), Some("Ended"));
        assert!(changes.image.is_none());
    }

    #[test]
    fn empty_artwork_matches_absent_artwork() {
        let local = local_show("Dark", "Running", Some(""));
        let fresh = catalog_show("Dark", Some("Running"), None);
        assert!(diff_show(&local, &fresh).is_empty());
    }

    #[test]
    fn missing_catalog_status_normalizes_to_unknown() {
        let local = local_show("Dark", "Unknown", None);
        let fresh = catalog_show("Dark", None, None);
        assert!(diff_show(&local, &fresh).is_empty());
    }

    #[test]
    fn identical_episode_produces_no_changes() {
        let local = local_episode("Secrets", "2017-12-01", "20:00", Some(60));
        let fresh = catalog_episode("Secrets", Some("2017-12-01"), Some("20:00"), Some(60));
        assert!(diff_episode(&local, &fresh).is_empty());
    }

    #[test]
    fn missing_air_fields_compare_equal_to_sentinel() {
        let local = local_episode("Secrets", TBA, TBA, None);
        let fresh = catalog_episode("Secrets", None, Some(""), None);
        assert!(diff_episode(&local, &fresh).is_empty());
    }

    #[test]
    fn runtime_change_is_detected() {
        let local = local_episode("Secrets", TBA, TBA, Some(45));
        let fresh = catalog_episode("Secrets", None, None, None);
        let changes = diff_episode(&local, &fresh);
        assert_eq!(changes.runtime, Some(None));
        assert!(changes.name.is_none());
    }

    #[test]
    fn build_show_caps_cast_and_seeds_popularity_zero() {
        let fresh = catalog_show("Dark", Some("Running"), None);
        let cast: Vec<CatalogCastCredit> = (0..40)
            .map(|i| CatalogCastCredit {
                person: crate::clients::tvmaze::CatalogPerson {
                    id: i,
                    name: format!("Person {i}"),
                    image: None,
                },
                character: None,
            })
            .collect();
        let show = build_show(&fresh, Some("dark"), &cast);
        assert_eq!(show.cast.len(), limits::MAX_CAST_MEMBERS);
        assert_eq!(show.popularity, 0.0);
        assert_eq!(show.search_name.as_deref(), Some("dark"));
        assert_eq!(show.rating, Some(8.2));
    }
}
