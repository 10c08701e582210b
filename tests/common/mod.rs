//! Shared fixtures for the integration suites: an in-memory store and a
//! scripted catalog standing in for the real API.

#![allow(dead_code)]

use async_trait::async_trait;
use showarr::clients::tvmaze::{CatalogImage, CatalogPerson, CatalogRating};
use showarr::clients::{
    CatalogCastCredit, CatalogClient, CatalogEpisode, CatalogError, CatalogSearchHit, CatalogShow,
};
use showarr::db::Store;
use showarr::domain::events::NotificationEvent;
use showarr::models::show::Show;
use showarr::services::{
    BulkImportOptions, BulkImportService, PopularityService, RefreshService, SyncService,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Scripted catalog. Set up the maps before wrapping it in an `Arc`; the
/// trait impl only reads them and counts calls.
#[derive(Default)]
pub struct MockCatalog {
    pub shows: HashMap<i32, CatalogShow>,
    pub episodes: HashMap<i32, Vec<CatalogEpisode>>,
    pub cast: HashMap<i32, Vec<CatalogCastCredit>>,
    /// Search query (lowercased) to matching show ids, in result order.
    pub search: HashMap<String, Vec<i32>>,
    /// Show ids whose catalog calls always fail.
    pub fail_shows: HashSet<i32>,
    /// Show ids whose cast lookup fails while the rest works.
    pub fail_cast: HashSet<i32>,
    pub calls: AtomicUsize,
    /// Cancels the token once the given number of calls has been made.
    pub cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl MockCatalog {
    pub fn with_show(mut self, show: CatalogShow, episodes: Vec<CatalogEpisode>) -> Self {
        self.episodes.insert(show.id, episodes);
        self.shows.insert(show.id, show);
        self
    }

    pub fn with_search(mut self, query: &str, ids: Vec<i32>) -> Self {
        self.search.insert(query.to_lowercase(), ids);
        self
    }

    pub fn failing_show(mut self, id: i32) -> Self {
        self.fail_shows.insert(id);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        let made = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(guard) = self.cancel_after.lock()
            && let Some((threshold, token)) = guard.as_ref()
            && made >= *threshold
        {
            token.cancel();
        }
    }

    fn failure() -> CatalogError {
        CatalogError::InvalidPayload("injected failure".to_string())
    }
}

#[async_trait]
impl CatalogClient for MockCatalog {
    async fn get_show(&self, id: i32) -> Result<Option<CatalogShow>, CatalogError> {
        self.record_call();
        if self.fail_shows.contains(&id) {
            return Err(Self::failure());
        }
        Ok(self.shows.get(&id).cloned())
    }

    async fn search_shows(&self, name: &str) -> Result<Vec<CatalogSearchHit>, CatalogError> {
        self.record_call();
        let ids = self.search.get(&name.to_lowercase()).cloned().unwrap_or_default();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.shows.get(&id).cloned())
            .map(|show| CatalogSearchHit {
                score: Some(1.0),
                show,
            })
            .collect())
    }

    async fn get_episodes(&self, show_id: i32) -> Result<Vec<CatalogEpisode>, CatalogError> {
        self.record_call();
        if self.fail_shows.contains(&show_id) {
            return Err(Self::failure());
        }
        Ok(self.episodes.get(&show_id).cloned().unwrap_or_default())
    }

    async fn get_cast(&self, show_id: i32) -> Result<Vec<CatalogCastCredit>, CatalogError> {
        self.record_call();
        if self.fail_shows.contains(&show_id) || self.fail_cast.contains(&show_id) {
            return Err(Self::failure());
        }
        Ok(self.cast.get(&show_id).cloned().unwrap_or_default())
    }
}

pub fn catalog_show(id: i32, name: &str, status: &str) -> CatalogShow {
    CatalogShow {
        id,
        name: name.to_string(),
        status: Some(status.to_string()),
        language: Some("English".to_string()),
        genres: Some(vec!["Drama".to_string()]),
        premiered: Some("2017-12-01".to_string()),
        runtime: Some(60),
        summary: Some("A show.".to_string()),
        official_site: None,
        image: Some(CatalogImage {
            medium: Some(format!("http://img.example/{id}-m.jpg")),
            original: None,
        }),
        rating: Some(CatalogRating { average: Some(8.0) }),
        network: None,
    }
}

pub fn catalog_episode(id: i32, season: i32, number: i32, name: &str) -> CatalogEpisode {
    CatalogEpisode {
        id,
        season,
        number: Some(number),
        name: Some(name.to_string()),
        airdate: Some("2017-12-01".to_string()),
        airtime: Some("20:00".to_string()),
        runtime: Some(60),
    }
}

pub fn cast_credit(person_id: i32, person: &str, character: &str) -> CatalogCastCredit {
    CatalogCastCredit {
        person: CatalogPerson {
            id: person_id,
            name: person.to_string(),
            image: None,
        },
        character: Some(showarr::clients::tvmaze::CatalogCharacter {
            name: Some(character.to_string()),
        }),
    }
}

/// Real-time runtime used only to build in-memory stores, kept alive for the
/// whole test binary so each store's `sqlite::memory:` connection stays open.
fn bootstrap_runtime() -> &'static tokio::runtime::Runtime {
    use std::sync::OnceLock;
    static RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RT.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("bootstrap runtime")
    })
}

pub struct TestHarness {
    pub store: Store,
    pub catalog: std::sync::Arc<MockCatalog>,
    pub events: broadcast::Sender<NotificationEvent>,
}

impl TestHarness {
    pub async fn new(catalog: MockCatalog) -> Self {
        // Establish the in-memory store off the test clock. Under
        // `#[tokio::test(start_paused = true)]` the auto-advancing clock races
        // sqlx-sqlite's blocking connect and trips the pool's acquire timeout
        // before the connection is ready. Building the store on a separate,
        // real-time runtime sidesteps that race. That runtime must outlive the
        // store: a `sqlite::memory:` database exists only as long as its sole
        // connection is open, so the bootstrap runtime is kept alive for the
        // whole test binary rather than dropped here.
        let store = tokio::task::spawn_blocking(|| bootstrap_runtime().block_on(Store::in_memory()))
            .await
            .expect("store bootstrap thread")
            .expect("in-memory store");
        let (events, _) = broadcast::channel(1024);
        Self {
            store,
            catalog: std::sync::Arc::new(catalog),
            events,
        }
    }

    pub fn sync(&self) -> SyncService {
        SyncService::new(self.store.clone(), self.catalog.clone())
    }

    pub fn refresh(&self) -> RefreshService {
        RefreshService::new(self.store.clone(), self.sync(), self.events.clone())
    }

    pub fn popularity(&self) -> PopularityService {
        PopularityService::new(self.store.clone(), self.events.clone())
    }

    pub fn import(&self, batch_size: usize, delay_secs: u64) -> BulkImportService {
        BulkImportService::new(
            self.catalog.clone(),
            self.sync(),
            self.events.clone(),
            BulkImportOptions {
                batch_size,
                batch_delay: Duration::from_secs(delay_secs),
            },
        )
    }

    /// Inserts a show directly into the store, bypassing the catalog.
    pub async fn seed_show(&self, id: i32, name: &str, status: &str) -> Show {
        let show = Show {
            id,
            name: name.to_string(),
            search_name: None,
            image: None,
            status: status.to_string(),
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
        };
        self.store.insert_show(&show).await.expect("seed show");
        show
    }
}
