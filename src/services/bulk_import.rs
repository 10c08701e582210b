//! Bulk import pipeline: resolves free-text show names against the catalog
//! in rate-limited batches, then inserts confirmed shows through the
//! reconciliation engine's creation path.

use crate::clients::{CatalogClient, CatalogShow};
use crate::constants::import;
use crate::domain::ShowId;
use crate::domain::events::{NotificationEvent, ResolutionKind};
use crate::models::show::Show;
use crate::services::refresh::ShowFailure;
use crate::services::sync::{SyncError, SyncService};
use sea_orm::{DbErr, SqlErr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct BulkImportOptions {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for BulkImportOptions {
    fn default() -> Self {
        Self {
            batch_size: import::DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_secs(import::DEFAULT_BATCH_DELAY_SECS),
        }
    }
}

/// A name that matched a catalog show, still carrying the literal search
/// name so results trace back to the source row.
#[derive(Debug, Clone)]
pub struct ResolvedName {
    pub search_name: String,
    pub show: CatalogShow,
}

/// Terminal state of one input name.
#[derive(Debug, Clone)]
pub enum NameResolution {
    Found(ResolvedName),
    NotFound { search_name: String },
    Cancelled { search_name: String },
}

impl NameResolution {
    #[must_use]
    pub const fn kind(&self) -> ResolutionKind {
        match self {
            Self::Found(_) => ResolutionKind::Found,
            Self::NotFound { .. } => ResolutionKind::NotFound,
            Self::Cancelled { .. } => ResolutionKind::Cancelled,
        }
    }

    #[must_use]
    pub fn search_name(&self) -> &str {
        match self {
            Self::Found(resolved) => &resolved.search_name,
            Self::NotFound { search_name } | Self::Cancelled { search_name } => search_name,
        }
    }
}

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub added: Vec<Show>,
    pub failures: Vec<ShowFailure>,
}

#[derive(Clone)]
pub struct BulkImportService {
    catalog: Arc<dyn CatalogClient>,
    sync: SyncService,
    events: broadcast::Sender<NotificationEvent>,
    options: BulkImportOptions,
}

impl BulkImportService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        sync: SyncService,
        events: broadcast::Sender<NotificationEvent>,
        options: BulkImportOptions,
    ) -> Self {
        Self {
            catalog,
            sync,
            events,
            options,
        }
    }

    /// Resolves every name, in input order, batch by batch. The token is
    /// checked before each catalog call and before each countdown tick;
    /// once cancelled no further calls go out and every unresolved name is
    /// tagged [`NameResolution::Cancelled`].
    pub async fn resolve_names(
        &self,
        names: &[String],
        cancel: &CancellationToken,
    ) -> Vec<NameResolution> {
        let mut results: Vec<NameResolution> = Vec::with_capacity(names.len());

        let batch_size = self.options.batch_size.max(1);
        let total_batches = names.len().div_ceil(batch_size);

        'batches: for (index, batch) in names.chunks(batch_size).enumerate() {
            let _ = self.events.send(NotificationEvent::ImportBatchStarted {
                batch: index + 1,
                total_batches,
            });

            for name in batch {
                if cancel.is_cancelled() {
                    break 'batches;
                }

                let resolution = self.resolve_one(name).await;

                // A request that was in flight when the signal arrived is
                // allowed to finish, but its result is discarded.
                if cancel.is_cancelled() {
                    break 'batches;
                }

                let _ = self.events.send(NotificationEvent::ImportNameResolved {
                    search_name: name.clone(),
                    outcome: resolution.kind(),
                });
                results.push(resolution);
            }

            let is_last = index + 1 == total_batches;
            if !is_last && !self.wait_between_batches(cancel).await {
                break 'batches;
            }
        }

        for name in names.iter().skip(results.len()) {
            results.push(NameResolution::Cancelled {
                search_name: name.clone(),
            });
        }

        let found = results
            .iter()
            .filter(|r| matches!(r, NameResolution::Found(_)))
            .count();
        let cancelled = results
            .iter()
            .filter(|r| matches!(r, NameResolution::Cancelled { .. }))
            .count();
        let not_found = results.len() - found - cancelled;

        info!(
            event = "import_resolve_finished",
            total = results.len(),
            found,
            not_found,
            cancelled,
            "Name resolution complete"
        );
        let _ = self.events.send(NotificationEvent::ImportResolveFinished {
            found,
            not_found,
            cancelled,
        });

        results
    }

    /// One name against the catalog. Numeric-looking names go through the
    /// id lookup first and fall back to a name search on a miss. The first
    /// search hit is the candidate; a catalog error counts as not-found so
    /// the batch keeps going.
    async fn resolve_one(&self, name: &str) -> NameResolution {
        let query = name.trim();

        if let Some(id) = numeric_id(query) {
            match self.catalog.get_show(id).await {
                Ok(Some(show)) => {
                    return NameResolution::Found(ResolvedName {
                        search_name: name.to_string(),
                        show,
                    });
                }
                Ok(None) => {
                    debug!(id, "No show behind numeric name, trying name search");
                }
                Err(err) => {
                    warn!(id, error = %err, "Catalog id lookup failed");
                    return NameResolution::NotFound {
                        search_name: name.to_string(),
                    };
                }
            }
        }

        match self.catalog.search_shows(query).await {
            Ok(hits) => hits.into_iter().next().map_or_else(
                || NameResolution::NotFound {
                    search_name: name.to_string(),
                },
                |hit| {
                    NameResolution::Found(ResolvedName {
                        search_name: name.to_string(),
                        show: hit.show,
                    })
                },
            ),
            Err(err) => {
                warn!(search_name = name, error = %err, "Catalog search failed");
                NameResolution::NotFound {
                    search_name: name.to_string(),
                }
            }
        }
    }

    /// Inter-batch delay decomposed into one-second ticks so consumers can
    /// render a countdown. Returns `false` when cancelled mid-wait.
    async fn wait_between_batches(&self, cancel: &CancellationToken) -> bool {
        let mut remaining = self.options.batch_delay.as_secs();

        while remaining > 0 {
            if cancel.is_cancelled() {
                return false;
            }

            let _ = self.events.send(NotificationEvent::ImportCountdownTick {
                seconds_left: remaining,
            });

            tokio::select! {
                () = cancel.cancelled() => return false,
                () = tokio::time::sleep(Duration::from_secs(1)) => {}
            }

            remaining -= 1;
        }

        !cancel.is_cancelled()
    }

    /// Inserts the confirmed subset one show at a time via the creation
    /// path. A show already tracked, or failing catalog-side, lands in the
    /// failure list; only an unavailable store aborts the run.
    pub async fn import_confirmed(
        &self,
        selections: &[ResolvedName],
    ) -> Result<ImportSummary, DbErr> {
        let _ = self.events.send(NotificationEvent::ImportStarted {
            count: selections.len(),
        });

        let mut summary = ImportSummary::default();

        for selection in selections {
            match self
                .sync
                .add_show_by_id(ShowId::new(selection.show.id), Some(&selection.search_name))
                .await
            {
                Ok(show) => summary.added.push(show),
                Err(SyncError::Store(err)) => {
                    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                        summary.failures.push(ShowFailure {
                            show_id: selection.show.id,
                            show_name: selection.show.name.clone(),
                            error: "already tracked".to_string(),
                        });
                    } else {
                        return Err(err);
                    }
                }
                Err(err) => {
                    warn!(
                        show_id = selection.show.id,
                        name = %selection.show.name,
                        error = %err,
                        "Confirmed show failed to import"
                    );
                    summary.failures.push(ShowFailure {
                        show_id: selection.show.id,
                        show_name: selection.show.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            event = "import_finished",
            added = summary.added.len(),
            failed = summary.failures.len(),
            "Bulk import complete"
        );
        let _ = self.events.send(NotificationEvent::ImportFinished {
            added: summary.added.len(),
            failed: summary.failures.len(),
        });

        Ok(summary)
    }
}

fn numeric_id(name: &str) -> Option<i32> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
