//! Batch refresh orchestrator: drives the reconciliation engine over every
//! eligible show, sequentially, folding per-show outcomes into one summary.

use crate::db::Store;
use crate::domain::ShowId;
use crate::domain::events::NotificationEvent;
use crate::models::show::Show;
use crate::services::sync::{ShowSyncReport, SyncError, SyncService};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::HashSet;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// One failed show inside an otherwise surviving batch, with enough context
/// to retry just this show.
#[derive(Debug, Clone, Serialize)]
pub struct ShowFailure {
    pub show_id: i32,
    pub show_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshSummary {
    pub processed: usize,
    pub shows_updated: usize,
    pub episodes_added: usize,
    pub episodes_updated: usize,
    pub failures: Vec<ShowFailure>,
}

impl RefreshSummary {
    fn fold(&mut self, report: &ShowSyncReport) {
        if report.show_updated {
            self.shows_updated += 1;
        }
        self.episodes_added += report.episodes_added;
        self.episodes_updated += report.episodes_updated;
    }
}

#[derive(Clone)]
pub struct RefreshService {
    store: Store,
    sync: SyncService,
    events: broadcast::Sender<NotificationEvent>,
}

impl RefreshService {
    #[must_use]
    pub const fn new(
        store: Store,
        sync: SyncService,
        events: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self { store, sync, events }
    }

    /// Refreshes every eligible show. Intentionally sequential: the catalog
    /// has implicit rate limits, so throughput is traded for politeness.
    /// Only a store failure aborts the run; everything else is summarized.
    pub async fn refresh_all(&self) -> Result<RefreshSummary, DbErr> {
        let start = std::time::Instant::now();
        let eligible = self.eligible_shows().await?;

        info!(
            event = "batch_refresh_started",
            count = eligible.len(),
            "Refreshing shows"
        );
        let _ = self.events.send(NotificationEvent::BatchRefreshStarted {
            total: eligible.len(),
        });

        let mut summary = RefreshSummary::default();

        for show in &eligible {
            summary.processed += 1;
            let _ = self.events.send(NotificationEvent::RefreshStarted {
                show_id: show.id,
                name: show.name.clone(),
            });

            match self.sync.sync_show(show).await {
                Ok(report) => {
                    let _ = self.events.send(NotificationEvent::RefreshFinished {
                        show_id: show.id,
                        name: show.name.clone(),
                        updated: report.show_updated,
                    });
                    summary.fold(&report);
                }
                Err(SyncError::Store(err)) => return Err(err),
                Err(err) => {
                    warn!(
                        show_id = show.id,
                        name = %show.name,
                        error = %err,
                        "Show refresh failed, continuing with the rest"
                    );
                    summary.failures.push(ShowFailure {
                        show_id: show.id,
                        show_name: show.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            event = "batch_refresh_finished",
            processed = summary.processed,
            shows_updated = summary.shows_updated,
            episodes_added = summary.episodes_added,
            episodes_updated = summary.episodes_updated,
            failed = summary.failures.len(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Batch refresh complete"
        );
        let _ = self.events.send(NotificationEvent::BatchRefreshFinished {
            processed: summary.processed,
            failed: summary.failures.len(),
        });

        Ok(summary)
    }

    /// Refreshes a single show by id, outside of batch selection rules.
    pub async fn refresh_one(&self, id: ShowId) -> Result<ShowSyncReport, SyncError> {
        let show = self
            .store
            .get_show(id.value())
            .await?
            .ok_or(SyncError::UnknownShow(id))?;
        self.sync.sync_show(&show).await
    }

    /// Active shows minus the ignored set. Ignored is the union of per-user
    /// settings rows and the legacy per-show flag; dropping either source
    /// would silently re-include shows a user excluded long ago.
    async fn eligible_shows(&self) -> Result<Vec<Show>, DbErr> {
        let active = self.store.list_active_shows().await?;
        let settings_ignored: HashSet<i32> =
            self.store.list_ignored_show_ids().await?.into_iter().collect();

        Ok(active
            .into_iter()
            .filter(|show| !show.ignored && !settings_ignored.contains(&show.id))
            .collect())
    }
}
