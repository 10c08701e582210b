//! Domain events for the application.
//!
//! Sent over the broadcast event bus so consumers (CLI progress rendering,
//! future push channels) can observe refresh and import runs as they happen.

use serde::Serialize;

/// How a single import name resolved against the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionKind {
    Found,
    NotFound,
    Cancelled,
}

/// Events emitted while the engines run.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    RefreshStarted {
        show_id: i32,
        name: String,
    },
    RefreshFinished {
        show_id: i32,
        name: String,
        updated: bool,
    },

    BatchRefreshStarted {
        total: usize,
    },
    BatchRefreshFinished {
        processed: usize,
        failed: usize,
    },

    ImportBatchStarted {
        batch: usize,
        total_batches: usize,
    },
    ImportNameResolved {
        search_name: String,
        outcome: ResolutionKind,
    },
    ImportCountdownTick {
        seconds_left: u64,
    },
    ImportResolveFinished {
        found: usize,
        not_found: usize,
        cancelled: usize,
    },

    ImportStarted {
        count: usize,
    },
    ImportFinished {
        added: usize,
        failed: usize,
    },

    PopularityRecomputed {
        shows: usize,
        changed: usize,
    },
}
