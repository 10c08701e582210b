//! Popularity scoring: a deterministic score per show derived from watch
//! progress, follower signals, catalog rating and genre spread.

use crate::db::Store;
use crate::domain::events::NotificationEvent;
use crate::models::episode::Episode;
use crate::models::show::UserShowSettings;
use sea_orm::DbErr;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Signals feeding one show's score.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularityInputs {
    pub watched_episodes: usize,
    pub total_episodes: usize,
    pub followers: usize,
    pub non_ignored_followers: usize,
    pub rating: Option<f64>,
    pub genre_count: usize,
}

/// Pure scoring function, safe to rerun: identical inputs always produce the
/// identical rounded value.
///
/// Weighted parts: watch ratio (40%), follower count saturating at 20 (30%),
/// non-ignored follower ratio (30%), then a rating bonus of up to 10 and a
/// genre bonus capped at 10. Rounded to one decimal place.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn popularity_score(inputs: &PopularityInputs) -> f64 {
    let watch_pct = if inputs.total_episodes == 0 {
        0.0
    } else {
        inputs.watched_episodes as f64 / inputs.total_episodes as f64 * 100.0
    };
    let watch_score = watch_pct * 0.4;

    let user_score = (inputs.followers as f64 * 5.0).min(100.0) * 0.3;

    let ignored_ratio_pct = if inputs.followers == 0 {
        100.0
    } else {
        inputs.non_ignored_followers as f64 / inputs.followers as f64 * 100.0
    };
    let ignored_score = ignored_ratio_pct * 0.3;

    let mut score = watch_score + user_score + ignored_score;

    if let Some(rating) = inputs.rating {
        score += rating / 10.0 * 10.0;
    }

    if inputs.genre_count > 0 {
        score += (inputs.genre_count as f64 * 2.0).min(10.0);
    }

    (score * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Default)]
pub struct PopularityReport {
    pub shows: usize,
    pub changed: usize,
}

#[derive(Clone)]
pub struct PopularityService {
    store: Store,
    events: broadcast::Sender<NotificationEvent>,
}

impl PopularityService {
    #[must_use]
    pub const fn new(store: Store, events: broadcast::Sender<NotificationEvent>) -> Self {
        Self { store, events }
    }

    /// Recomputes and persists the score for every show. Reads only the
    /// store, groups rows in maps scoped to this invocation, and writes a
    /// show's score only when the rounded value moved.
    pub async fn recompute_all(&self) -> Result<PopularityReport, DbErr> {
        let shows = self.store.list_all_shows().await?;
        let episodes = self.store.list_all_episodes().await?;
        let settings = self.store.list_all_settings().await?;

        let mut episodes_by_show: HashMap<i32, Vec<Episode>> = HashMap::new();
        for episode in episodes {
            episodes_by_show.entry(episode.show_id).or_default().push(episode);
        }

        let mut settings_by_show: HashMap<i32, Vec<UserShowSettings>> = HashMap::new();
        for row in settings {
            settings_by_show.entry(row.show_id).or_default().push(row);
        }

        let mut report = PopularityReport {
            shows: shows.len(),
            changed: 0,
        };

        for show in shows {
            let show_episodes = episodes_by_show.get(&show.id).map_or(&[][..], Vec::as_slice);
            let show_settings = settings_by_show.get(&show.id).map_or(&[][..], Vec::as_slice);

            let inputs = PopularityInputs {
                watched_episodes: show_episodes.iter().filter(|e| e.watched).count(),
                total_episodes: show_episodes.len(),
                followers: show_settings.len(),
                non_ignored_followers: show_settings.iter().filter(|s| !s.ignored).count(),
                rating: show.rating.map(f64::from),
                genre_count: show.genres.len(),
            };

            #[allow(clippy::cast_possible_truncation)]
            let score = popularity_score(&inputs) as f32;

            if (score - show.popularity).abs() > f32::EPSILON {
                self.store.set_show_popularity(show.id, score).await?;
                report.changed += 1;
                debug!(show_id = show.id, score, "Popularity updated");
            }
        }

        info!(
            event = "popularity_recompute_finished",
            shows = report.shows,
            changed = report.changed,
            "Popularity recompute complete"
        );
        let _ = self.events.send(NotificationEvent::PopularityRecomputed {
            shows: report.shows,
            changed: report.changed,
        });

        Ok(report)
    }
}
