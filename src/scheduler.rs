use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::state::AppState;

/// Daemon-mode driver: runs the batch refresh and the popularity recompute
/// on their configured cron cadences until asked to stop.
#[derive(Clone)]
pub struct Scheduler {
    state: Arc<AppState>,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            running: Arc::new(RwLock::new(true)),
        }
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    pub async fn run(&self) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let refresh_cron = self.state.config.scheduler.refresh_cron.clone();
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let refresh_job = Job::new_async(refresh_cron.as_str(), move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                match state.refresh_service().refresh_all().await {
                    Ok(summary) => {
                        if !summary.failures.is_empty() {
                            info!(
                                failed = summary.failures.len(),
                                "Scheduled refresh finished with failures"
                            );
                        }
                    }
                    Err(e) => error!("Scheduled refresh aborted: {}", e),
                }
            })
        })?;

        let popularity_cron = self.state.config.scheduler.popularity_cron.clone();
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let popularity_job = Job::new_async(popularity_cron.as_str(), move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                if let Err(e) = state.popularity_service().recompute_all().await {
                    error!("Scheduled popularity recompute failed: {}", e);
                }
            })
        })?;

        sched.add(refresh_job).await?;
        sched.add(popularity_job).await?;
        sched.start().await?;

        info!(
            refresh_cron = %refresh_cron,
            popularity_cron = %popularity_cron,
            "Scheduler running"
        );

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }
}
