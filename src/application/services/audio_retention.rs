use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;

use crate::application::ports::{StagingStore, StagingStoreError};

/// Periodically deletes generated audio older than a fixed age.
pub struct AudioRetentionSweeper {
    store: Arc<dyn StagingStore>,
    max_age: TimeDelta,
    interval: Duration,
}

impl AudioRetentionSweeper {
    pub fn new(store: Arc<dyn StagingStore>, max_age: Duration, interval: Duration) -> Self {
        Self {
            store,
            max_age: TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX),
            interval,
        }
    }

    /// Deletes every object last modified before `now - max_age`. Returns how
    /// many were removed.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<usize, StagingStoreError> {
        let Some(cutoff) = now.checked_sub_signed(self.max_age) else {
            return Ok(0);
        };

        let mut removed = 0;
        for object in self.store.list().await? {
            if object.last_modified >= cutoff {
                continue;
            }
            match self.store.delete(&object.path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(error = %e, path = %object.path, "Failed to expire audio file");
                }
            }
        }

        Ok(removed)
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            max_age_secs = self.max_age.num_seconds(),
            interval_secs = self.interval.as_secs(),
            "Audio retention sweeper started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.sweep_once(Utc::now()).await {
                        Ok(0) => {}
                        Ok(removed) => tracing::info!(removed, "Expired audio files removed"),
                        Err(e) => tracing::error!(error = %e, "Audio retention sweep failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Audio retention sweeper stopped");
    }
}
