//! Revocation-marker sweeper
//!
//! A revocation marker only matters while the token it blocks could still
//! be alive; the lookup already ignores older markers, and this task
//! physically deletes them so the set never grows past one validity window
//! of logouts.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::storage::Storage;

/// Start the background sweeper task.
pub fn start_revocation_cleaner(storage: Arc<dyn Storage>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval_timer = tokio::time::interval(interval);

        loop {
            interval_timer.tick().await;

            match storage.purge_expired_tokens(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => debug!(purged = count, "Expired revocation markers removed"),
                Err(e) => error!(error = %e, "Failed to purge expired revocation markers"),
            }
        }
    })
}
