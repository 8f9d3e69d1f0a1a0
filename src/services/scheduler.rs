//! Periodic alarm sync.
//!
//! A tokio interval drives the alarm; each tick locks the shared [`App`] on
//! the blocking pool because SQLite calls block. Ticks that fall behind are
//! delayed rather than bunched up.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::app::{lock_app, App};
use crate::types::settings::SyncSettings;
use crate::types::snapshot::SyncReason;

/// Longest alarm period, one year.
pub const MAX_INTERVAL_MINUTES: u64 = 365 * 24 * 60;

pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Period of `sync_interval_minutes`, between one minute and one year.
    pub fn from_settings(settings: &SyncSettings) -> Self {
        let minutes = settings.sync_interval_minutes.clamp(1, MAX_INTERVAL_MINUTES);
        Self::new(Duration::from_secs(minutes * 60))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts the alarm loop. The first sync happens one period after the call.
    pub fn spawn(&self, app: Arc<Mutex<App>>) -> JoinHandle<()> {
        let period = self.period;
        tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let app = Arc::clone(&app);
                match tokio::task::spawn_blocking(move || alarm_tick(&app)).await {
                    Ok(synced) => debug!("alarm tick done (synced: {})", synced),
                    Err(e) => error!("alarm sync task failed: {}", e),
                }
            }
        })
    }
}

/// Runs one alarm sync. Returns whether a snapshot was written.
pub fn alarm_tick(app: &Mutex<App>) -> bool {
    lock_app(app).run_sync(SyncReason::Alarm).is_some()
}
