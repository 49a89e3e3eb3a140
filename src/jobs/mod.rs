//! Long-running price-update job poller
//!
//! The admin "update all prices" action starts a server-side job and polls
//! its status on a fixed interval until terminal. The poller is an explicit
//! state machine owning exactly one background task; starting while a run
//! is underway is ignored, and a terminal status stops the interval with no
//! further requests.

use crate::api::types::JobStatus;
use crate::api::ApiClient;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Observable poller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Idle,
    /// Start request in flight.
    Starting,
    /// Polling the given job id.
    Polling { job_id: String },
    Done,
    Failed { message: String },
}

impl JobState {
    pub fn is_busy(&self) -> bool {
        matches!(self, JobState::Starting | JobState::Polling { .. })
    }
}

pub struct PriceUpdateJob {
    api: ApiClient,
    state: Arc<RwLock<JobState>>,
    task: Mutex<Option<JoinHandle<()>>>,
    interval: Duration,
}

impl PriceUpdateJob {
    pub fn new(api: ApiClient) -> Self {
        Self::with_interval(api, POLL_INTERVAL)
    }

    /// Interval override for tests.
    pub fn with_interval(api: ApiClient, interval: Duration) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(JobState::Idle)),
            task: Mutex::new(None),
            interval,
        }
    }

    pub fn state(&self) -> JobState {
        self.state.read().clone()
    }

    /// Kick off a run. Reentrant-safe: ignored while a run is starting or
    /// polling. A start-request failure goes straight to `Failed`.
    pub fn start(&self) {
        {
            let mut state = self.state.write();
            if state.is_busy() {
                debug!("price update already running, ignoring start");
                return;
            }
            *state = JobState::Starting;
        }

        let api = self.api.clone();
        let state = Arc::clone(&self.state);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let job_id = match api.start_fetch_all().await {
                Ok(handle) => handle.job_id,
                Err(err) => {
                    warn!("failed to start price update: {}", err);
                    *state.write() = JobState::Failed {
                        message: err.to_string(),
                    };
                    return;
                }
            };

            info!(%job_id, "price update started");
            *state.write() = JobState::Polling {
                job_id: job_id.clone(),
            };

            loop {
                tokio::time::sleep(interval).await;

                match api.fetch_all_status(&job_id).await {
                    Ok(JobStatus::Done) => {
                        info!(%job_id, "price update finished");
                        *state.write() = JobState::Done;
                        return;
                    }
                    Ok(JobStatus::Failed) => {
                        warn!(%job_id, "price update failed");
                        *state.write() = JobState::Failed {
                            message: "price update job failed".into(),
                        };
                        return;
                    }
                    Ok(_) => {}
                    // A transient poll failure counts as non-terminal.
                    Err(err) => warn!(%job_id, "status poll failed, will retry: {}", err),
                }
            }
        });

        *self.task.lock() = Some(handle);
    }

    /// Deterministic teardown: abort the task (if any) and return to idle.
    pub fn cancel(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        *self.state.write() = JobState::Idle;
    }
}

impl Drop for PriceUpdateJob {
    fn drop(&mut self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}
