//! Periodic fetch-and-render of dashboard snapshots.
//!
//! [`DashboardPoller`] owns the refresh timer. Each tick launches an
//! independent poll: fetch a snapshot, render it on success, log on failure.
//! Polls are not de-duplicated, so a slow request can overlap the next one and
//! the last to finish wins.
//!
//! ```text
//! start() ──▶ timer task ──tick/trigger──▶ spawn poll ──▶ fetch ──ok──▶ render
//!                 ▲                                          │
//! stop() ─abort───┘ (in-flight polls are aborted too)        └─err─▶ error!()
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::PollFailure;
use crate::page::{Page, Render};
use crate::source::SnapshotSource;

/// Default refresh interval.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);

/// Counters describing past polls.
#[derive(Debug, Clone, Default)]
pub struct PollStats {
    /// Polls completed, successful or not.
    pub polls: u64,
    /// Polls that ended in a [`PollFailure`].
    pub failures: u64,
    /// When the last successful poll rendered.
    pub last_success: Option<Instant>,
    /// Message of the most recent failure. Kept for diagnostics only.
    pub last_failure: Option<String>,
}

/// Polls a [`SnapshotSource`] on a fixed interval and renders into `R`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use attackwatch::{DashboardPoller, HttpSource, Page};
///
/// # tokio_test::block_on(async {
/// let source = Arc::new(HttpSource::builder().build()?);
/// let page = Page::dashboard().into_shared();
///
/// let mut poller = DashboardPoller::new(source, page.clone());
/// poller.start();
/// // ... later
/// poller.stop();
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// # });
/// ```
pub struct DashboardPoller<R: Render + Send + 'static> {
    source: Arc<dyn SnapshotSource>,
    renderer: Arc<Mutex<R>>,
    period: Duration,
    stats: Arc<Mutex<PollStats>>,
    trigger: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl<R: Render + Send + 'static> DashboardPoller<R> {
    /// Create a stopped poller with the default 30 second interval.
    pub fn new(source: Arc<dyn SnapshotSource>, renderer: Arc<Mutex<R>>) -> Self {
        Self {
            source,
            renderer,
            period: DEFAULT_REFRESH,
            stats: Arc::new(Mutex::new(PollStats::default())),
            trigger: Arc::new(Notify::new()),
            task: None,
        }
    }

    /// Set the refresh interval. Takes effect on the next `start()`.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns a description of the polled source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Snapshot of the poll counters.
    pub fn stats(&self) -> PollStats {
        self.stats.lock().clone()
    }

    /// Handle to the counters, for readers outside the poller.
    pub fn stats_handle(&self) -> Arc<Mutex<PollStats>> {
        self.stats.clone()
    }

    /// Run one poll now on the caller's task.
    ///
    /// On failure the error is logged, the renderer is not touched, and the
    /// error is returned to the caller.
    pub async fn poll(&self) -> Result<(), PollFailure> {
        poll_once(self.source.as_ref(), &self.renderer, &self.stats).await
    }

    /// Start the refresh timer. The first tick fires one period from now.
    ///
    /// Must be called within a tokio runtime. Does nothing if already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let source = self.source.clone();
        let renderer = self.renderer.clone();
        let stats = self.stats.clone();
        let trigger = self.trigger.clone();
        let period = self.period;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Dropped with this task, which aborts any poll still in flight
            let mut in_flight = JoinSet::new();

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = trigger.notified() => {}
                    Some(_) = in_flight.join_next(), if !in_flight.is_empty() => continue,
                }

                let source = source.clone();
                let renderer = renderer.clone();
                let stats = stats.clone();
                in_flight.spawn(async move {
                    let _ = poll_once(source.as_ref(), &renderer, &stats).await;
                });
            }
        }));

        debug!(period = ?self.period, "poller started");
    }

    /// Stop the timer and abort in-flight polls.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Ask the running timer task to poll immediately.
    ///
    /// The interval is not reset. Returns false if the poller is stopped.
    /// At most one request is held: triggers made before the task wakes
    /// collapse into a single poll.
    pub fn trigger(&self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.trigger.notify_one();
        true
    }
}

impl<R: Render + Send + 'static> Drop for DashboardPoller<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_once<R: Render>(
    source: &dyn SnapshotSource,
    renderer: &Mutex<R>,
    stats: &Mutex<PollStats>,
) -> Result<(), PollFailure> {
    match source.fetch().await {
        Ok(snapshot) => {
            renderer.lock().render(&snapshot);

            let mut stats = stats.lock();
            stats.polls += 1;
            stats.last_success = Some(Instant::now());
            debug!(
                attack_types = snapshot.attack_stats.len(),
                total = snapshot.total_attacks(),
                "Dashboard data updated"
            );
            Ok(())
        }
        Err(e) => {
            {
                let mut stats = stats.lock();
                stats.polls += 1;
                stats.failures += 1;
                stats.last_failure = Some(e.to_string());
            }
            error!(error = %e, source = source.description(), "Error updating dashboard data");
            Err(e)
        }
    }
}

/// Load the page: fetch once, render, build the IP table and bind row clicks.
///
/// A failed fetch is logged and the page loads without data.
pub async fn load_page(source: &dyn SnapshotSource, page: &Mutex<Page>) -> Result<(), PollFailure> {
    let result = source.fetch().await;
    if let Err(ref e) = result {
        error!(error = %e, source = source.description(), "Error loading dashboard data");
    }

    page.lock().load(result.as_ref().ok());
    info!(source = source.description(), "Dashboard initialized");

    result.map(|_| ())
}
