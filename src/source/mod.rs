//! Snapshot source abstraction.
//!
//! A source produces one [`MetricsSnapshot`] per fetch. The dashboard server is
//! reached over HTTP ([`HttpSource`]); a saved response body can be replayed
//! from disk ([`FileSource`]) when the server is not reachable.

mod file;
mod http;
mod snapshot;

pub use file::FileSource;
pub use http::{HttpSource, HttpSourceBuilder, DEFAULT_BASE_URL, DEFAULT_ENDPOINT};
pub use snapshot::{saturating_total, MaliciousIp, MetricsSnapshot};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::PollFailure;

/// Trait for fetching metrics snapshots from the dashboard.
///
/// # Example
///
/// ```no_run
/// use attackwatch::{HttpSource, SnapshotSource};
///
/// # tokio_test::block_on(async {
/// let source = HttpSource::builder().base_url("http://127.0.0.1:5000").build()?;
/// let snapshot = source.fetch().await?;
/// println!("{} attack types", snapshot.attack_stats.len());
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// # });
/// ```
#[async_trait]
pub trait SnapshotSource: Send + Sync + Debug {
    /// Fetch and parse one snapshot.
    async fn fetch(&self) -> Result<MetricsSnapshot, PollFailure>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}
