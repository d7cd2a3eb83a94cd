//! # attackwatch
//!
//! A terminal dashboard and library for watching attack metrics served by a
//! monitoring endpoint.
//!
//! The server exposes `GET /update_data`, returning per-attack-type counts
//! and a base64 PNG chart. attackwatch loads the page once, then refreshes the
//! counters and chart on a fixed interval. Failed refreshes are logged and
//! leave the page as it was.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │  app    │───▶│   page   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │ (regions)│    │(drawing)│    │          │  │
//! │  └────┬────┘    └────▲─────┘    └─────────┘    └──────────┘  │
//! │       │              │ Render                                │
//! │       ▼              │                                       │
//! │  ┌─────────┐    ┌────┴─────┐                                 │
//! │  │ poller  │───▶│  source  │◀── HttpSource | FileSource      │
//! │  │ (timer) │    │ (fetch)  │                                 │
//! │  └─────────┘    └──────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: The [`SnapshotSource`] trait and its HTTP and file
//!   implementations, plus the [`MetricsSnapshot`] wire type
//! - **[`page`]**: The dashboard document ([`Page`]) and the [`Render`] trait
//!   that applies a snapshot to it
//! - **[`poller`]**: [`DashboardPoller`], the start/stop refresh timer, and
//!   [`load_page`] for the one-time page load
//! - **[`app`]**, **[`events`]**, **[`ui`]**: The terminal front end
//! - **[`config`]**, **[`logging`]**: Settings and diagnostics
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the local dashboard server
//! attackwatch --url http://127.0.0.1:5000
//!
//! # Print one snapshot as JSON and exit
//! attackwatch --once
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use attackwatch::{load_page, DashboardPoller, HttpSource, Page, SnapshotSource};
//!
//! # tokio_test::block_on(async {
//! let source: Arc<dyn SnapshotSource> = Arc::new(
//!     HttpSource::builder()
//!         .base_url("http://127.0.0.1:5000")
//!         .build()?,
//! );
//! let page = Page::dashboard().into_shared();
//!
//! // Initial data and row click bindings
//! let _ = load_page(source.as_ref(), &page).await;
//!
//! let mut poller = DashboardPoller::new(source, page.clone());
//! poller.start();
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! # });
//! ```

pub mod app;
pub mod config;
pub mod duration;
pub mod error;
pub mod events;
pub mod logging;
pub mod page;
pub mod poller;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use error::PollFailure;
pub use page::{Page, Render, SharedPage};
pub use poller::{load_page, DashboardPoller, PollStats};
pub use source::{FileSource, HttpSource, MaliciousIp, MetricsSnapshot, SnapshotSource};
