//! Application state for the terminal front end.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use parking_lot::MutexGuard;
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::PollFailure;
use crate::page::{Page, SharedPage};
use crate::poller::{load_page, DashboardPoller, PollStats};
use crate::source::SnapshotSource;
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Keystrokes go to the `ip_address` input while set.
    pub editing_input: bool,

    page: SharedPage,
    poller: DashboardPoller<Page>,
    source: Arc<dyn SnapshotSource>,
    runtime: Handle,
    /// Page reload running on the runtime, applied by `poll_reload`.
    reload: Option<JoinHandle<Result<(), PollFailure>>>,

    // Table navigation
    pub selected_row: usize,
    pub table_state: TableState,
    /// Where the IP table was last drawn, for mouse hit-testing.
    pub table_area: Rect,

    /// When the page last loaded with data.
    loaded_at: Option<Instant>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the app around a loaded page and its poller.
    ///
    /// `runtime` runs page reloads; the poller should already be started on it.
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        page: SharedPage,
        poller: DashboardPoller<Page>,
        runtime: Handle,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            show_help: false,
            editing_input: false,
            page,
            poller,
            source,
            runtime,
            reload: None,
            selected_row: 0,
            table_state: TableState::default(),
            table_area: Rect::default(),
            loaded_at: None,
            theme,
            status_message: None,
        }
    }

    /// Lock the page for reading or editing.
    pub fn page(&self) -> MutexGuard<'_, Page> {
        self.page.lock()
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn stats(&self) -> PollStats {
        self.poller.stats()
    }

    pub fn refresh_period(&self) -> Duration {
        self.poller.period()
    }

    /// Record a successful page load done before the app was created.
    pub fn mark_loaded(&mut self) {
        self.loaded_at = Some(Instant::now());
    }

    /// Time of the most recent successful page load or poll.
    pub fn last_updated(&self) -> Option<Instant> {
        let polled = self.poller.stats().last_success.map(|i| i.into_std());
        polled.max(self.loaded_at)
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    fn row_count(&self) -> usize {
        self.page.lock().table.len()
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_next_n(&mut self, n: usize) {
        let max = self.row_count().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.row_count().saturating_sub(1);
    }

    /// Click the selected table row.
    pub fn click_selected_row(&mut self) {
        self.click_row(self.selected_row);
    }

    /// Click table row `index`, copying its address into the input if the
    /// row has a handler.
    pub fn click_row(&mut self, index: usize) {
        if index >= self.row_count() {
            return;
        }
        self.selected_row = index;

        let copied = self.page.lock().click_row(index);
        if let Some(ip) = copied {
            self.set_status_message(format!("Copied {} to ip_address", ip));
        }
    }

    /// Start editing the `ip_address` input, if the page has one.
    pub fn start_input(&mut self) {
        if self.page.lock().ip_input.is_some() {
            self.editing_input = true;
        }
    }

    /// Stop editing, keeping the typed value.
    pub fn finish_input(&mut self) {
        self.editing_input = false;
    }

    pub fn input_push(&mut self, c: char) {
        if let Some(input) = self.page.lock().ip_input.as_mut() {
            input.value.push(c);
        }
    }

    pub fn input_pop(&mut self) {
        if let Some(input) = self.page.lock().ip_input.as_mut() {
            input.value.pop();
        }
    }

    pub fn input_clear(&mut self) {
        if let Some(input) = self.page.lock().ip_input.as_mut() {
            input.value.clear();
        }
    }

    /// Ask the poller for an immediate poll.
    pub fn refresh_now(&mut self) {
        if self.poller.trigger() {
            self.set_status_message("Refreshing...".to_string());
        }
    }

    /// Start reloading the page: fetch, rebuild the IP table, rebind row clicks.
    ///
    /// Returns at once. The fetch runs on the runtime and [`App::poll_reload`]
    /// picks up the outcome. Ignored while a reload is already running.
    pub fn reload_page(&mut self) {
        if self.is_reloading() {
            self.set_status_message("Reload already in progress".to_string());
            return;
        }

        let source = self.source.clone();
        let page = self.page.clone();
        self.reload = Some(
            self.runtime
                .spawn(async move { load_page(source.as_ref(), &page).await }),
        );
        self.editing_input = false;
        self.set_status_message("Reloading...".to_string());
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    /// Apply a finished reload. Called once per frame; does nothing while the
    /// fetch is still running.
    pub fn poll_reload(&mut self) {
        if !self.reload.as_ref().is_some_and(|r| r.is_finished()) {
            return;
        }
        let Some(reload) = self.reload.take() else {
            return;
        };

        // Finished, so this does not wait
        let loaded = matches!(self.runtime.block_on(reload), Ok(Ok(())));

        self.selected_row = 0;
        self.table_state = TableState::default();

        if loaded {
            self.mark_loaded();
            self.set_status_message("Page reloaded".to_string());
        } else {
            self.set_status_message("Page reloaded without data".to_string());
        }
    }

    /// Block until a running reload has been applied. Test helper.
    #[cfg(test)]
    pub(crate) fn wait_for_reload(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.is_reloading() && Instant::now() < deadline {
            self.poll_reload();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit. A running reload is abandoned.
    pub fn quit(&mut self) {
        self.running = false;
        if let Some(reload) = self.reload.take() {
            reload.abort();
        }
    }

    /// Export the current page to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let json = export_json(&self.page.lock())?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Serialize a page for export.
pub fn export_json(page: &Page) -> Result<String> {
    let mut export = serde_json::Map::new();

    let total = page.counters.as_ref().map(|c| c.total()).unwrap_or(0);
    export.insert(
        "summary".to_string(),
        serde_json::json!({
            "attack_types": page.counters.as_ref().map(|c| c.len()).unwrap_or(0),
            "total_attacks": total,
            "flagged_ips": page.table.len(),
        }),
    );
    export.insert("page".to_string(), serde_json::to_value(page)?);

    Ok(serde_json::to_string_pretty(&serde_json::Value::Object(
        export,
    ))?)
}
