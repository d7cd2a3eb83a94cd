//! In-memory model of the dashboard page.
//!
//! The page holds the regions a poll may update: the attack counter list
//! (`.list-group`), the chart image (`.card-body.text-center img`), the table
//! of flagged addresses, and the `ip_address` mitigation input. Any region may
//! be absent; updates to an absent region are skipped silently.
//!
//! ## Submodules
//!
//! - [`chart`]: Chart image source and PNG header inspection
//! - [`render`]: The [`Render`] capability and its implementation for [`Page`]
//! - [`table`]: IP table rows and load-time click binding
//!
//! ## Lifecycle
//!
//! ```text
//! load_page() ──▶ Page::load(snapshot)
//!                   ├──▶ render counters + chart
//!                   ├──▶ build IP table from malicious_ips
//!                   └──▶ bind row clicks (rows present now only)
//!
//! every tick  ──▶ Page::render(snapshot)  (counters + chart only)
//! ```

pub mod chart;
pub mod render;
pub mod table;

pub use chart::{ChartImage, ImageInfo};
pub use render::Render;
pub use table::{IpTable, TableRow};

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::source::{saturating_total, MetricsSnapshot};

/// Id of the mitigation input field.
pub const IP_INPUT_ID: &str = "ip_address";

/// A page shared between the poller task and the terminal loop.
pub type SharedPage = Arc<Mutex<Page>>;

/// One row of the counter list: attack type plus count badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterItem {
    pub label: String,
    pub count: u64,
}

impl CounterItem {
    /// Text shown in the badge.
    pub fn badge(&self) -> String {
        self.count.to_string()
    }
}

/// The attack counter list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CounterList {
    items: Vec<CounterItem>,
}

impl CounterList {
    pub fn items(&self) -> &[CounterItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Clear the list and add one row per attack type.
    pub fn replace(&mut self, stats: &BTreeMap<String, u64>) {
        self.items.clear();
        self.items.extend(stats.iter().map(|(label, count)| CounterItem {
            label: label.clone(),
            count: *count,
        }));
    }

    /// Sum of all counts, clamped at `u64::MAX`.
    pub fn total(&self) -> u64 {
        saturating_total(self.items.iter().map(|i| i.count))
    }

    /// Largest count in the list, used for scaling bars.
    pub fn max_count(&self) -> u64 {
        self.items.iter().map(|i| i.count).max().unwrap_or(0)
    }
}

/// A text input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub id: String,
    pub value: String,
}

impl InputField {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: String::new(),
        }
    }
}

/// The dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub counters: Option<CounterList>,
    pub chart: Option<ChartImage>,
    pub table: IpTable,
    pub ip_input: Option<InputField>,
}

impl Default for Page {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl Page {
    /// A page with every region present.
    pub fn dashboard() -> Self {
        Self {
            counters: Some(CounterList::default()),
            chart: Some(ChartImage::default()),
            table: IpTable::default(),
            ip_input: Some(InputField::new(IP_INPUT_ID)),
        }
    }

    /// A page with no regions at all.
    pub fn empty() -> Self {
        Self {
            counters: None,
            chart: None,
            table: IpTable::default(),
            ip_input: None,
        }
    }

    /// Remove the counter list region.
    pub fn without_counters(mut self) -> Self {
        self.counters = None;
        self
    }

    /// Remove the chart image region.
    pub fn without_chart(mut self) -> Self {
        self.chart = None;
        self
    }

    /// Remove the `ip_address` input.
    pub fn without_ip_input(mut self) -> Self {
        self.ip_input = None;
        self
    }

    /// Wrap the page for sharing with a poller.
    pub fn into_shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    /// Initialize the page as a fresh load would.
    ///
    /// Renders the snapshot (if the load fetch succeeded), rebuilds the IP
    /// table from its flagged addresses, and binds click handlers to the rows
    /// that exist now. Rows added later stay unbound. Without a snapshot every
    /// region is emptied, so nothing from an earlier load survives.
    pub fn load(&mut self, snapshot: Option<&MetricsSnapshot>) {
        self.table = IpTable::default();
        if let Some(input) = self.ip_input.as_mut() {
            input.value.clear();
        }

        match snapshot {
            Some(snapshot) => {
                self.render(snapshot);
                for entry in &snapshot.malicious_ips {
                    self.table.push_row(TableRow::from(entry));
                }
            }
            None => {
                if let Some(counters) = self.counters.as_mut() {
                    *counters = CounterList::default();
                }
                if let Some(chart) = self.chart.as_mut() {
                    *chart = ChartImage::default();
                }
            }
        }

        self.table.bind_click_handlers();
    }

    /// Handle a click on table row `index`.
    ///
    /// If the row had a handler bound at load time, its first cell is copied
    /// into the `ip_address` input. Returns the copied address.
    pub fn click_row(&mut self, index: usize) -> Option<String> {
        let ip = self.table.clicked_ip(index)?.to_string();
        let input = self.ip_input.as_mut()?;
        input.value = ip.clone();
        Some(ip)
    }

    /// Current value of the `ip_address` input, if present.
    pub fn ip_input_value(&self) -> Option<&str> {
        self.ip_input.as_ref().map(|i| i.value.as_str())
    }
}
