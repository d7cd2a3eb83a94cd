//! Rendering snapshots into a page.

use super::Page;
use crate::source::MetricsSnapshot;

/// Something a snapshot can be rendered into.
///
/// The poller only knows this capability, so polling can be tested without a
/// page and the page can be tested without a network.
pub trait Render {
    /// Apply a snapshot. Must not fail; absent targets are skipped.
    fn render(&mut self, snapshot: &MetricsSnapshot);
}

impl Render for Page {
    /// Repopulate the counter list and replace the chart source.
    ///
    /// The IP table is left alone; it only changes on page load.
    fn render(&mut self, snapshot: &MetricsSnapshot) {
        if let Some(counters) = self.counters.as_mut() {
            counters.replace(&snapshot.attack_stats);
        }

        if let Some(chart) = self.chart.as_mut() {
            chart.set_base64_png(&snapshot.attack_chart);
        }
    }
}
