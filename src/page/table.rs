//! The table of flagged addresses.
//!
//! Click handlers are attached once, at page load, to the rows present at that
//! moment. Rows pushed afterwards have no handler and ignore clicks.

use serde::Serialize;

use crate::source::MaliciousIp;

/// One table row. The first cell holds the IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    #[serde(skip)]
    click_bound: bool,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            click_bound: false,
        }
    }

    /// Text of the first cell, with surrounding whitespace trimmed.
    pub fn first_cell(&self) -> Option<&str> {
        self.cells.first().map(|c| c.trim())
    }

    /// Whether a click handler was attached to this row.
    pub fn is_click_bound(&self) -> bool {
        self.click_bound
    }
}

impl From<&MaliciousIp> for TableRow {
    fn from(entry: &MaliciousIp) -> Self {
        Self::new(vec![
            entry.ip.clone(),
            entry.threat_level.clone(),
            entry.first_detected.clone(),
            entry.attack_type.clone(),
        ])
    }
}

/// Rows of the IP table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpTable {
    rows: Vec<TableRow>,
}

impl IpTable {
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. It has no click handler.
    pub fn push_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Attach click handlers to every row currently in the table.
    pub fn bind_click_handlers(&mut self) {
        for row in &mut self.rows {
            row.click_bound = true;
        }
    }

    /// The address a click on row `index` yields, if that row has a handler.
    pub fn clicked_ip(&self, index: usize) -> Option<&str> {
        let row = self.rows.get(index)?;
        if !row.click_bound {
            return None;
        }
        row.first_cell()
    }
}
