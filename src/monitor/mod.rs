//! Client table and refresh cycle
//!
//! A refresh pulls one snapshot from the controller session, formats every
//! record and reapplies the current sort. A failed fetch leaves the previous
//! rows in place and reports the cause through `RefreshStatus`.

pub mod polling;

use chrono::{DateTime, Local};
use log::{debug, Level};
use serde_json::json;
use std::fmt;
use std::time::SystemTime;

use crate::controller::Session;
use crate::format::build_row;
use crate::logging::log_event;
use crate::models::{ClientRecord, Column, FormattedRow, SortOrder};

pub use polling::run_refresh_loop;

/// Sortable table of formatted rows
#[derive(Debug, Clone)]
pub struct ClientTable {
    rows: Vec<FormattedRow>,
    sort_column: Column,
    order: SortOrder,
}

impl Default for ClientTable {
    fn default() -> Self {
        Self::new(Column::Uptime, SortOrder::Ascending)
    }
}

impl ClientTable {
    pub fn new(sort_column: Column, order: SortOrder) -> Self {
        Self {
            rows: Vec::new(),
            sort_column,
            order,
        }
    }

    /// Replaces every row with a freshly formatted snapshot
    pub fn populate(&mut self, clients: &[ClientRecord]) {
        self.rows = clients.iter().map(build_row).collect();
        self.apply_sort();
    }

    /// Changes the sort column/order and reorders the current rows
    pub fn sort_by(&mut self, column: Column, order: SortOrder) {
        self.sort_column = column;
        self.order = order;
        self.apply_sort();
    }

    pub fn rows(&self) -> &[FormattedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort_column(&self) -> Column {
        self.sort_column
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    // stable in both directions: equal keys keep snapshot order
    fn apply_sort(&mut self) {
        let column = self.sort_column;
        match self.order {
            SortOrder::Ascending => self.rows.sort_by(|a, b| a.cell(column).sort.cmp(&b.cell(column).sort)),
            SortOrder::Descending => self.rows.sort_by(|a, b| b.cell(column).sort.cmp(&a.cell(column).sort)),
        }
    }
}

/// Outcome of the most recent refresh
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshStatus {
    /// Nothing fetched yet
    Pending,
    Updated { at: SystemTime, count: usize },
    Failed(String),
}

impl RefreshStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, RefreshStatus::Failed(_))
    }
}

impl fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshStatus::Pending => f.write_str("Waiting for first refresh..."),
            RefreshStatus::Updated { at, count } => write!(
                f,
                "Last updated: {} ({} client{})",
                DateTime::<Local>::from(*at).format("%Y-%m-%d %H:%M:%S"),
                count,
                if *count == 1 { "" } else { "s" }
            ),
            RefreshStatus::Failed(cause) => write!(f, "Error refreshing data: {}", cause),
        }
    }
}

/// One refresh cycle: fetch, format, sort
pub fn refresh(session: &mut Session, table: &mut ClientTable) -> RefreshStatus {
    match session.list_site_clients() {
        Ok(clients) => {
            table.populate(&clients);
            let count = table.len();
            debug!("Refreshed {} clients, sorted by {} ({})", count, table.sort_column(), table.order());
            RefreshStatus::Updated { at: SystemTime::now(), count }
        }
        Err(e) => {
            log_event(
                Level::Warn,
                "Refresh failed",
                &json!({
                    "event": "refresh_failed",
                    "base_url": session.target().base_url,
                    "error": e.to_string(),
                    "kept_rows": table.len(),
                }),
            );
            RefreshStatus::Failed(e.to_string())
        }
    }
}
