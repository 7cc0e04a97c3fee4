// Messages between the app orchestrator and the TUI.

use std::sync::Arc;

use gridstats_core::catalog::{Category, Selection};
use gridstats_core::leaders::LeaderCard;
use gridstats_core::loader::StatTable;

/// Requests from the TUI to the app orchestrator. Sorting, searching and
/// filtering stay in the TUI; these are the actions that need a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SelectCategory(Category),
    ToggleSeason,
    NextYear,
    /// Fetch the current selection again from the configured server.
    Retry,
    /// Read the current selection from the local directory instead.
    LoadLocal,
    Quit,
}

/// Where a table was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Local,
}

impl Origin {
    pub fn label(self) -> &'static str {
        match self {
            Origin::Remote => "server",
            Origin::Local => "local",
        }
    }
}

/// The table for the current selection. Exactly one state at a time: a
/// failed load never sits beside partial records.
#[derive(Debug, Clone)]
pub enum TableStatus {
    Loading,
    Ready { table: Arc<StatTable>, origin: Origin },
    Unavailable { resource: String, message: String },
}

impl TableStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, TableStatus::Ready { .. })
    }
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// The selection changed or a reload started.
    Table {
        selection: Selection,
        status: TableStatus,
    },
    Leaders(Vec<LeaderCard>),
    Availability { available: usize, total: usize },
}
