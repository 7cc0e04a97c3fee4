// TUI widget modules for each dashboard panel.

pub mod leaders;
pub mod stats_table;
pub mod status_bar;
