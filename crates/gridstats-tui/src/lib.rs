// Library root: exposes the dashboard modules to the binary and to tests.

pub mod app;
pub mod config;
pub mod protocol;
pub mod tui;
