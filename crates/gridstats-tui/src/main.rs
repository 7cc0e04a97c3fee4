// Gridstats dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the remote and local record sources
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use gridstats_core::fetch::{HttpSource, LocalSource, RecordSource};
use gridstats_tui::app;
use gridstats_tui::config;
use gridstats_tui::tui;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Gridstats starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: source={}, local_dir={}",
        config.source.base_url,
        config.source.local_dir.display()
    );

    let remote: Arc<dyn RecordSource> = Arc::new(
        HttpSource::new(&config.source.base_url, config.source.timeout())
            .context("failed to build HTTP client")?,
    );
    let local: Arc<dyn RecordSource> = Arc::new(LocalSource::new(config.source.local_dir.clone()));

    let (event_tx, event_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let selection = config.view.selection();
    let app_state = app::AppState::new(
        selection,
        config.leaders.year,
        remote,
        local,
        event_tx,
    );

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, event_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    let dashboard = tui::DashboardState::new(
        selection,
        config.view.view_state(),
        config.source.local_dir.display().to_string(),
    );
    if let Err(e) = tui::run(ui_rx, cmd_tx, dashboard).await {
        error!("TUI error: {}", e);
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Gridstats shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridstats.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("gridstats_core=info,gridstats_tui=info,gridstats=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// Platform data directory, or `./logs` when none can be determined.
fn log_dir() -> anyhow::Result<PathBuf> {
    match directories::ProjectDirs::from("", "", "gridstats") {
        Some(dirs) => Ok(dirs.data_local_dir().join("logs")),
        None => Ok(std::env::current_dir()?.join("logs")),
    }
}
