// Application state and orchestration logic.
//
// Owns the current selection and its table. Every fetch runs in a spawned
// task and reports back over `event_tx` tagged with the generation it was
// started under; anything older than the newest request is dropped, so a
// slow response can never overwrite a newer selection.

use std::sync::Arc;

use gridstats_core::catalog::{all_descriptors, DataFileDescriptor, Selection};
use gridstats_core::error::LoadError;
use gridstats_core::fetch::RecordSource;
use gridstats_core::leaders::{load_leaders, LeaderCard};
use gridstats_core::loader::{load_table, probe_availability, StatTable};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::protocol::{Origin, TableStatus, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Events from spawned tasks
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum AppEvent {
    TableLoaded {
        generation: u64,
        origin: Origin,
        result: Result<StatTable, LoadError>,
    },
    LeadersLoaded(Vec<LeaderCard>),
    AvailabilityProbed(Vec<(DataFileDescriptor, bool)>),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub selection: Selection,
    pub table: TableStatus,
    pub leaders_year: u16,
    /// Identifies the newest table request. Incremented on every request;
    /// `TableLoaded` events carrying another value are discarded.
    pub generation: u64,
    remote: Arc<dyn RecordSource>,
    local: Arc<dyn RecordSource>,
    event_tx: mpsc::Sender<AppEvent>,
    current_load: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(
        selection: Selection,
        leaders_year: u16,
        remote: Arc<dyn RecordSource>,
        local: Arc<dyn RecordSource>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        AppState {
            selection,
            table: TableStatus::Loading,
            leaders_year,
            generation: 0,
            remote,
            local,
            event_tx,
            current_load: None,
        }
    }

    fn source(&self, origin: Origin) -> Arc<dyn RecordSource> {
        match origin {
            Origin::Remote => Arc::clone(&self.remote),
            Origin::Local => Arc::clone(&self.local),
        }
    }

    /// Abort the in-flight table load, if any. Its result would be stale
    /// anyway; aborting just saves the work.
    pub fn cancel_load(&mut self) {
        if let Some(handle) = self.current_load.take() {
            handle.abort();
        }
    }

    /// Start loading the current selection from `origin`. The table goes to
    /// `Loading` immediately. Returns the new generation.
    pub fn request_table(&mut self, origin: Origin) -> u64 {
        self.cancel_load();
        self.generation += 1;
        let generation = self.generation;

        let Some(descriptor) = self.selection.descriptor() else {
            warn!("No export for {:?}", self.selection);
            self.table = TableStatus::Unavailable {
                resource: format!("{:?}", self.selection),
                message: "no such export".to_string(),
            };
            return generation;
        };

        self.table = TableStatus::Loading;
        info!(
            "Loading {} from {} (gen: {})",
            descriptor.display_name,
            origin.label(),
            generation
        );

        let source = self.source(origin);
        let tx = self.event_tx.clone();
        self.current_load = Some(tokio::spawn(async move {
            let result = load_table(source.as_ref(), &descriptor).await;
            let _ = tx
                .send(AppEvent::TableLoaded {
                    generation,
                    origin,
                    result,
                })
                .await;
        }));
        generation
    }

    /// Fetch the leader cards in the background.
    pub fn spawn_leaders(&self) {
        let source = Arc::clone(&self.remote);
        let tx = self.event_tx.clone();
        let year = self.leaders_year;
        tokio::spawn(async move {
            let cards = load_leaders(source.as_ref(), year).await;
            let _ = tx.send(AppEvent::LeadersLoaded(cards)).await;
        });
    }

    /// Probe every catalog entry in the background.
    pub fn spawn_probe(&self) {
        let source = Arc::clone(&self.remote);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let results = probe_availability(source.as_ref(), &all_descriptors()).await;
            let _ = tx.send(AppEvent::AvailabilityProbed(results)).await;
        });
    }

    /// The current table state as a UI update.
    pub fn table_update(&self) -> UiUpdate {
        UiUpdate::Table {
            selection: self.selection,
            status: self.table.clone(),
        }
    }

    /// Apply a user command. Returns the update to push, if any.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Option<UiUpdate> {
        let origin = match cmd {
            UserCommand::SelectCategory(category) => {
                if category == self.selection.category {
                    return None;
                }
                self.selection.category = category;
                Origin::Remote
            }
            UserCommand::ToggleSeason => {
                self.selection.season = self.selection.season.toggled();
                Origin::Remote
            }
            UserCommand::NextYear => {
                self.selection = self.selection.with_next_year();
                Origin::Remote
            }
            UserCommand::Retry => {
                // Leaders and availability also come from the server.
                self.spawn_leaders();
                self.spawn_probe();
                Origin::Remote
            }
            UserCommand::LoadLocal => Origin::Local,
            // Handled in the main loop
            UserCommand::Quit => return None,
        };
        self.request_table(origin);
        Some(self.table_update())
    }

    /// Apply an event from a spawned task. Returns the update to push, if
    /// any; stale table results produce none.
    pub fn handle_event(&mut self, event: AppEvent) -> Option<UiUpdate> {
        match event {
            AppEvent::TableLoaded {
                generation,
                origin,
                result,
            } => {
                if generation != self.generation {
                    debug!(
                        "Discarding stale table load (event gen: {}, current gen: {})",
                        generation, self.generation
                    );
                    return None;
                }
                self.current_load = None;
                self.table = match result {
                    Ok(table) => TableStatus::Ready {
                        table: Arc::new(table),
                        origin,
                    },
                    Err(e) => {
                        warn!("Table load failed ({}): {}", e.kind(), e);
                        TableStatus::Unavailable {
                            resource: self
                                .selection
                                .descriptor()
                                .map(|d| d.resource_name)
                                .unwrap_or_default(),
                            message: e.to_string(),
                        }
                    }
                };
                Some(self.table_update())
            }
            AppEvent::LeadersLoaded(cards) => {
                info!("{} leader cards loaded", cards.len());
                Some(UiUpdate::Leaders(cards))
            }
            AppEvent::AvailabilityProbed(results) => {
                let available = results.iter().filter(|(_, ok)| *ok).count();
                for (d, ok) in &results {
                    if !ok {
                        debug!("{} not available", d.resource_name);
                    }
                }
                Some(UiUpdate::Availability {
                    available,
                    total: results.len(),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Kicks off the initial table load, the leaders and the availability probe,
/// then listens on user commands and task events, pushing UI updates
/// through `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut event_rx: mpsc::Receiver<AppEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    state.request_table(Origin::Remote);
    state.spawn_leaders();
    state.spawn_probe();
    let _ = ui_tx.send(state.table_update()).await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if let Some(update) = state.handle_command(cmd) {
                            let _ = ui_tx.send(update).await;
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = event_rx.recv() => {
                // AppState holds a sender, so this channel never closes first.
                if let Some(event) = event {
                    if let Some(update) = state.handle_event(event) {
                        let _ = ui_tx.send(update).await;
                    }
                }
            }
        }
    }

    state.cancel_load();
    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
