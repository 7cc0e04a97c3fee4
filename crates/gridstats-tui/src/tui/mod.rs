// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `DashboardState` mirroring what the app orchestrator
// reports, plus everything that needs no fetch: sort, search, position and
// minimum-targets filters, the advanced-metrics toggle and scrolling. The
// orchestrator pushes `UiUpdate` messages; the TUI applies them and
// re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use gridstats_core::catalog::Selection;
use gridstats_core::leaders::LeaderCard;
use gridstats_core::loader::StatTable;
use gridstats_core::schema::{self, ColumnSpec, RANK};
use gridstats_core::view::{self, SortDirection, ViewState};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::info;

use crate::protocol::{TableStatus, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// DashboardState
// ---------------------------------------------------------------------------

/// TUI-local state read by `render_frame`.
pub struct DashboardState {
    pub selection: Selection,
    pub table: TableStatus,
    pub leaders: Vec<LeaderCard>,
    /// False until the first leaders update arrives.
    pub leaders_loaded: bool,
    /// (available, total) exports, once probed.
    pub availability: Option<(usize, usize)>,
    pub view: ViewState,
    pub show_advanced: bool,
    /// Index into `visible_columns()` picked for sorting.
    pub sort_cursor: usize,
    pub scroll_offset: usize,
    /// Table body rows at the last render; bounds `scroll_offset`.
    pub page_rows: usize,
    /// Whether keystrokes go to the search box.
    pub filter_mode: bool,
    /// Shown in the unavailable panel as the local-load target.
    pub local_dir: String,
}

impl DashboardState {
    pub fn new(selection: Selection, view: ViewState, local_dir: impl Into<String>) -> Self {
        DashboardState {
            selection,
            table: TableStatus::Loading,
            leaders: Vec::new(),
            leaders_loaded: false,
            availability: None,
            view,
            show_advanced: false,
            sort_cursor: 0,
            scroll_offset: 0,
            page_rows: 0,
            filter_mode: false,
            local_dir: local_dir.into(),
        }
    }

    /// Display columns for the current selection, advanced metrics last.
    pub fn visible_columns(&self) -> Vec<ColumnSpec> {
        let category = self.selection.category;
        let mut columns = schema::columns_for(category).to_vec();
        if self.show_advanced {
            columns.extend_from_slice(schema::advanced_for(category));
        }
        columns
    }

    /// The loaded table, if ready.
    pub fn ready_table(&self) -> Option<&Arc<StatTable>> {
        match &self.table {
            TableStatus::Ready { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Rows left after the current filters.
    pub fn visible_row_count(&self) -> usize {
        match self.ready_table() {
            Some(table) => {
                let derived = table.derived();
                view::apply(&derived, &self.visible_columns(), &self.view).len()
            }
            None => 0,
        }
    }

    fn max_scroll(&self) -> usize {
        self.visible_row_count().saturating_sub(self.page_rows)
    }

    /// Scroll down, stopping once the last row is on screen.
    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows).min(self.max_scroll());
    }

    /// Keep the sort key and cursor meaningful for the visible columns.
    fn fit_view_to_columns(&mut self) {
        let columns = self.visible_columns();
        if !schema::has_column(&columns, &self.view.sort_key) {
            self.view = ViewState {
                sort_key: RANK.to_string(),
                sort_direction: SortDirection::Ascending,
                ..self.view.clone()
            };
        }
        if !schema::has_column(&columns, schema::POSITION) {
            self.view = self.view.with_category_filter(None);
        }
        self.sort_cursor = self.sort_cursor.min(columns.len().saturating_sub(1));
    }

    pub fn toggle_advanced(&mut self) {
        self.show_advanced = !self.show_advanced;
        self.fit_view_to_columns();
    }

    fn set_selection(&mut self, selection: Selection) {
        if selection.category != self.selection.category {
            self.view = self.view.with_category_filter(None);
            self.sort_cursor = 0;
        }
        self.selection = selection;
        self.scroll_offset = 0;
        self.fit_view_to_columns();
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

fn apply_ui_update(state: &mut DashboardState, update: UiUpdate) {
    match update {
        UiUpdate::Table { selection, status } => {
            state.set_selection(selection);
            state.table = status;
        }
        UiUpdate::Leaders(cards) => {
            state.leaders = cards;
            state.leaders_loaded = true;
        }
        UiUpdate::Availability { available, total } => {
            state.availability = Some((available, total));
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &DashboardState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::leaders::render(frame, layout.leaders, state);
    widgets::stats_table::render(frame, layout.table, state);
    render_help_bar(frame, &layout, state);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &DashboardState) {
    let text = if state.filter_mode {
        " Search: type to filter | Enter:Keep | Esc:Clear"
    } else {
        " 1-3:Category s:Season y:Year /:Search p:Pos \u{2190}\u{2192}:Column o:Sort a:Advanced +/-:Min Tgt r:Retry u:Local q:Quit"
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the app closes the update
/// channel. Restores the terminal on exit and on panic.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut state: DashboardState,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => apply_ui_update(&mut state, update),
                    None => {
                        info!("UI channel closed");
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| {
                    state.page_rows =
                        widgets::stats_table::body_rows(build_layout(frame.area()).table);
                    render_frame(frame, &state);
                })?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
