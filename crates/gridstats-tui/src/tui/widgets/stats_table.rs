// Stats table widget: the filtered, sorted rows of the current selection.
//
// Loading and unavailable selections render a message panel instead of the
// table. The sort column carries an arrow; the column under the sort
// cursor is highlighted.

use gridstats_core::metrics::DerivedRecord;
use gridstats_core::schema::{ColumnSpec, ValueType, PLAYER};
use gridstats_core::view::{self, SortDirection, ViewState};
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::protocol::TableStatus;
use crate::tui::widgets::status_bar::selection_title;
use crate::tui::DashboardState;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let title = selection_title(state);
    let table = match &state.table {
        TableStatus::Loading => {
            render_message(frame, area, &title, vec![Line::from("Loading...")]);
            return;
        }
        TableStatus::Unavailable { resource, message } => {
            let lines = vec![
                Line::from(format!("Data not available: {resource}"))
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Line::from(message.clone()),
                Line::from(""),
                Line::from(format!(
                    "Press r to retry or u to load from {}",
                    state.local_dir
                ))
                .style(Style::default().fg(Color::Gray)),
            ];
            render_message(frame, area, &title, lines);
            return;
        }
        TableStatus::Ready { table, .. } => table,
    };

    let columns = state.visible_columns();
    let derived = table.derived();
    let visible = view::apply(&derived, &columns, &state.view);

    let body_height = body_rows(area);
    let offset = clamp_offset(state.scroll_offset, visible.len(), body_height);

    let header = Row::new(
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let mut style = Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                if i == state.sort_cursor {
                    style = style.fg(Color::Black).bg(Color::Cyan);
                }
                Cell::from(header_label(column, &state.view)).style(style)
            })
            .collect::<Vec<_>>(),
    );

    let rows: Vec<Row> = visible
        .iter()
        .skip(offset)
        .take(body_height)
        .map(|record| {
            Row::new(
                columns
                    .iter()
                    .map(|column| Cell::from(format_cell(record, column)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let widths: Vec<Constraint> = columns.iter().map(column_width).collect();

    let title = build_title(&title, &state.view, visible.len(), table.len());
    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>) {
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        );
    frame.render_widget(paragraph, area);
}

/// Display text for one cell. Derived columns read the computed metric.
pub fn format_cell(record: &DerivedRecord<'_>, column: &ColumnSpec) -> String {
    match record.metrics.get(column.key) {
        Some(v) => column.format_number(v),
        None => column.format(record.raw.get(column.key)),
    }
}

/// Column label with a direction arrow on the active sort column.
pub fn header_label(column: &ColumnSpec, view: &ViewState) -> String {
    if column.key != view.sort_key {
        return column.label.to_string();
    }
    let arrow = match view.sort_direction {
        SortDirection::Ascending => '\u{25b2}',
        SortDirection::Descending => '\u{25bc}',
    };
    format!("{}{arrow}", column.label)
}

fn column_width(column: &ColumnSpec) -> Constraint {
    if column.key == PLAYER {
        Constraint::Min(18)
    } else if column.value_type == ValueType::Text {
        Constraint::Length(5)
    } else {
        let width = column.label.chars().count().max(5) + 1;
        Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
    }
}

/// Data rows that fit in `area`: borders plus header row take three.
pub fn body_rows(area: Rect) -> usize {
    usize::from(area.height.saturating_sub(3))
}

/// Keep the scroll offset within the last full page.
pub fn clamp_offset(offset: usize, rows: usize, page: usize) -> usize {
    offset.min(rows.saturating_sub(page))
}

fn build_title(display: &str, view: &ViewState, shown: usize, total: usize) -> Line<'static> {
    let mut title = display.to_string();
    if let Some(pos) = &view.category_filter {
        title.push_str(&format!(" [{pos}]"));
    }
    if view.min_targets > 0 {
        title.push_str(&format!(" [Tgt>={}]", view.min_targets));
    }
    if !view.search_term.is_empty() {
        title.push_str(&format!(" \"{}\"", view.search_term));
    }
    title.push_str(&format!(" ({shown} of {total})"));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
