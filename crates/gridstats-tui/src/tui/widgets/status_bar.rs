// Status bar widget: selection, load state, source and availability.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TableStatus;
use crate::tui::DashboardState;

/// Render the status bar into the given area.
///
/// Layout: [selection] | [load state] | [availability]
pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let mut spans = vec![Span::styled(
        format!(" {} ", selection_title(state)),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    let (text, color) = load_indicator(&state.table);
    spans.push(Span::styled(text, Style::default().fg(color)));

    if let Some(text) = availability_text(state.availability) {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(text, Style::default().fg(Color::White)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Display name of the current selection, or the bare category for
/// unknown combinations.
pub fn selection_title(state: &DashboardState) -> String {
    state
        .selection
        .descriptor()
        .map(|d| d.display_name)
        .unwrap_or_else(|| state.selection.category.label().to_string())
}

/// Text and color describing the table state.
pub fn load_indicator(status: &TableStatus) -> (String, Color) {
    match status {
        TableStatus::Loading => ("Loading...".to_string(), Color::Yellow),
        TableStatus::Ready { table, origin } => (
            format!(
                "{} rows from {} at {}",
                table.len(),
                origin.label(),
                table
                    .loaded_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M")
            ),
            Color::Green,
        ),
        TableStatus::Unavailable { .. } => ("Unavailable".to_string(), Color::Red),
    }
}

pub fn availability_text(availability: Option<(usize, usize)>) -> Option<String> {
    availability.map(|(available, total)| format!("{available}/{total} exports available"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
