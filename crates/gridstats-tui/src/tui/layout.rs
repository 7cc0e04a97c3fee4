// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Leaders strip (5 rows)                            |
// +--------------------------------------------------+
// | Stats table (fill)                                |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Selection, load state, source and availability.
    pub status_bar: Rect,
    /// One card per leader.
    pub leaders: Rect,
    pub table: Rect,
    /// Keyboard shortcut hints.
    pub help_bar: Rect,
}

pub const LEADERS_HEIGHT: u16 = 5;

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(LEADERS_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        leaders: vertical[1],
        table: vertical[2],
        help_bar: vertical[3],
    }
}

/// Split the leaders strip into `count` equal-width cards.
pub fn card_areas(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
