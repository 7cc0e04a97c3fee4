// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator (anything that needs a fetch), or into local DashboardState
// changes (sort, search, filters, scrolling).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gridstats_core::catalog::Category;
use gridstats_core::schema::POSITION;
use gridstats_core::view;

use super::DashboardState;
use crate::protocol::UserCommand;

/// Minimum-targets filter step for `+` / `-`.
pub const MIN_TARGETS_STEP: u32 = 10;

const PAGE_SIZE: usize = 20;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key should be forwarded to the app
/// orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, state: &mut DashboardState) -> Option<UserCommand> {
    // crossterm reports Release/Repeat on some platforms; act on Press only.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if state.filter_mode {
        handle_filter_mode(key_event, state);
        return None;
    }

    match key_event.code {
        KeyCode::Char('1') => Some(UserCommand::SelectCategory(Category::Receiving)),
        KeyCode::Char('2') => Some(UserCommand::SelectCategory(Category::Passing)),
        KeyCode::Char('3') => Some(UserCommand::SelectCategory(Category::Rushing)),
        KeyCode::Char('s') => Some(UserCommand::ToggleSeason),
        KeyCode::Char('y') => Some(UserCommand::NextYear),
        KeyCode::Char('r') => Some(UserCommand::Retry),
        KeyCode::Char('u') => Some(UserCommand::LoadLocal),
        KeyCode::Char('q') => Some(UserCommand::Quit),

        KeyCode::Char('/') => {
            state.filter_mode = true;
            None
        }
        KeyCode::Char('p') => {
            cycle_position_filter(state);
            None
        }
        KeyCode::Char('a') => {
            state.toggle_advanced();
            None
        }

        KeyCode::Left | KeyCode::Char('h') => {
            state.sort_cursor = state.sort_cursor.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let last = state.visible_columns().len().saturating_sub(1);
            state.sort_cursor = (state.sort_cursor + 1).min(last);
            None
        }
        KeyCode::Char('o') => {
            sort_by_cursor(state);
            None
        }

        KeyCode::Char('+') | KeyCode::Char('=') => {
            let min = state.view.min_targets.saturating_add(MIN_TARGETS_STEP);
            set_min_targets(state, min);
            None
        }
        KeyCode::Char('-') => {
            let min = state.view.min_targets.saturating_sub(MIN_TARGETS_STEP);
            set_min_targets(state, min);
            None
        }

        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll_down(1);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.scroll_up(1);
            None
        }
        KeyCode::PageDown => {
            state.scroll_down(PAGE_SIZE);
            None
        }
        KeyCode::PageUp => {
            state.scroll_up(PAGE_SIZE);
            None
        }

        // Clear every local filter.
        KeyCode::Esc => {
            state.view = state
                .view
                .with_search("")
                .with_category_filter(None)
                .with_min_targets(0);
            state.scroll_offset = 0;
            None
        }

        _ => None,
    }
}

/// Search box editing. Enter keeps the term, Esc clears it.
fn handle_filter_mode(key_event: KeyEvent, state: &mut DashboardState) {
    let mut term = state.view.search_term.clone();
    match key_event.code {
        KeyCode::Esc => {
            state.filter_mode = false;
            term.clear();
        }
        KeyCode::Enter => {
            state.filter_mode = false;
            return;
        }
        KeyCode::Backspace => {
            term.pop();
        }
        KeyCode::Char(c) => term.push(c),
        _ => return,
    }
    state.view = state.view.with_search(&term);
    state.scroll_offset = 0;
}

/// Sort by the column under the cursor; pressing again flips direction.
fn sort_by_cursor(state: &mut DashboardState) {
    let columns = state.visible_columns();
    if let Some(column) = columns.get(state.sort_cursor) {
        state.view = state.view.with_sort(column.key);
        state.scroll_offset = 0;
    }
}

fn set_min_targets(state: &mut DashboardState, min: u32) {
    state.view = state.view.with_min_targets(min);
    state.scroll_offset = 0;
}

/// Cycle the position filter: none -> each position in the loaded table
/// (sorted) -> none. No-op for categories without a position column.
fn cycle_position_filter(state: &mut DashboardState) {
    let Some(table) = state.ready_table() else {
        return;
    };
    if !gridstats_core::schema::has_column(table.columns(), POSITION) {
        return;
    }
    let positions = view::distinct_values(&table.records, POSITION);
    let next = match state.view.category_filter.as_deref() {
        None => positions.first().cloned(),
        Some(current) => positions
            .iter()
            .position(|p| p == current)
            .and_then(|i| positions.get(i + 1))
            .cloned(),
    };
    state.view = state.view.with_category_filter(next.as_deref());
    state.scroll_offset = 0;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Origin, TableStatus};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use gridstats_core::catalog::{SeasonKind, Selection};
    use gridstats_core::loader::StatTable;
    use gridstats_core::record::RawRecord;
    use gridstats_core::view::{SortDirection, ViewState};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state_for(category: Category) -> DashboardState {
        DashboardState::new(
            Selection::new(category, SeasonKind::Regular, 2024),
            ViewState::default(),
            "data",
        )
    }

    /// Receiving state with a ready table of WR/TE/RB rows.
    fn ready_state() -> DashboardState {
        let mut state = state_for(Category::Receiving);
        let records = [("1", "A", "WR"), ("2", "B", "TE"), ("3", "C", "WR"), ("4", "D", "RB")]
            .iter()
            .map(|(rk, player, pos)| {
                RawRecord::from_pairs([("Rk", *rk), ("Player", *player), ("Pos", *pos)])
            })
            .collect();
        state.table = TableStatus::Ready {
            table: Arc::new(StatTable {
                descriptor: state.selection.descriptor().unwrap(),
                records,
                loaded_at: chrono::Utc::now(),
            }),
            origin: Origin::Remote,
        };
        state
    }

    // -- Commands --

    #[test]
    fn number_keys_select_categories() {
        let mut state = state_for(Category::Receiving);
        assert_eq!(
            handle_key(key(KeyCode::Char('1')), &mut state),
            Some(UserCommand::SelectCategory(Category::Receiving))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('2')), &mut state),
            Some(UserCommand::SelectCategory(Category::Passing))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('3')), &mut state),
            Some(UserCommand::SelectCategory(Category::Rushing))
        );
    }

    #[test]
    fn selection_and_reload_keys() {
        let mut state = state_for(Category::Receiving);
        assert_eq!(handle_key(key(KeyCode::Char('s')), &mut state), Some(UserCommand::ToggleSeason));
        assert_eq!(handle_key(key(KeyCode::Char('y')), &mut state), Some(UserCommand::NextYear));
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut state), Some(UserCommand::Retry));
        assert_eq!(handle_key(key(KeyCode::Char('u')), &mut state), Some(UserCommand::LoadLocal));
    }

    #[test]
    fn q_and_ctrl_c_quit() {
        let mut state = state_for(Category::Receiving);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), Some(UserCommand::Quit));
        assert_eq!(handle_key(ctrl_key(KeyCode::Char('c')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = state_for(Category::Receiving);
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert_eq!(handle_key(event, &mut state), None);
        event.kind = KeyEventKind::Repeat;
        assert_eq!(handle_key(event, &mut state), None);
    }

    // -- Search --

    #[test]
    fn slash_enters_filter_mode_and_typing_updates_search() {
        let mut state = state_for(Category::Receiving);
        assert_eq!(handle_key(key(KeyCode::Char('/')), &mut state), None);
        assert!(state.filter_mode);

        for c in "cin".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(state.view.search_term, "cin");

        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.view.search_term, "ci");

        handle_key(key(KeyCode::Enter), &mut state);
        assert!(!state.filter_mode);
        assert_eq!(state.view.search_term, "ci");
    }

    #[test]
    fn filter_mode_captures_command_keys() {
        let mut state = state_for(Category::Receiving);
        state.filter_mode = true;
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), None);
        assert_eq!(handle_key(key(KeyCode::Char('1')), &mut state), None);
        assert_eq!(state.view.search_term, "q1");
        // Ctrl+C still escapes.
        assert_eq!(handle_key(ctrl_key(KeyCode::Char('c')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn esc_in_filter_mode_clears_search() {
        let mut state = state_for(Category::Receiving);
        state.filter_mode = true;
        handle_key(key(KeyCode::Char('x')), &mut state);
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.filter_mode);
        assert!(state.view.search_term.is_empty());
    }

    // -- Sort --

    #[test]
    fn cursor_moves_within_columns() {
        let mut state = state_for(Category::Receiving);
        handle_key(key(KeyCode::Left), &mut state);
        assert_eq!(state.sort_cursor, 0);
        let count = state.visible_columns().len();
        for _ in 0..count + 5 {
            handle_key(key(KeyCode::Right), &mut state);
        }
        assert_eq!(state.sort_cursor, count - 1);
    }

    #[test]
    fn o_sorts_by_cursor_column_and_toggles() {
        let mut state = state_for(Category::Receiving);
        let yds = state
            .visible_columns()
            .iter()
            .position(|c| c.key == "Yds")
            .unwrap();
        state.sort_cursor = yds;

        handle_key(key(KeyCode::Char('o')), &mut state);
        assert_eq!(state.view.sort_key, "Yds");
        assert_eq!(state.view.sort_direction, SortDirection::Descending);

        handle_key(key(KeyCode::Char('o')), &mut state);
        assert_eq!(state.view.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn a_toggles_advanced_columns() {
        let mut state = state_for(Category::Receiving);
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert!(state.show_advanced);
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert!(!state.show_advanced);
    }

    // -- Filters --

    #[test]
    fn min_targets_steps_and_floors_at_zero() {
        let mut state = state_for(Category::Receiving);
        handle_key(key(KeyCode::Char('+')), &mut state);
        handle_key(key(KeyCode::Char('+')), &mut state);
        assert_eq!(state.view.min_targets, 2 * MIN_TARGETS_STEP);
        for _ in 0..5 {
            handle_key(key(KeyCode::Char('-')), &mut state);
        }
        assert_eq!(state.view.min_targets, 0);
    }

    #[test]
    fn position_filter_cycles_through_table_positions() {
        let mut state = ready_state();
        let mut seen = Vec::new();
        for _ in 0..4 {
            handle_key(key(KeyCode::Char('p')), &mut state);
            seen.push(state.view.category_filter.clone());
        }
        assert_eq!(
            seen,
            [
                Some("RB".to_string()),
                Some("TE".to_string()),
                Some("WR".to_string()),
                None
            ]
        );
    }

    #[test]
    fn position_filter_noop_without_table_or_column() {
        let mut state = state_for(Category::Receiving);
        handle_key(key(KeyCode::Char('p')), &mut state);
        assert!(state.view.category_filter.is_none());

        let mut state = state_for(Category::Passing);
        handle_key(key(KeyCode::Char('p')), &mut state);
        assert!(state.view.category_filter.is_none());
    }

    #[test]
    fn esc_clears_all_local_filters() {
        let mut state = ready_state();
        state.view = state
            .view
            .with_search("a")
            .with_category_filter(Some("WR"))
            .with_min_targets(30);
        state.scroll_offset = 7;
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.view.search_term.is_empty());
        assert!(state.view.category_filter.is_none());
        assert_eq!(state.view.min_targets, 0);
        assert_eq!(state.scroll_offset, 0);
    }

    // -- Scrolling --

    #[test]
    fn scrolling_stays_within_rows() {
        let mut state = ready_state();
        state.page_rows = 2;
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.scroll_offset, 0);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.scroll_offset, 2);

        // Four rows, two on screen: the offset stops at 2.
        for _ in 0..10 {
            handle_key(key(KeyCode::Char('j')), &mut state);
        }
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset, 2);

        // One press up moves the view straight away.
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.scroll_offset, 1);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn scroll_bound_follows_filters() {
        let mut state = ready_state();
        state.page_rows = 1;
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset, 3);

        // Only the two WR rows remain.
        state.view = state.view.with_category_filter(Some("WR"));
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.scroll_offset, 1);
    }

    #[test]
    fn no_scrolling_without_a_table() {
        let mut state = state_for(Category::Receiving);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn unknown_key_returns_none() {
        let mut state = state_for(Category::Receiving);
        assert_eq!(handle_key(key(KeyCode::Char('z')), &mut state), None);
        assert_eq!(handle_key(key(KeyCode::F(5)), &mut state), None);
    }
}
