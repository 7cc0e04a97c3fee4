// Sort/filter engine: turns a record set plus a view state into the ordered
// rows a table shows.
//
// `ViewState` is an immutable value; every transition builds a new one.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::metrics::DerivedRecord;
use crate::record::{Cell, RawRecord};
use crate::schema::{self, ColumnSpec, ValueType, PLAYER, POSITION, RANK, TARGETS, TEAM};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// What the table is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub sort_key: String,
    pub sort_direction: SortDirection,
    pub search_term: String,
    /// Substring matched against the position column.
    pub category_filter: Option<String>,
    /// Minimum targets; 0 disables the filter.
    pub min_targets: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            sort_key: RANK.to_string(),
            sort_direction: SortDirection::Ascending,
            search_term: String::new(),
            category_filter: None,
            min_targets: 0,
        }
    }
}

impl ViewState {
    /// Sort by `key`: the same key flips direction, a new key starts
    /// descending.
    #[must_use]
    pub fn with_sort(&self, key: &str) -> ViewState {
        let sort_direction = if self.sort_key == key {
            self.sort_direction.reversed()
        } else {
            SortDirection::Descending
        };
        ViewState {
            sort_key: key.to_string(),
            sort_direction,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_search(&self, term: &str) -> ViewState {
        ViewState {
            search_term: term.to_string(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_category_filter(&self, value: Option<&str>) -> ViewState {
        ViewState {
            category_filter: value.map(str::to_string),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_min_targets(&self, min_targets: u32) -> ViewState {
        ViewState {
            min_targets,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Row access
// ---------------------------------------------------------------------------

/// Anything the engine can filter and sort.
pub trait Row {
    /// Raw source value for a column.
    fn raw(&self, key: &str) -> Option<&str>;

    /// Value for a computed column, if `key` names one.
    fn derived(&self, _key: &str) -> Option<f64> {
        None
    }
}

impl Row for RawRecord {
    fn raw(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl Row for DerivedRecord<'_> {
    fn raw(&self, key: &str) -> Option<&str> {
        self.raw.get(key)
    }

    fn derived(&self, key: &str) -> Option<f64> {
        self.metrics.get(key)
    }
}

fn sort_cell<'r, R: Row>(row: &'r R, key: &str, value_type: ValueType) -> Cell<'r> {
    match row.derived(key) {
        Some(v) => Cell::Number(v),
        None => Cell::read(row.raw(key), value_type),
    }
}

/// Empty cells always go last; only non-empty pairs honour the direction.
fn compare_cells(a: Cell<'_>, b: Cell<'_>, direction: SortDirection) -> Ordering {
    let ord = match (a, b) {
        (Cell::Empty, Cell::Empty) => return Ordering::Equal,
        (Cell::Empty, _) => return Ordering::Greater,
        (_, Cell::Empty) => return Ordering::Less,
        (Cell::Number(x), Cell::Number(y)) => x.total_cmp(&y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Filter and sort `rows` for display.
///
/// Filters: position substring (only when the schema has a position column),
/// minimum targets (only when it has a targets column), then a
/// case-insensitive player/team search. The sort is stable; unknown keys
/// compare as text.
pub fn apply<'a, R: Row>(rows: &'a [R], columns: &[ColumnSpec], state: &ViewState) -> Vec<&'a R> {
    let category_filter = state
        .category_filter
        .as_deref()
        .filter(|_| schema::has_column(columns, POSITION));
    let min_targets = (state.min_targets > 0 && schema::has_column(columns, TARGETS))
        .then_some(f64::from(state.min_targets));
    let needle = state.search_term.to_lowercase();

    let mut out: Vec<&R> = rows
        .iter()
        .filter(|r| match category_filter {
            Some(pos) => r.raw(POSITION).is_some_and(|p| p.contains(pos)),
            None => true,
        })
        .filter(|r| match min_targets {
            Some(min) => r.raw(TARGETS).map_or(0.0, crate::record::parse_number) >= min,
            None => true,
        })
        .filter(|r| {
            needle.is_empty()
                || [PLAYER, TEAM].iter().any(|key| {
                    r.raw(key)
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
        })
        .collect();

    let value_type = schema::lookup(columns, &state.sort_key).map_or(ValueType::Text, |c| c.value_type);
    let key = state.sort_key.as_str();
    out.sort_by(|a, b| {
        compare_cells(
            sort_cell(*a, key, value_type),
            sort_cell(*b, key, value_type),
            state.sort_direction,
        )
    });
    out
}

/// Sorted distinct non-empty values of a column (e.g. positions for the
/// filter picker).
pub fn distinct_values<R: Row>(rows: &[R], key: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.raw(key).map(str::trim))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
