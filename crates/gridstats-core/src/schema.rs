// Column schema registry: which columns each category displays and how
// their raw strings are compared and formatted.
//
// Adding support for a new export means adding its column list here; the
// rest of the pipeline treats categories purely as data.

use crate::catalog::Category;
use crate::record::parse_strict;

/// How a column's raw string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Numeric,
}

/// One displayable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub value_type: ValueType,
}

const fn text(key: &'static str) -> ColumnSpec {
    ColumnSpec {
        key,
        label: key,
        value_type: ValueType::Text,
    }
}

const fn num(key: &'static str) -> ColumnSpec {
    ColumnSpec {
        key,
        label: key,
        value_type: ValueType::Numeric,
    }
}

// ---------------------------------------------------------------------------
// Well-known fields
// ---------------------------------------------------------------------------

pub const RANK: &str = "Rk";
pub const PLAYER: &str = "Player";
pub const TEAM: &str = "Team";
pub const POSITION: &str = "Pos";
pub const TARGETS: &str = "Tgt";

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

const RECEIVING: &[ColumnSpec] = &[
    num("Rk"),
    text("Player"),
    text("Team"),
    text("Pos"),
    num("Age"),
    num("G"),
    num("Tgt"),
    num("Rec"),
    num("Yds"),
    num("Y/R"),
    num("TD"),
    num("1D"),
    num("Ctch%"),
    num("Y/G"),
    num("Y/Tgt"),
];

const PASSING: &[ColumnSpec] = &[
    num("Rk"),
    text("Player"),
    text("Team"),
    num("Age"),
    num("G"),
    num("GS"),
    num("Cmp"),
    num("Att"),
    num("Cmp%"),
    num("Yds"),
    num("TD"),
    num("Int"),
    num("Y/A"),
    num("Y/G"),
    num("Rate"),
    num("QBR"),
];

const RUSHING: &[ColumnSpec] = &[
    num("Rk"),
    text("Player"),
    text("Team"),
    text("Pos"),
    num("Age"),
    num("G"),
    num("Att"),
    num("Yds"),
    num("TD"),
    num("1D"),
    num("Lng"),
    num("Y/A"),
    num("Y/G"),
    num("Fmb"),
];

/// Estimated advanced metrics, shown after the receiving columns.
pub const ADVANCED: &[ColumnSpec] = &[
    ColumnSpec {
        key: "aDOT",
        label: "aDOT",
        value_type: ValueType::Numeric,
    },
    ColumnSpec {
        key: "YPRR",
        label: "YPRR",
        value_type: ValueType::Numeric,
    },
    ColumnSpec {
        key: "Tgt%",
        label: "Tgt%",
        value_type: ValueType::Numeric,
    },
    ColumnSpec {
        key: "FPts",
        label: "Fantasy Pts",
        value_type: ValueType::Numeric,
    },
];

/// Ordered display columns for a category.
pub fn columns_for(category: Category) -> &'static [ColumnSpec] {
    match category {
        Category::Receiving => RECEIVING,
        Category::Passing => PASSING,
        Category::Rushing => RUSHING,
    }
}

/// Advanced columns available for a category (only receiving has them).
pub fn advanced_for(category: Category) -> &'static [ColumnSpec] {
    match category {
        Category::Receiving => ADVANCED,
        Category::Passing | Category::Rushing => &[],
    }
}

/// Find a column spec by key among the display and advanced columns.
pub fn lookup<'a>(columns: &'a [ColumnSpec], key: &str) -> Option<&'a ColumnSpec> {
    columns
        .iter()
        .chain(ADVANCED.iter())
        .find(|c| c.key == key)
}

/// Whether the display columns include `key`.
pub fn has_column(columns: &[ColumnSpec], key: &str) -> bool {
    columns.iter().any(|c| c.key == key)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Counting stats shown as whole numbers.
const WHOLE_NUMBER_KEYS: &[&str] = &["Yds", "TD", "Int", "Att", "Cmp", "Rec", "Tgt", "Fmb"];

impl ColumnSpec {
    /// Render a raw value for display.
    pub fn format(&self, raw: Option<&str>) -> String {
        let raw = match raw.map(str::trim) {
            None | Some("") => return "-".to_string(),
            Some(s) => s,
        };
        if self.value_type == ValueType::Text {
            return raw.to_string();
        }
        match parse_strict(raw) {
            Some(v) => self.format_number(v),
            None => raw.to_string(),
        }
    }

    /// Render a numeric value for display.
    pub fn format_number(&self, v: f64) -> String {
        if self.key.contains('%') {
            format!("{v:.1}%")
        } else if self.key.contains('/') || self.key == "Rate" || self.key == "QBR" {
            format!("{v:.1}")
        } else if WHOLE_NUMBER_KEYS.contains(&self.key) {
            format!("{}", v.round() as i64)
        } else if self.key == "YPRR" {
            format!("{v:.2}")
        } else {
            format!("{v:.1}")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
