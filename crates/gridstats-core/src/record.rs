// Parsed rows and typed field access.

use std::sync::Arc;

use crate::schema::{ColumnSpec, ValueType};

/// One data row: column name -> raw string value, in source column order.
///
/// All records parsed from the same text share one header list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl RawRecord {
    /// Build a record; `values` is padded with empty strings (or truncated)
    /// to the header length.
    pub fn new(columns: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(columns.len(), String::new());
        RawRecord { columns, values }
    }

    /// Convenience constructor for ad-hoc rows.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<String>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).unzip();
        RawRecord::new(columns.into(), values)
    }

    /// Raw value for a column, `None` if the column is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == key)
            .map(|i| self.values[i].as_str())
    }

    /// Numeric value for a column; absent or non-numeric is 0.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map_or(0.0, parse_number)
    }

    /// Typed view of a field, interpreted through its column spec.
    pub fn cell(&self, spec: &ColumnSpec) -> Cell<'_> {
        Cell::read(self.get(spec.key), spec.value_type)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// (column, value) pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// A field read through the schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Empty,
    Text(&'a str),
    Number(f64),
}

impl<'a> Cell<'a> {
    pub fn read(raw: Option<&'a str>, value_type: ValueType) -> Cell<'a> {
        match raw.map(str::trim) {
            None | Some("") => Cell::Empty,
            Some(s) => match value_type {
                ValueType::Numeric => Cell::Number(parse_number(s)),
                ValueType::Text => Cell::Text(s),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Strict numeric parse: `None` unless the trimmed text (with an optional
/// trailing `%`) is a finite number.
pub fn parse_strict(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient numeric coercion: anything non-numeric or missing becomes 0.
pub fn parse_number(raw: &str) -> f64 {
    parse_strict(raw).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
