// CSV parsing of normalized export text into raw records.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::ParseError;
use crate::record::RawRecord;

/// Parse normalized text (header line + data lines) into records.
///
/// Short rows are padded with empty values, extra trailing fields are
/// ignored, and blank lines are skipped. An unterminated quoted field is a
/// [`ParseError`] pointing at the line where the quote opened.
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>, ParseError> {
    check_quotes(text)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Ok(Vec::new());
    }
    let columns: Arc<[String]> = disambiguate(headers.iter().map(|h| h.trim())).into();

    let mut records = Vec::new();
    let mut overlong = 0usize;
    for result in reader.records() {
        let row = result.map_err(csv_error)?;
        if row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if row.len() > columns.len() {
            overlong += 1;
        }
        let values = row
            .iter()
            .take(columns.len())
            .map(|f| f.trim().to_string())
            .collect();
        records.push(RawRecord::new(Arc::clone(&columns), values));
    }

    if overlong > 0 {
        debug!("{overlong} rows had more fields than the header; extras ignored");
    }
    Ok(records)
}

/// Rename repeated header names to `name_1`, `name_2`, ... so every column
/// stays addressable. The first occurrence keeps its name.
fn disambiguate<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    headers
        .map(|h| {
            let count = seen.entry(h).or_insert(0);
            let name = if *count == 0 {
                h.to_string()
            } else {
                format!("{h}_{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

/// The csv reader silently runs an unterminated quote to end of input, so
/// detect it up front. Quotes only open at the start of a field; `""` inside
/// a quoted field is an escaped quote.
fn check_quotes(text: &str) -> Result<(), ParseError> {
    let mut line: u64 = 1;
    let mut open_line: u64 = 0;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if at_field_start => {
                in_quotes = true;
                open_line = line;
                at_field_start = false;
            }
            ',' => at_field_start = true,
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(ParseError {
            line: open_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    Ok(())
}

fn csv_error(e: csv::Error) -> ParseError {
    ParseError {
        line: e.position().map_or(0, |p| p.line()),
        message: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
