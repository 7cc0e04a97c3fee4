// Row validation: keep genuine player rows, drop banner/footer noise.

use tracing::debug;

use crate::record::RawRecord;
use crate::schema::{PLAYER, RANK};

/// Aggregate rows that share the table layout but are not players.
pub const SUMMARY_LABELS: &[&str] = &["League Average"];

/// Whether a record is a real data row.
///
/// Rejects rows with an empty or reserved player name, a repeated header
/// row, and rows whose rank is not a non-negative integer.
pub fn is_data_row(record: &RawRecord) -> bool {
    let player = record.get(PLAYER).map(str::trim).unwrap_or("");
    if player.is_empty() || player == PLAYER || SUMMARY_LABELS.contains(&player) {
        return false;
    }
    record
        .get(RANK)
        .map(str::trim)
        .is_some_and(|rk| !rk.is_empty() && rk.parse::<u32>().is_ok())
}

/// Keep only data rows, preserving order. Dropped rows are expected noise,
/// not errors.
pub fn retain_data_rows(mut records: Vec<RawRecord>) -> Vec<RawRecord> {
    let before = records.len();
    records.retain(is_data_row);
    let dropped = before - records.len();
    if dropped > 0 {
        debug!("dropped {dropped} non-data rows of {before}");
    }
    records
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
