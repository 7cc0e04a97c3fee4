// Estimated advanced receiving metrics.
//
// These are approximations from box-score columns, not tracking data. The
// constants are fixed so downstream consumers see identical values.

use crate::record::RawRecord;

/// aDOT is approximated as yards per target scaled by this factor.
pub const DEPTH_OF_TARGET_FACTOR: f64 = 1.2;
/// Assumed routes run per game.
pub const ROUTES_PER_GAME: f64 = 30.0;
/// Assumed team pass targets per game.
pub const TEAM_TARGETS_PER_GAME: f64 = 35.0;

/// Half-PPR scoring weights.
pub const POINTS_PER_YARD: f64 = 0.1;
pub const POINTS_PER_TOUCHDOWN: f64 = 6.0;
pub const POINTS_PER_RECEPTION: f64 = 0.5;

/// Keys under which derived metrics are addressable as columns.
pub const DEPTH_OF_TARGET_KEY: &str = "aDOT";
pub const YARDS_PER_ROUTE_RUN_KEY: &str = "YPRR";
pub const TARGET_SHARE_KEY: &str = "Tgt%";
pub const FANTASY_POINTS_KEY: &str = "FPts";

/// Metrics computed from one record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedMetrics {
    pub estimated_depth_of_target: f64,
    pub estimated_yards_per_route_run: f64,
    /// Percent of assumed team targets.
    pub estimated_target_share: f64,
    pub estimated_fantasy_points: f64,
}

impl DerivedMetrics {
    /// Metric value for a derived column key.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            DEPTH_OF_TARGET_KEY => Some(self.estimated_depth_of_target),
            YARDS_PER_ROUTE_RUN_KEY => Some(self.estimated_yards_per_route_run),
            TARGET_SHARE_KEY => Some(self.estimated_target_share),
            FANTASY_POINTS_KEY => Some(self.estimated_fantasy_points),
            _ => None,
        }
    }
}

/// A raw record with its derived metrics. Borrows the record; deriving never
/// mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedRecord<'a> {
    pub raw: &'a RawRecord,
    pub metrics: DerivedMetrics,
}

impl<'a> DerivedRecord<'a> {
    pub fn new(raw: &'a RawRecord) -> Self {
        DerivedRecord {
            raw,
            metrics: derive(raw),
        }
    }
}

/// Compute all derived metrics for a record.
///
/// A record with no games played gets 0 for the per-game based metrics.
pub fn derive(raw: &RawRecord) -> DerivedMetrics {
    let games = raw.number("G");
    let targets = raw.number("Tgt");
    let yards_per_target = raw.number("Y/Tgt");
    let yards_per_game = raw.number("Y/G");

    let (yards_per_route_run, target_share) = if games > 0.0 {
        (
            yards_per_game / ROUTES_PER_GAME,
            targets / (games * TEAM_TARGETS_PER_GAME) * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    DerivedMetrics {
        estimated_depth_of_target: yards_per_target * DEPTH_OF_TARGET_FACTOR,
        estimated_yards_per_route_run: yards_per_route_run,
        estimated_target_share: target_share,
        estimated_fantasy_points: fantasy_points(raw),
    }
}

/// Half-PPR fantasy points: yards x 0.1 + TD x 6 + receptions x 0.5.
pub fn fantasy_points(raw: &RawRecord) -> f64 {
    raw.number("Yds") * POINTS_PER_YARD
        + raw.number("TD") * POINTS_PER_TOUCHDOWN
        + raw.number("Rec") * POINTS_PER_RECEPTION
}

/// Derive every record of a set, preserving order.
pub fn derive_all(records: &[RawRecord]) -> Vec<DerivedRecord<'_>> {
    records.iter().map(DerivedRecord::new).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
