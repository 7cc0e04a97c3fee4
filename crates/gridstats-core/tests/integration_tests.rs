// Integration tests for the stats pipeline.
//
// These run the public API end-to-end against export fixtures that carry the
// same noise real copies do: citation lines, section banners, merged-header
// marker columns, repeated header rows and league-average footers.

use gridstats_core::catalog::{all_descriptors, find, Category, SeasonKind};
use gridstats_core::error::{FetchError, LoadError};
use gridstats_core::fetch::{LocalSource, RecordSource};
use gridstats_core::leaders::load_leaders;
use gridstats_core::loader::{load_many, load_table, probe_availability, records_from_text};
use gridstats_core::schema::{self, advanced_for};
use gridstats_core::view::{self, SortDirection, ViewState};

// ===========================================================================
// Test helpers
// ===========================================================================

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixtures() -> LocalSource {
    LocalSource::new(FIXTURES)
}

fn players<'a, I>(rows: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a gridstats_core::metrics::DerivedRecord<'a>>,
{
    rows.into_iter()
        .map(|r| r.raw.get("Player").unwrap_or(""))
        .collect()
}

// ===========================================================================
// Loading
// ===========================================================================

#[tokio::test]
async fn receiving_export_is_cleaned_and_validated() {
    let d = find(Category::Receiving, SeasonKind::Regular, 2024).unwrap();
    let table = load_table(&fixtures(), &d).await.unwrap();

    let names: Vec<_> = table.records.iter().map(|r| r.get("Player").unwrap()).collect();
    assert_eq!(
        names,
        [
            "Ja'Marr Chase",
            "Justin Jefferson",
            "Brian Thomas Jr.",
            "Trey McBride",
            "Brock Bowers",
            "Bench Guy",
        ]
    );

    // Marker columns are gone and the trailing id column was ignored.
    let header = table.records[0].columns();
    assert_eq!(header.last().map(String::as_str), Some("Awards"));
    assert!(header.iter().all(|h| !h.contains("additional")));
    assert_eq!(table.records[0].get("Yds"), Some("1708"));
    assert_eq!(table.records[5].get("Awards"), Some(""));
}

#[tokio::test]
async fn passing_and_rushing_banners_are_dropped() {
    let pass = find(Category::Passing, SeasonKind::Regular, 2024).unwrap();
    let rush = find(Category::Rushing, SeasonKind::Regular, 2024).unwrap();
    let source = fixtures();

    let passing = load_table(&source, &pass).await.unwrap();
    assert_eq!(passing.len(), 3);
    assert_eq!(passing.records[0].get("Cmp%"), Some("70.6"));

    let rushing = load_table(&source, &rush).await.unwrap();
    assert_eq!(rushing.len(), 3);
    assert_eq!(rushing.records[1].get("Player"), Some("Derrick Henry"));
    assert_eq!(rushing.records[1].get("Fmb"), Some("1"));
}

#[tokio::test]
async fn malformed_export_reports_line() {
    let d = find(Category::Receiving, SeasonKind::Playoff, 2024).unwrap();
    let err = load_table(&fixtures(), &d).await.unwrap_err();
    match err {
        LoadError::Parse { resource, source } => {
            assert_eq!(resource, "pff-nfl-playoff-receiving-2024.csv");
            assert_eq!(source.line, 3);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_export_is_fetch_error() {
    let d = find(Category::Rushing, SeasonKind::Playoff, 2022).unwrap();
    let err = load_table(&fixtures(), &d).await.unwrap_err();
    assert_eq!(err.kind(), "fetch");
    assert!(matches!(err, LoadError::Fetch(FetchError::Io { .. })));
}

#[tokio::test]
async fn load_many_keeps_slot_order_with_failures() {
    let descriptors = vec![
        find(Category::Rushing, SeasonKind::Regular, 2024).unwrap(),
        find(Category::Rushing, SeasonKind::Regular, 2022).unwrap(),
        find(Category::Passing, SeasonKind::Regular, 2024).unwrap(),
    ];
    let tables = load_many(&fixtures(), &descriptors).await;
    let sizes: Vec<_> = tables.iter().map(|t| t.len()).collect();
    assert_eq!(sizes, [3, 0, 3]);
    for (t, d) in tables.iter().zip(&descriptors) {
        assert_eq!(&t.descriptor, d);
    }
}

#[tokio::test]
async fn probe_covers_whole_catalog() {
    let results = probe_availability(&fixtures(), &all_descriptors()).await;
    assert_eq!(results.len(), 18);
    let available: Vec<_> = results
        .iter()
        .filter(|(_, ok)| *ok)
        .map(|(d, _)| d.resource_name.as_str())
        .collect();
    // The malformed playoff file is readable; probing does not parse.
    assert_eq!(
        available,
        [
            "pff-nfl-regular-receiving-2024.csv",
            "pff-nfl-playoff-receiving-2024.csv",
            "pff-nfl-regular-passing-2024.csv",
            "pff-nfl-regular-rushing-2024.csv",
        ]
    );
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn scenario_a_banner_then_header() {
    let raw = "Receiving\nRk,Player,Team,G,Tgt,Rec,Yds,TD\n1,Ja'Marr Chase,CIN,17,175,127,1708,17\n";
    let records = records_from_text(raw).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Player"), Some("Ja'Marr Chase"));
    assert_eq!(records[0].get("TD"), Some("17"));
}

#[test]
fn scenario_b_league_average_never_survives() {
    let raw = "Rk,Player,Team\n1,A,X\n,League Average,\n";
    let records = records_from_text(raw).unwrap();
    assert!(records.iter().all(|r| r.get("Player") != Some("League Average")));
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn scenario_c_fantasy_points_through_pipeline() {
    let d = find(Category::Receiving, SeasonKind::Regular, 2024).unwrap();
    let table = load_table(&fixtures(), &d).await.unwrap();
    let derived = table.derived();
    assert!((derived[0].metrics.estimated_fantasy_points - 336.3).abs() < 1e-9);

    // Zero games: per-game metrics are guarded, not NaN.
    let bench = &derived[5];
    assert_eq!(bench.metrics.estimated_target_share, 0.0);
    assert_eq!(bench.metrics.estimated_yards_per_route_run, 0.0);
}

#[tokio::test]
async fn scenario_d_sort_toggle_on_yards() {
    let d = find(Category::Receiving, SeasonKind::Regular, 2024).unwrap();
    let table = load_table(&fixtures(), &d).await.unwrap();
    let derived = table.derived();

    let state = ViewState::default().with_sort("Yds");
    assert_eq!(state.sort_direction, SortDirection::Descending);
    let rows = view::apply(&derived, table.columns(), &state);
    assert_eq!(players(rows)[..3], ["Ja'Marr Chase", "Justin Jefferson", "Brian Thomas Jr."]);

    let state = state.with_sort("Yds");
    assert_eq!(state.sort_direction, SortDirection::Ascending);
    let rows = view::apply(&derived, table.columns(), &state);
    assert_eq!(players(rows)[0], "Bench Guy");
}

#[tokio::test]
async fn scenario_e_search_matches_team_case_insensitively() {
    let d = find(Category::Receiving, SeasonKind::Regular, 2024).unwrap();
    let table = load_table(&fixtures(), &d).await.unwrap();
    let derived = table.derived();

    let state = ViewState::default().with_search("cin");
    let rows = view::apply(&derived, table.columns(), &state);
    assert_eq!(players(rows), ["Ja'Marr Chase"]);
}

#[tokio::test]
async fn position_and_min_targets_filters_compose() {
    let d = find(Category::Receiving, SeasonKind::Regular, 2024).unwrap();
    let table = load_table(&fixtures(), &d).await.unwrap();
    let derived = table.derived();

    let state = ViewState::default()
        .with_category_filter(Some("TE"))
        .with_min_targets(150);
    let rows = view::apply(&derived, table.columns(), &state);
    assert_eq!(players(rows), ["Brock Bowers"]);

    assert_eq!(view::distinct_values(&derived, schema::POSITION), ["TE", "WR"]);
}

#[tokio::test]
async fn sort_by_derived_metric() {
    let d = find(Category::Receiving, SeasonKind::Regular, 2024).unwrap();
    let table = load_table(&fixtures(), &d).await.unwrap();
    let derived = table.derived();

    let key = advanced_for(Category::Receiving)
        .iter()
        .find(|c| c.label == "Fantasy Pts")
        .map(|c| c.key)
        .unwrap();
    let state = ViewState::default().with_sort(key);
    let rows = view::apply(&derived, table.columns(), &state);
    assert_eq!(players(rows)[0], "Ja'Marr Chase");
}

// ===========================================================================
// Leaders
// ===========================================================================

#[tokio::test]
async fn leaders_from_fixture_exports() {
    let cards = load_leaders(&fixtures(), 2024).await;
    let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Receiving Leader", "Passing Leader", "Rushing Leader", "Fantasy MVP"]
    );
    assert_eq!(cards[1].player, "Joe Burrow");
    assert_eq!(cards[2].value, "2005 yards");
    assert_eq!(cards[3].value, "336.3 pts");
}

#[tokio::test]
async fn leaders_for_missing_year_are_empty() {
    let source: &dyn RecordSource = &fixtures();
    assert!(load_leaders(source, 2022).await.is_empty());
}
