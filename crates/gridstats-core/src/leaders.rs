// Leader cards: the best single-season marks across categories.

use tracing::debug;

use crate::catalog::{find, Category, SeasonKind};
use crate::fetch::RecordSource;
use crate::loader::{load_many, StatTable};
use crate::metrics::fantasy_points;
use crate::record::RawRecord;

/// One summary card.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderCard {
    pub title: String,
    pub player: String,
    pub team: String,
    pub value: String,
    pub subtitle: String,
}

impl LeaderCard {
    fn for_record(title: &str, record: &RawRecord, value: String, subtitle: String) -> Self {
        LeaderCard {
            title: title.to_string(),
            player: field(record, "Player").to_string(),
            team: field(record, "Team").to_string(),
            value,
            subtitle,
        }
    }
}

fn field<'a>(record: &'a RawRecord, key: &str) -> &'a str {
    record.get(key).unwrap_or("")
}

/// The record maximizing `score`. On ties the earliest record wins.
fn max_by_score<F>(records: &[RawRecord], score: F) -> Option<&RawRecord>
where
    F: Fn(&RawRecord) -> f64,
{
    let mut iter = records.iter();
    let mut best = iter.next()?;
    let mut best_score = score(best);
    for record in iter {
        let s = score(record);
        if s > best_score {
            best = record;
            best_score = s;
        }
    }
    Some(best)
}

/// Build the cards from already-loaded record sets. Empty sets contribute
/// nothing.
pub fn compute_leaders(
    receiving: &[RawRecord],
    passing: &[RawRecord],
    rushing: &[RawRecord],
) -> Vec<LeaderCard> {
    let mut cards = Vec::new();

    if let Some(yards) = max_by_score(receiving, |r| r.number("Yds")) {
        cards.push(LeaderCard::for_record(
            "Receiving Leader",
            yards,
            format!("{} yards", field(yards, "Yds")),
            format!("{} rec, {} TD", field(yards, "Rec"), field(yards, "TD")),
        ));

        if let Some(tds) = max_by_score(receiving, |r| r.number("TD")) {
            if field(tds, "Player") != field(yards, "Player") {
                cards.push(LeaderCard::for_record(
                    "Touchdown Leader",
                    tds,
                    format!("{} TDs", field(tds, "TD")),
                    format!("{} yards", field(tds, "Yds")),
                ));
            }
        }
    }

    if let Some(leader) = max_by_score(passing, |r| r.number("Yds")) {
        cards.push(LeaderCard::for_record(
            "Passing Leader",
            leader,
            format!("{} yards", field(leader, "Yds")),
            format!("{} TD, {}% completion", field(leader, "TD"), field(leader, "Cmp%")),
        ));
    }

    if let Some(leader) = max_by_score(rushing, |r| r.number("Yds")) {
        cards.push(LeaderCard::for_record(
            "Rushing Leader",
            leader,
            format!("{} yards", field(leader, "Yds")),
            format!("{} Y/A, {} TD", field(leader, "Y/A"), field(leader, "TD")),
        ));
    }

    if let Some(mvp) = max_by_score(receiving, fantasy_points) {
        cards.push(LeaderCard::for_record(
            "Fantasy MVP",
            mvp,
            format!("{:.1} pts", fantasy_points(mvp)),
            "Half-PPR Scoring".to_string(),
        ));
    }

    cards
}

/// Fetch the three regular-season tables of `year` concurrently and build
/// the cards. Missing tables just mean fewer cards.
pub async fn load_leaders(source: &dyn RecordSource, year: u16) -> Vec<LeaderCard> {
    let descriptors: Vec<_> = Category::ALL
        .iter()
        .filter_map(|&c| find(c, SeasonKind::Regular, year))
        .collect();
    let tables = load_many(source, &descriptors).await;

    let cards = compute_leaders(
        records_for(&tables, Category::Receiving),
        records_for(&tables, Category::Passing),
        records_for(&tables, Category::Rushing),
    );
    debug!("{} leader cards for {year}", cards.len());
    cards
}

fn records_for(tables: &[StatTable], category: Category) -> &[RawRecord] {
    tables
        .iter()
        .find(|t| t.category() == category)
        .map(|t| t.records.as_slice())
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
