//! Race results views.
//!
//! The same flat result rows feed two independent views:
//! - grouped by race for the per-race breakdown
//! - flattened for the standings calculation
//!
//! Filtering by race only ever touches the grouped view.

pub mod view;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dates::parse_race_date;
use crate::models::{Placement, RaceResultRecord, StandingRow, DIVISIONS};

pub use view::{ResultsPage, ResultsView, ViewHandle, ViewState, LOAD_FAILED_MESSAGE};

/// Race filter value meaning "every race".
pub const ALL_RACES: &str = "All";

/// Bucket for results that carry no division.
pub const UNASSIGNED_DIVISION: &str = "Unassigned";

/// One racer's line in a race's results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceResultLine {
    pub name: String,
    pub division: String,
    pub placement: Placement,
}

/// All results of one race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceGroup {
    pub race: String,
    pub date: Option<String>,
    pub results: Vec<RaceResultLine>,
}

/// Group flat rows by race name, newest race first.
///
/// Within a race, results are ordered by placement. A race takes the latest
/// readable date among its rows. Races without a readable date sort last;
/// equal dates fall back to race name.
pub fn group_by_race(records: &[RaceResultRecord]) -> Vec<RaceGroup> {
    let mut groups: Vec<RaceGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let label = record.race_label();
        let idx = *index.entry(label).or_insert_with(|| {
            groups.push(RaceGroup {
                race: label.to_string(),
                date: None,
                results: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];

        if let Some(date) = record.race_date() {
            if is_later(date, group.date.as_deref()) {
                group.date = Some(date.to_string());
            }
        }

        group.results.push(RaceResultLine {
            name: record.racer_name().unwrap_or_default().to_string(),
            division: record.division().unwrap_or_default().to_string(),
            placement: record.placement,
        });
    }

    for group in &mut groups {
        group.results.sort_by(line_cmp);
    }
    groups.sort_by(race_cmp);
    groups
}

/// Whether `candidate` should replace `current` as a race's date.
fn is_later(candidate: &str, current: Option<&str>) -> bool {
    let Some(current) = current else {
        return true;
    };
    match (parse_race_date(candidate), parse_race_date(current)) {
        (Some(c), Some(cur)) => c > cur,
        (Some(_), None) => true,
        _ => false,
    }
}

fn line_cmp(a: &RaceResultLine, b: &RaceResultLine) -> Ordering {
    a.placement
        .sort_key()
        .cmp(&b.placement.sort_key())
        .then_with(|| a.division.cmp(&b.division))
        .then_with(|| a.name.cmp(&b.name))
}

fn race_cmp(a: &RaceGroup, b: &RaceGroup) -> Ordering {
    let da = a.date.as_deref().and_then(parse_race_date);
    let db = b.date.as_deref().and_then(parse_race_date);
    // `Option` orders `None` first, so comparing b to a puts undated races last
    db.cmp(&da).then_with(|| a.race.cmp(&b.race))
}

/// Project raw rows into the shape the standings calculation consumes.
pub fn flatten_for_standings(records: &[RaceResultRecord]) -> Vec<StandingRow> {
    records.iter().map(StandingRow::from).collect()
}

/// Which race the results view is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RaceFilter {
    #[default]
    All,
    Race(String),
}

impl RaceFilter {
    /// Build a filter from an optional query value; absent or "All" means all races.
    pub fn from_option(value: Option<&str>) -> Self {
        match value {
            None => RaceFilter::All,
            Some(v) if v.is_empty() || v == ALL_RACES => RaceFilter::All,
            Some(v) => RaceFilter::Race(v.to_string()),
        }
    }

    pub fn matches(&self, race: &RaceGroup) -> bool {
        match self {
            RaceFilter::All => true,
            RaceFilter::Race(name) => race.race == *name,
        }
    }
}

impl FromStr for RaceFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RaceFilter::from_option(Some(s)))
    }
}

impl fmt::Display for RaceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceFilter::All => write!(f, "{}", ALL_RACES),
            RaceFilter::Race(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for RaceFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Races matching the filter, in display order.
pub fn filter_races<'a>(races: &'a [RaceGroup], filter: &RaceFilter) -> Vec<&'a RaceGroup> {
    races.iter().filter(|r| filter.matches(r)).collect()
}

/// Choices for the race filter: "All" followed by every race name.
pub fn race_options(races: &[RaceGroup]) -> Vec<String> {
    std::iter::once(ALL_RACES.to_string())
        .chain(races.iter().map(|r| r.race.clone()))
        .collect()
}

/// One division's results within a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionBucket {
    pub division: String,
    pub results: Vec<RaceResultLine>,
}

/// A race's results split by division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceBreakdown {
    pub race: String,
    pub date: Option<String>,
    pub divisions: Vec<DivisionBucket>,
}

/// Split each race's results by division.
///
/// Every canonical division gets a bucket, even when empty. Other divisions
/// follow in name order, then results without a division under
/// [`UNASSIGNED_DIVISION`].
pub fn breakdown(races: &[&RaceGroup]) -> Vec<RaceBreakdown> {
    races.iter().map(|race| breakdown_race(race)).collect()
}

fn breakdown_race(race: &RaceGroup) -> RaceBreakdown {
    let mut divisions: Vec<DivisionBucket> = DIVISIONS
        .iter()
        .map(|d| DivisionBucket {
            division: d.to_string(),
            results: Vec::new(),
        })
        .collect();
    let mut extra: Vec<DivisionBucket> = Vec::new();
    let mut unassigned: Vec<RaceResultLine> = Vec::new();

    for line in &race.results {
        if line.division.is_empty() {
            unassigned.push(line.clone());
            continue;
        }
        let bucket = match divisions.iter_mut().find(|b| b.division == line.division) {
            Some(bucket) => bucket,
            None => match extra.iter().position(|b| b.division == line.division) {
                Some(i) => &mut extra[i],
                None => {
                    extra.push(DivisionBucket {
                        division: line.division.clone(),
                        results: Vec::new(),
                    });
                    let last = extra.len() - 1;
                    &mut extra[last]
                }
            },
        };
        bucket.results.push(line.clone());
    }

    extra.sort_by(|a, b| a.division.cmp(&b.division));
    divisions.extend(extra);
    if !unassigned.is_empty() {
        divisions.push(DivisionBucket {
            division: UNASSIGNED_DIVISION.to_string(),
            results: unassigned,
        });
    }
    for bucket in &mut divisions {
        bucket.results.sort_by(line_cmp);
    }

    RaceBreakdown {
        race: race.race.clone(),
        date: race.date.clone(),
        divisions,
    }
}
