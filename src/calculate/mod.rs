//! Championship standings calculation.
//!
//! Turns flat result rows into ranked per-division standings:
//! - Points by placement (13 / 10 / 8, everyone else 1)
//! - Win / second / third counters
//! - Deterministic ranking with name as the final tie-break
//!
//! Every call rebuilds the standings from scratch; nothing is cached.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{
    is_known_division, DivisionStandings, Placement, StandingEntry, StandingRow, Standings,
    DIVISIONS,
};

/// Points awarded for podium placements.
pub const POINTS_BY_PLACEMENT: [(i64, u32); 3] = [(1, 13), (2, 10), (3, 8)];

/// Points for any placement not in [`POINTS_BY_PLACEMENT`].
pub const DEFAULT_POINTS: u32 = 1;

/// Points earned by one placement.
pub fn points_for_placement(placement: Placement) -> u32 {
    placement
        .position()
        .and_then(|p| {
            POINTS_BY_PLACEMENT
                .iter()
                .find(|(pos, _)| *pos == p)
                .map(|(_, pts)| *pts)
        })
        .unwrap_or(DEFAULT_POINTS)
}

/// Ranking order: points, wins, seconds, thirds, races (all descending),
/// then name ascending ignoring case.
pub fn standings_cmp(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.seconds.cmp(&a.seconds))
        .then_with(|| b.thirds.cmp(&a.thirds))
        .then_with(|| b.races.cmp(&a.races))
        .then_with(|| compare_names(&a.name, &b.name))
}

/// Name order ignoring case and accents ("Élodie" sorts with "Elodie").
/// Names that fold to the same key fall back to lowercase, then byte order,
/// so the ranking stays total.
fn compare_names(a: &str, b: &str) -> Ordering {
    fold_name(a)
        .cmp(&fold_name(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Primary-strength collation key: decomposed, marks stripped, lowercased.
fn fold_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Aggregate result rows into ranked standings.
///
/// Rows missing a division or racer name are skipped. All canonical
/// divisions are present in the output, empty if nobody raced in them;
/// other divisions follow in name order.
pub fn aggregate(rows: &[StandingRow]) -> Standings {
    let mut totals: HashMap<(&str, &str), StandingEntry> = HashMap::new();

    for row in rows {
        let Some((division, name)) = row.key() else {
            debug!("Skipping result without division or racer name");
            continue;
        };

        if !row.placement.is_valid() {
            warn!(
                "Placement {} for {} in {} is not a finishing position; scoring {} point",
                row.placement, name, division, DEFAULT_POINTS
            );
        }

        totals
            .entry((division, name))
            .or_insert_with(|| StandingEntry::new(name, division))
            .record(row.placement, points_for_placement(row.placement));
    }

    let mut by_division: BTreeMap<&str, Vec<StandingEntry>> = DIVISIONS
        .iter()
        .map(|d| (*d, Vec::new()))
        .collect();
    for ((division, _), entry) in totals {
        by_division.entry(division).or_default().push(entry);
    }

    let mut known = Vec::with_capacity(DIVISIONS.len());
    let mut extra = Vec::new();
    for (division, mut entries) in by_division {
        entries.sort_by(standings_cmp);
        let standing = DivisionStandings {
            division: division.to_string(),
            entries,
        };
        if is_known_division(division) {
            known.push(standing);
        } else {
            extra.push(standing);
        }
    }

    known.sort_by_key(|d| DIVISIONS.iter().position(|k| *k == d.division));
    known.extend(extra);

    Standings::new(known)
}
