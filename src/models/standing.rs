//! Championship standings models.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::Placement;

/// The league's divisions, in display order.
pub const DIVISIONS: [&str; 4] = [
    "3 Year Old Division",
    "4 Year Old Division",
    "5 Year Old Division",
    "Snack Pack Division",
];

/// Whether a division name is one of the canonical [`DIVISIONS`].
pub fn is_known_division(division: &str) -> bool {
    DIVISIONS.contains(&division)
}

/// A racer's season totals within one division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub name: String,
    pub division: String,
    pub points: u32,
    pub races: u32,
    pub wins: u32,
    pub seconds: u32,
    pub thirds: u32,
}

impl StandingEntry {
    /// Create an empty entry for a racer in a division.
    pub fn new(name: impl Into<String>, division: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            division: division.into(),
            points: 0,
            races: 0,
            wins: 0,
            seconds: 0,
            thirds: 0,
        }
    }

    /// Add one race result worth `points`.
    pub fn record(&mut self, placement: Placement, points: u32) {
        self.points += points;
        self.races += 1;
        match placement {
            Placement::Position(1) => self.wins += 1,
            Placement::Position(2) => self.seconds += 1,
            Placement::Position(3) => self.thirds += 1,
            _ => {}
        }
    }
}

/// Ranked entries for one division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionStandings {
    pub division: String,
    pub entries: Vec<StandingEntry>,
}

/// Standings for every division.
///
/// Canonical divisions always come first, in [`DIVISIONS`] order, followed by
/// any other division seen in the data. Serializes as a JSON object keyed by
/// division name, preserving that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Standings {
    divisions: Vec<DivisionStandings>,
}

impl Standings {
    pub fn new(divisions: Vec<DivisionStandings>) -> Self {
        Self { divisions }
    }

    /// Entries for a division, if the division is present.
    pub fn get(&self, division: &str) -> Option<&[StandingEntry]> {
        self.divisions
            .iter()
            .find(|d| d.division == division)
            .map(|d| d.entries.as_slice())
    }

    pub fn divisions(&self) -> &[DivisionStandings] {
        &self.divisions
    }

    pub fn division_names(&self) -> Vec<&str> {
        self.divisions.iter().map(|d| d.division.as_str()).collect()
    }

    /// The top `limit` racers of every division that has entries.
    pub fn leaders(&self, limit: usize) -> Vec<DivisionLeaders> {
        self.divisions
            .iter()
            .filter(|d| !d.entries.is_empty())
            .map(|d| DivisionLeaders {
                division: d.division.clone(),
                leaders: d
                    .entries
                    .iter()
                    .take(limit)
                    .enumerate()
                    .map(|(idx, e)| Leader {
                        position: idx as u32 + 1,
                        name: e.name.clone(),
                        points: e.points,
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Serialize for Standings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.divisions.len()))?;
        for d in &self.divisions {
            map.serialize_entry(&d.division, &d.entries)?;
        }
        map.end()
    }
}

/// A podium-style summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leader {
    pub position: u32,
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionLeaders {
    pub division: String,
    pub leaders: Vec<Leader>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, points: u32) -> StandingEntry {
        StandingEntry {
            points,
            ..StandingEntry::new(name, DIVISIONS[0])
        }
    }

    #[test]
    fn test_entry_record_podium() {
        let mut e = StandingEntry::new("Liam", DIVISIONS[0]);
        e.record(Placement::Position(1), 13);
        e.record(Placement::Position(3), 8);
        e.record(Placement::Position(7), 1);

        assert_eq!(e.points, 22);
        assert_eq!(e.races, 3);
        assert_eq!(e.wins, 1);
        assert_eq!(e.seconds, 0);
        assert_eq!(e.thirds, 1);
    }

    #[test]
    fn test_entry_record_unparsed() {
        let mut e = StandingEntry::new("Ava", DIVISIONS[1]);
        e.record(Placement::Unparsed, 1);

        assert_eq!(e.races, 1);
        assert_eq!((e.wins, e.seconds, e.thirds), (0, 0, 0));
    }

    #[test]
    fn test_known_division() {
        assert!(is_known_division("Snack Pack Division"));
        assert!(!is_known_division("snack pack division"));
        assert!(!is_known_division("Lil Stingers"));
    }

    #[test]
    fn test_standings_get() {
        let standings = Standings::new(vec![DivisionStandings {
            division: DIVISIONS[0].to_string(),
            entries: vec![],
        }]);

        assert_eq!(standings.get(DIVISIONS[0]), Some(&[][..]));
        assert_eq!(standings.get("Lil Stingers"), None);
    }

    #[test]
    fn test_leaders_top_n() {
        let standings = Standings::new(vec![
            DivisionStandings {
                division: DIVISIONS[0].to_string(),
                entries: vec![entry("A", 30), entry("B", 20), entry("C", 10), entry("D", 5)],
            },
            DivisionStandings {
                division: DIVISIONS[1].to_string(),
                entries: vec![],
            },
        ]);

        let leaders = standings.leaders(3);
        assert_eq!(leaders.len(), 1);
        assert_eq!(leaders[0].leaders.len(), 3);
        assert_eq!(leaders[0].leaders[0].position, 1);
        assert_eq!(leaders[0].leaders[2].name, "C");
    }

    #[test]
    fn test_standings_serialize_preserves_order() {
        let standings = Standings::new(vec![
            DivisionStandings {
                division: "Snack Pack Division".to_string(),
                entries: vec![],
            },
            DivisionStandings {
                division: "3 Year Old Division".to_string(),
                entries: vec![],
            },
        ]);

        let json = serde_json::to_string(&standings).unwrap();
        assert_eq!(json, r#"{"Snack Pack Division":[],"3 Year Old Division":[]}"#);
    }
}
