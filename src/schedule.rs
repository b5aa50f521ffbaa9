//! Race calendar: upcoming and past races.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Race;

/// Races split around a reference day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RaceCalendar {
    /// Today or later, soonest first
    pub upcoming: Vec<Race>,
    /// Before today, most recent first
    pub past: Vec<Race>,
}

impl RaceCalendar {
    /// Split races around `today`. Races without a readable date are left out.
    pub fn split(races: Vec<Race>, today: NaiveDate) -> Self {
        let mut dated: Vec<(NaiveDate, Race)> = races
            .into_iter()
            .filter_map(|r| r.date().map(|d| (d, r)))
            .collect();
        dated.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.race_name.cmp(&b.race_name)));

        let (upcoming, mut past): (Vec<_>, Vec<_>) =
            dated.into_iter().partition(|(d, _)| *d >= today);
        past.reverse();

        Self {
            upcoming: upcoming.into_iter().map(|(_, r)| r).collect(),
            past: past.into_iter().map(|(_, r)| r).collect(),
        }
    }

    /// The next `n` upcoming races.
    pub fn next(&self, n: usize) -> &[Race] {
        &self.upcoming[..n.min(self.upcoming.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn races() -> Vec<Race> {
        vec![
            Race::new("Fall Finale", "2026-10-03"),
            Race::new("Spring Opener", "2026-03-14"),
            Race::new("Kickoff", "2026-06-01"),
            Race::new("Summer Sprint", "2026-06-20"),
            Race::new("Winter Warmup", "2025-12-06"),
            Race::new("TBD Exhibition", "to be announced"),
        ]
    }

    fn names(races: &[Race]) -> Vec<&str> {
        races.iter().map(|r| r.race_name.as_str()).collect()
    }

    #[test]
    fn test_split_upcoming_and_past() {
        let calendar = RaceCalendar::split(races(), today());

        assert_eq!(
            names(&calendar.upcoming),
            vec!["Kickoff", "Summer Sprint", "Fall Finale"]
        );
        assert_eq!(names(&calendar.past), vec!["Spring Opener", "Winter Warmup"]);
    }

    #[test]
    fn test_undated_races_dropped() {
        let calendar = RaceCalendar::split(races(), today());
        let all: Vec<_> = calendar.upcoming.iter().chain(calendar.past.iter()).collect();
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_next_n() {
        let calendar = RaceCalendar::split(races(), today());

        assert_eq!(names(calendar.next(2)), vec!["Kickoff", "Summer Sprint"]);
        assert_eq!(calendar.next(10).len(), 3);
        assert!(RaceCalendar::default().next(3).is_empty());
    }
}
