//! Plain-text rendering for the terminal.

use std::fmt::Write;

use crate::dates::format_race_date;
use crate::models::{DivisionLeaders, Race, Standings};
use crate::results::RaceBreakdown;
use crate::schedule::RaceCalendar;

pub const NO_STANDINGS: &str = "No standings yet.";
pub const NO_RESULTS: &str = "No race results found.";
pub const NO_RACES: &str = "No races found.";
pub const NO_UPCOMING_RACES: &str = "No upcoming races scheduled.";

/// Standings tables, one per division. `only` limits output to one division.
pub fn render_standings(standings: &Standings, only: Option<&str>) -> String {
    let mut out = String::new();

    for division in standings.divisions() {
        if only.is_some_and(|d| d != division.division) {
            continue;
        }

        let _ = writeln!(out, "{}", division.division);
        if division.entries.is_empty() {
            let _ = writeln!(out, "  {}", NO_STANDINGS);
            let _ = writeln!(out);
            continue;
        }

        let width = name_width(division.entries.iter().map(|e| e.name.as_str()));
        let _ = writeln!(out, "  {:>3}  {:<width$}  {:>6}  {:>5}", "#", "Racer", "Points", "Races");
        for (idx, entry) in division.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>3}  {:<width$}  {:>6}  {:>5}",
                idx + 1,
                entry.name,
                entry.points,
                entry.races
            );
        }
        let _ = writeln!(out);
    }

    out
}

/// Per-race results, split by division.
pub fn render_breakdown(races: &[RaceBreakdown]) -> String {
    if races.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    let mut out = String::new();
    for race in races {
        let _ = writeln!(out, "{}", race.race);
        let date = format_race_date(race.date.as_deref());
        if !date.is_empty() {
            let _ = writeln!(out, "{}", date);
        }

        for bucket in race.divisions.iter().filter(|b| !b.results.is_empty()) {
            let _ = writeln!(out, "  {}", bucket.division);
            for line in &bucket.results {
                let _ = writeln!(out, "    {:>3}  {}", line.placement, line.name);
            }
        }
        let _ = writeln!(out);
    }

    out
}

/// Top racers per division.
pub fn render_leaders(leaders: &[DivisionLeaders]) -> String {
    if leaders.is_empty() {
        return format!("{}\n", NO_STANDINGS);
    }

    let mut out = String::new();
    for division in leaders {
        let _ = writeln!(out, "{}", division.division);
        for leader in &division.leaders {
            let _ = writeln!(
                out,
                "  {}. {} ({} pts)",
                leader.position, leader.name, leader.points
            );
        }
    }

    out
}

/// Upcoming and past races. Upcoming races that take sign-ups are flagged.
pub fn render_calendar(calendar: &RaceCalendar) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Upcoming Races");
    render_race_list(&mut out, &calendar.upcoming, true);
    let _ = writeln!(out);
    let _ = writeln!(out, "Past Races");
    render_race_list(&mut out, &calendar.past, false);

    out
}

/// The soonest upcoming races, as on the home page.
pub fn render_next_races(races: &[Race]) -> String {
    if races.is_empty() {
        return format!("{}\n", NO_UPCOMING_RACES);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Next Races");
    render_race_list(&mut out, races, true);
    out
}

fn render_race_list(out: &mut String, races: &[Race], show_registration: bool) {
    if races.is_empty() {
        let _ = writeln!(out, "  {}", NO_RACES);
        return;
    }
    for race in races {
        let date = format_race_date(race.race_date.as_deref());
        let _ = write!(out, "  {}  {}", date, race.race_name);
        if let Some(location) = race.location.as_deref() {
            let _ = write!(out, " ({})", location);
        }
        if show_registration && race.needs_registration() {
            let _ = write!(out, "  [registration required]");
        }
        let _ = writeln!(out);
    }
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max("Racer".len())
}
