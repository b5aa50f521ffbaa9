//! Flat race-result rows as served by `GET /api/results`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Label used for results whose race has no name.
pub const UNKNOWN_RACE: &str = "Unknown Race";

/// Finishing position within one race and division.
///
/// The API transmits placements as anything coercible to a number, so the
/// value is normalised once at the boundary. Integers, integer-valued floats
/// and numeric strings become `Position`; everything else is `Unparsed`.
/// Zero and negative positions are kept as-is and scored like any other
/// off-podium finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    Position(i64),
    #[default]
    Unparsed,
}

impl Placement {
    /// Coerce a raw JSON value into a placement.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Placement::Position(i),
                None => n.as_f64().map_or(Placement::Unparsed, Self::from_float),
            },
            Value::String(s) => Self::parse(s),
            _ => Placement::Unparsed,
        }
    }

    /// Parse a textual placement ("2", " 3 ", "1.0").
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Placement::Position(i);
        }
        s.parse::<f64>()
            .map_or(Placement::Unparsed, Self::from_float)
    }

    fn from_float(f: f64) -> Self {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Placement::Position(f as i64)
        } else {
            Placement::Unparsed
        }
    }

    pub fn position(&self) -> Option<i64> {
        match self {
            Placement::Position(p) => Some(*p),
            Placement::Unparsed => None,
        }
    }

    /// A real finishing position is 1 or greater.
    pub fn is_valid(&self) -> bool {
        matches!(self, Placement::Position(p) if *p >= 1)
    }

    /// Ordering key for display; unparsed placements sort last.
    pub fn sort_key(&self) -> i64 {
        self.position().unwrap_or(i64::MAX)
    }
}

impl From<i64> for Placement {
    fn from(p: i64) -> Self {
        Placement::Position(p)
    }
}

impl From<i32> for Placement {
    fn from(p: i32) -> Self {
        Placement::Position(i64::from(p))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Position(p) => f.pad(&p.to_string()),
            Placement::Unparsed => f.pad("-"),
        }
    }
}

impl Serialize for Placement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Placement::Position(p) => serializer.serialize_i64(*p),
            Placement::Unparsed => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Placement::from_value(&value))
    }
}

/// One racer's result in one race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResultRecord {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub race_name: Option<String>,

    /// Date-like string (usually `YYYY-MM-DD`)
    #[serde(default)]
    pub race_date: Option<String>,

    #[serde(default)]
    pub division: Option<String>,

    #[serde(default)]
    pub racer_name: Option<String>,

    #[serde(default)]
    pub placement: Placement,
}

impl RaceResultRecord {
    /// Create a record for the given race, division and racer.
    pub fn new(
        race_name: impl Into<String>,
        division: impl Into<String>,
        racer_name: impl Into<String>,
        placement: impl Into<Placement>,
    ) -> Self {
        Self {
            id: None,
            race_name: Some(race_name.into()),
            race_date: None,
            division: Some(division.into()),
            racer_name: Some(racer_name.into()),
            placement: placement.into(),
        }
    }

    /// Builder method to set the race date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.race_date = Some(date.into());
        self
    }

    /// Race name, or [`UNKNOWN_RACE`] when missing or empty.
    pub fn race_label(&self) -> &str {
        non_empty(&self.race_name).unwrap_or(UNKNOWN_RACE)
    }

    pub fn division(&self) -> Option<&str> {
        non_empty(&self.division)
    }

    pub fn racer_name(&self) -> Option<&str> {
        non_empty(&self.racer_name)
    }

    pub fn race_date(&self) -> Option<&str> {
        non_empty(&self.race_date)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// The projection of a result the standings computation consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRow {
    #[serde(default)]
    pub division: Option<String>,

    #[serde(default)]
    pub racer_name: Option<String>,

    #[serde(default)]
    pub placement: Placement,
}

impl StandingRow {
    pub fn new(
        division: impl Into<String>,
        racer_name: impl Into<String>,
        placement: impl Into<Placement>,
    ) -> Self {
        Self {
            division: Some(division.into()),
            racer_name: Some(racer_name.into()),
            placement: placement.into(),
        }
    }

    /// The `(division, racer)` key, when both parts are present.
    pub fn key(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.division)?, non_empty(&self.racer_name)?))
    }
}

impl From<&RaceResultRecord> for StandingRow {
    fn from(record: &RaceResultRecord) -> Self {
        Self {
            division: record.division.clone(),
            racer_name: record.racer_name.clone(),
            placement: record.placement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placement_from_integer() {
        assert_eq!(Placement::from_value(&json!(3)), Placement::Position(3));
        assert_eq!(Placement::from_value(&json!(-2)), Placement::Position(-2));
    }

    #[test]
    fn test_placement_from_string_and_float() {
        assert_eq!(Placement::from_value(&json!("2")), Placement::Position(2));
        assert_eq!(Placement::from_value(&json!(" 4 ")), Placement::Position(4));
        assert_eq!(Placement::from_value(&json!(1.0)), Placement::Position(1));
        assert_eq!(Placement::from_value(&json!("1.0")), Placement::Position(1));
    }

    #[test]
    fn test_placement_unparsed() {
        assert_eq!(Placement::from_value(&json!(null)), Placement::Unparsed);
        assert_eq!(Placement::from_value(&json!("first")), Placement::Unparsed);
        assert_eq!(Placement::from_value(&json!(2.5)), Placement::Unparsed);
        assert_eq!(Placement::from_value(&json!("")), Placement::Unparsed);
        assert_eq!(Placement::from_value(&json!([1])), Placement::Unparsed);
    }

    #[test]
    fn test_placement_validity_and_sort_key() {
        assert!(Placement::Position(1).is_valid());
        assert!(!Placement::Position(0).is_valid());
        assert!(!Placement::Unparsed.is_valid());
        assert!(Placement::Position(40).sort_key() < Placement::Unparsed.sort_key());
    }

    #[test]
    fn test_record_deserialization() {
        let record: RaceResultRecord = serde_json::from_value(json!({
            "id": 7,
            "raceName": "Spring Opener",
            "raceDate": "2026-03-14",
            "racerName": "Liam Smith",
            "division": "3 Year Old Division",
            "placement": "1"
        }))
        .unwrap();

        assert_eq!(record.id, Some(7));
        assert_eq!(record.race_label(), "Spring Opener");
        assert_eq!(record.race_date(), Some("2026-03-14"));
        assert_eq!(record.placement, Placement::Position(1));
    }

    #[test]
    fn test_record_missing_fields() {
        let record: RaceResultRecord =
            serde_json::from_value(json!({ "raceName": "", "raceDate": null })).unwrap();

        assert_eq!(record.race_label(), UNKNOWN_RACE);
        assert_eq!(record.race_date(), None);
        assert_eq!(record.division(), None);
        assert_eq!(record.racer_name(), None);
        assert_eq!(record.placement, Placement::Unparsed);
    }

    #[test]
    fn test_standing_row_key() {
        let row = StandingRow::new("Snack Pack Division", "Ava", 2);
        assert_eq!(row.key(), Some(("Snack Pack Division", "Ava")));

        let row = StandingRow::new("", "Ava", 2);
        assert_eq!(row.key(), None);

        let row = StandingRow {
            division: Some("Snack Pack Division".to_string()),
            racer_name: None,
            placement: Placement::Position(1),
        };
        assert_eq!(row.key(), None);
    }

    #[test]
    fn test_placement_serializes_as_number_or_null() {
        assert_eq!(serde_json::to_value(Placement::Position(2)).unwrap(), json!(2));
        assert_eq!(serde_json::to_value(Placement::Unparsed).unwrap(), json!(null));
    }
}
