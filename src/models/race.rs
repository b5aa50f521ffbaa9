//! Scheduled race model (`GET /api/races`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_race_date;

/// A race on the league calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, alias = "name")]
    pub race_name: String,

    #[serde(default, alias = "date")]
    pub race_date: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Absent means registration is required
    #[serde(default)]
    pub requires_registration: Option<bool>,
}

impl Race {
    pub fn new(race_name: impl Into<String>, race_date: impl Into<String>) -> Self {
        Self {
            id: None,
            race_name: race_name.into(),
            race_date: Some(race_date.into()),
            location: None,
            description: None,
            requires_registration: None,
        }
    }

    /// Builder method to set location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Parsed race date, if present and readable.
    pub fn date(&self) -> Option<NaiveDate> {
        self.race_date.as_deref().and_then(parse_race_date)
    }

    pub fn needs_registration(&self) -> bool {
        self.requires_registration.unwrap_or(true)
    }
}
