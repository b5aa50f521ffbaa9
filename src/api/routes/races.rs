use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::api::{state::AppState, ApiError};
use crate::models::Race;
use crate::schedule::RaceCalendar;

const DEFAULT_NEXT: usize = 3;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub next: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    /// The soonest upcoming races (home page)
    pub next: Vec<Race>,
    pub upcoming: Vec<Race>,
    pub past: Vec<Race>,
}

/// GET /api/races/calendar?next=
pub async fn calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, ApiError> {
    let races = state.races.fetch_races().await?;
    let calendar = RaceCalendar::split(races, Local::now().date_naive());

    Ok(Json(CalendarResponse {
        next: calendar.next(query.next.unwrap_or(DEFAULT_NEXT)).to_vec(),
        upcoming: calendar.upcoming,
        past: calendar.past,
    }))
}
