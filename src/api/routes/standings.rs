use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::{state::AppState, ApiError};
use crate::calculate::aggregate;
use crate::models::{DivisionLeaders, Standings};
use crate::results::flatten_for_standings;

const DEFAULT_LEADERS: usize = 3;
const MAX_LEADERS: usize = 10;

#[derive(Debug, Deserialize)]
pub struct LeadersQuery {
    pub limit: Option<usize>,
}

async fn load_standings(state: &AppState) -> Result<Standings, ApiError> {
    let records = state.results.fetch_results().await?;
    Ok(aggregate(&flatten_for_standings(&records)))
}

/// GET /api/standings
pub async fn standings(State(state): State<AppState>) -> Result<Json<Standings>, ApiError> {
    Ok(Json(load_standings(&state).await?))
}

/// GET /api/standings/leaders?limit=
pub async fn leaders(
    State(state): State<AppState>,
    Query(query): Query<LeadersQuery>,
) -> Result<Json<Vec<DivisionLeaders>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERS);
    if limit == 0 || limit > MAX_LEADERS {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_LEADERS
        )));
    }

    let standings = load_standings(&state).await?;
    Ok(Json(standings.leaders(limit)))
}
