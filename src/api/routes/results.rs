use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{state::AppState, ApiError};
use crate::results::{RaceBreakdown, RaceFilter, RaceGroup, ResultsPage};

#[derive(Debug, Deserialize)]
pub struct RaceQuery {
    pub race: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsResponse {
    pub selected: RaceFilter,
    pub race_options: Vec<String>,
    pub races: Vec<RaceGroup>,
}

async fn load_page(state: &AppState, query: &RaceQuery) -> Result<ResultsPage, ApiError> {
    let records = state.results.fetch_results().await?;
    let mut page = ResultsPage::from_records(&records);
    page.select(RaceFilter::from_option(query.race.as_deref()));
    Ok(page)
}

/// GET /api/results?race=
pub async fn results(
    State(state): State<AppState>,
    Query(query): Query<RaceQuery>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let page = load_page(&state, &query).await?;

    Ok(Json(ResultsResponse {
        race_options: page.race_options(),
        races: page.visible_races().into_iter().cloned().collect(),
        selected: page.selected,
    }))
}

/// GET /api/results/breakdown?race=
pub async fn breakdown(
    State(state): State<AppState>,
    Query(query): Query<RaceQuery>,
) -> Result<Json<Vec<RaceBreakdown>>, ApiError> {
    let page = load_page(&state, &query).await?;
    Ok(Json(page.breakdown()))
}
