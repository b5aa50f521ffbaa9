//! HTTP facade.
//!
//! Axum-based JSON API serving the derived league views (standings,
//! per-race results, race calendar). Every request fetches fresh rows from
//! the league API and recomputes; nothing is cached between requests.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::fetch::FetchError;
use crate::results::LOAD_FAILED_MESSAGE;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Upstream(String),
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        error!("League API request failed: {}", e);
        ApiError::Upstream(LOAD_FAILED_MESSAGE.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/standings", get(routes::standings::standings))
        .route("/api/standings/leaders", get(routes::standings::leaders))
        .route("/api/results", get(routes::results::results))
        .route("/api/results/breakdown", get(routes::results::breakdown))
        .route("/api/races/calendar", get(routes::races::calendar))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state(FakeLeague {
            results: None,
            races: None,
        }));
        let (status, json) = get_json(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[test]
    fn test_upstream_error_hides_details() {
        let err: ApiError = FetchError::InvalidUrl("http://secret-host".to_string()).into();
        assert_eq!(err.to_string(), LOAD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_upstream_error_response() {
        let app = build_router(state(FakeLeague {
            results: None,
            races: None,
        }));
        let (status, json) = get_json(app, "/api/standings").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "UPSTREAM_UNAVAILABLE");
        assert_eq!(json["error"]["message"], LOAD_FAILED_MESSAGE);
    }
}
