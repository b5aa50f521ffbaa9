//! League API client.
//!
//! Talks to the league backend (`/api/results`, `/api/races`) and maps the
//! JSON rows into the crate's canonical models at this boundary. Requests
//! carry the session's bearer token when one is present.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::ApiConfig;
use crate::models::{Race, RaceResultRecord};
use crate::session::SessionContext;

/// Errors that can occur while talking to the league API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can supply the flat result rows.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    async fn fetch_results(&self) -> Result<Vec<RaceResultRecord>, FetchError>;
}

/// Anything that can supply the race calendar.
#[async_trait]
pub trait RaceSource: Send + Sync {
    async fn fetch_races(&self) -> Result<Vec<Race>, FetchError>;
}

/// HTTP client for the league API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client for the configured API.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("kart-league/0.1.0")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: Self::normalize_base(&config.base_url)?,
            session,
        })
    }

    /// Parse the base URL, making sure relative joins append to its path.
    fn normalize_base(raw: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(raw.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Full URL for an API path such as `results`.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// GET a JSON array; a `null` body is treated as empty.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, FetchError> {
        let url = self.endpoint(path)?;
        info!("Fetching {}", url);

        let mut request = self.client.get(url.as_str());
        if let Some(token) = self.session.current().token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        let rows: Option<Vec<T>> = serde_json::from_slice(&body)?;
        let rows = rows.unwrap_or_default();
        debug!("{} returned {} rows", path, rows.len());
        Ok(rows)
    }

    /// `GET /results`
    pub async fn results(&self) -> Result<Vec<RaceResultRecord>, FetchError> {
        self.get_list("results").await
    }

    /// `GET /races`
    pub async fn races(&self) -> Result<Vec<Race>, FetchError> {
        self.get_list("races").await
    }
}

#[async_trait]
impl ResultsSource for ApiClient {
    async fn fetch_results(&self) -> Result<Vec<RaceResultRecord>, FetchError> {
        self.results().await
    }
}

#[async_trait]
impl RaceSource for ApiClient {
    async fn fetch_races(&self) -> Result<Vec<Race>, FetchError> {
        self.races().await
    }
}
