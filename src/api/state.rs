use std::sync::Arc;

use crate::fetch::{RaceSource, ResultsSource};

#[derive(Clone)]
pub struct AppState {
    pub results: Arc<dyn ResultsSource>,
    pub races: Arc<dyn RaceSource>,
    pub cors_origin: String,
}
