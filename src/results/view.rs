//! Results page state: one fetch per activation, then a terminal state.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{
    breakdown, filter_races, flatten_for_standings, group_by_race, race_options, RaceBreakdown,
    RaceFilter, RaceGroup,
};
use crate::calculate::aggregate;
use crate::fetch::ResultsSource;
use crate::models::{RaceResultRecord, Standings};

/// What the user sees when results cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load results. Please try again later.";

/// Loaded results: the race list, the standings and the current filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsPage {
    pub races: Vec<RaceGroup>,
    pub standings: Standings,
    pub selected: RaceFilter,
}

impl ResultsPage {
    /// Build both views from the full set of fetched rows.
    pub fn from_records(records: &[RaceResultRecord]) -> Self {
        Self {
            races: group_by_race(records),
            standings: aggregate(&flatten_for_standings(records)),
            selected: RaceFilter::All,
        }
    }

    /// Change the selected race. Standings are unaffected.
    pub fn select(&mut self, filter: RaceFilter) {
        self.selected = filter;
    }

    pub fn visible_races(&self) -> Vec<&RaceGroup> {
        filter_races(&self.races, &self.selected)
    }

    pub fn breakdown(&self) -> Vec<RaceBreakdown> {
        breakdown(&self.visible_races())
    }

    pub fn race_options(&self) -> Vec<String> {
        race_options(&self.races)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready(ResultsPage),
    Failed(String),
}

impl ViewState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }
}

/// Drives the results page.
pub struct ResultsView;

impl ResultsView {
    /// Fetch once and build the page, converting failures into a
    /// user-facing [`ViewState::Failed`].
    pub async fn load(source: &dyn ResultsSource) -> ViewState {
        match source.fetch_results().await {
            Ok(records) => {
                info!("Loaded {} results", records.len());
                ViewState::Ready(ResultsPage::from_records(&records))
            }
            Err(e) => {
                error!("Error loading results: {}", e);
                ViewState::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Start loading in the background. The returned handle observes the
    /// state; it may be dropped before the fetch settles.
    pub fn activate(source: Arc<dyn ResultsSource>) -> ViewHandle {
        let (tx, rx) = watch::channel(ViewState::Loading);
        let task = tokio::spawn(async move {
            let state = Self::load(source.as_ref()).await;
            if tx.send(state).is_err() {
                debug!("Results view closed before load finished; discarding");
            }
        });
        ViewHandle { rx, task }
    }
}

/// A live results page.
pub struct ViewHandle {
    rx: watch::Receiver<ViewState>,
    task: JoinHandle<()>,
}

impl ViewHandle {
    /// Current state (may still be loading).
    pub fn state(&self) -> ViewState {
        self.rx.borrow().clone()
    }

    /// Wait for the load to finish.
    pub async fn settled(mut self) -> ViewState {
        loop {
            let state = self.rx.borrow_and_update().clone();
            if state.is_settled() {
                return state;
            }
            if self.rx.changed().await.is_err() {
                // Loader went away without reporting
                let state = self.rx.borrow().clone();
                return match state {
                    ViewState::Loading => ViewState::Failed(LOAD_FAILED_MESSAGE.to_string()),
                    settled => settled,
                };
            }
        }
    }

    /// Stop observing. The load keeps running and its result is dropped.
    pub fn detach(self) -> JoinHandle<()> {
        drop(self.rx);
        self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const THREE: &str = "3 Year Old Division";

    struct FixedSource {
        records: Option<Vec<RaceResultRecord>>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn ok(records: Vec<RaceResultRecord>) -> Self {
            Self {
                records: Some(records),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                records: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ResultsSource for FixedSource {
        async fn fetch_results(&self) -> Result<Vec<RaceResultRecord>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.records.clone().ok_or(FetchError::HttpStatus {
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        }
    }

    struct GatedSource {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl ResultsSource for GatedSource {
        async fn fetch_results(&self) -> Result<Vec<RaceResultRecord>, FetchError> {
            self.gate.notified().await;
            Ok(vec![RaceResultRecord::new("Late Race", THREE, "Liam", 1)])
        }
    }

    fn records() -> Vec<RaceResultRecord> {
        vec![
            RaceResultRecord::new("Spring Opener", THREE, "Liam", 1).with_date("2026-03-14"),
            RaceResultRecord::new("Summer Sprint", THREE, "Ava", 1).with_date("2026-06-20"),
            RaceResultRecord::new("Summer Sprint", THREE, "Liam", 2).with_date("2026-06-20"),
        ]
    }

    #[tokio::test]
    async fn test_load_success() {
        let source = FixedSource::ok(records());
        let state = ResultsView::load(&source).await;

        let ViewState::Ready(page) = state else {
            panic!("expected ready state");
        };
        assert_eq!(page.races.len(), 2);
        assert_eq!(page.standings.get(THREE).unwrap()[0].name, "Liam");
        assert_eq!(page.selected, RaceFilter::All);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_failure_is_user_visible() {
        let state = ResultsView::load(&FixedSource::failing()).await;
        assert_eq!(state, ViewState::Failed(LOAD_FAILED_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_filter_does_not_change_standings() {
        let mut page = ResultsPage::from_records(&records());
        let before = page.standings.clone();

        page.select(RaceFilter::Race("Spring Opener".to_string()));

        assert_eq!(page.visible_races().len(), 1);
        assert_eq!(page.breakdown().len(), 1);
        assert_eq!(page.standings, before);
        assert_eq!(page.race_options(), vec!["All", "Summer Sprint", "Spring Opener"]);
    }

    #[tokio::test]
    async fn test_activate_reports_loading_then_ready() {
        let gate = Arc::new(Notify::new());
        let handle = ResultsView::activate(Arc::new(GatedSource { gate: gate.clone() }));

        assert_eq!(handle.state(), ViewState::Loading);
        gate.notify_one();

        match handle.settled().await {
            ViewState::Ready(page) => assert_eq!(page.races[0].race, "Late Race"),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_activate_failure_settles_failed() {
        let handle = ResultsView::activate(Arc::new(FixedSource::failing()));
        assert_eq!(
            handle.settled().await,
            ViewState::Failed(LOAD_FAILED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_late_result_after_close_is_discarded() {
        let gate = Arc::new(Notify::new());
        let handle = ResultsView::activate(Arc::new(GatedSource { gate: gate.clone() }));

        let task = handle.detach();
        gate.notify_one();

        assert!(task.await.is_ok());
    }
}
