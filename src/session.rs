//! Page session
//!
//! Owns the state of one page lifetime (directory, marker set, submission
//! counter) and wires the two page events to it:
//!
//! 1. page load: fetch metadata, fill the selectors
//! 2. form submit: validate, predict, show the result and the marker
//!
//! Every failure is logged, shown to the user through [`Page::alert`] and
//! also returned, so non-UI callers get a typed error.

use crate::directory::{
    Coordinates, Directory, DirectoryLoader, LoadedMetadata, MetadataSource,
};
use crate::error::{ClientError, ClientResult};
use crate::http::PredictRequest;
use crate::prediction::{PredictionForm, PredictionResult, Predictor, SubmissionTracker, Ticket};
use crate::presenter::{MapPresenter, MapSettings, MapView, Page, ProbabilityDisplay};
use std::sync::Arc;

/// Alert text when metadata cannot be reached
pub const METADATA_UNAVAILABLE: &str = "Failed to load data. Make sure the API is running.";

/// What happened to a completed submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Result reached the display; `placed` is `None` when the
    /// neighborhood could not be put on the map
    Shown {
        result: PredictionResult,
        placed: Option<Coordinates>,
    },
    /// A newer submission started first; nothing was displayed
    Stale,
}

/// State for one page lifetime
pub struct Session {
    metadata: Arc<dyn MetadataSource>,
    predictor: Arc<dyn Predictor>,
    loader: DirectoryLoader,
    directory: Directory,
    presenter: MapPresenter,
    tracker: SubmissionTracker,
    default_hora: String,
}

impl Session {
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        predictor: Arc<dyn Predictor>,
        loader: DirectoryLoader,
        map_settings: MapSettings,
        default_hora: impl Into<String>,
    ) -> Self {
        Self {
            metadata,
            predictor,
            loader,
            directory: Directory::default(),
            presenter: MapPresenter::new(map_settings),
            tracker: SubmissionTracker::new(),
            default_hora: default_hora.into(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn presenter(&self) -> &MapPresenter {
        &self.presenter
    }

    /// Page-load event: load metadata and fill the selectors
    ///
    /// Each call starts from a blank page: selectors, directory and markers
    /// from an earlier load are cleared first. On failure they stay empty and
    /// the user is alerted. There is no automatic retry.
    pub async fn on_page_load(
        &mut self,
        page: &mut dyn Page,
        map: &mut dyn MapView,
    ) -> ClientResult<()> {
        page.clear_selectors();
        self.directory = Directory::new(self.loader.policy());
        self.presenter.clear(map);
        self.presenter.init_view(map);

        let LoadedMetadata {
            directory,
            selections,
        } = match self.loader.load(self.metadata.as_ref()).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("Failed to load metadata: {}", e);
                let message = if e.is_network() {
                    METADATA_UNAVAILABLE.to_string()
                } else {
                    e.user_message()
                };
                page.alert(&message);
                return Err(e);
            }
        };

        for (kind, options) in selections.iter() {
            page.populate_selector(kind, options);
        }
        self.directory = directory;

        Ok(())
    }

    /// Form-submit event: one prediction attempt, shown if still current
    pub async fn on_submit(
        &mut self,
        form: PredictionForm,
        page: &mut dyn Page,
        map: &mut dyn MapView,
    ) -> ClientResult<SubmitOutcome> {
        let (ticket, request) = match self.begin(form) {
            Ok(started) => started,
            Err(e) => {
                tracing::error!("Rejected form: {}", e);
                page.alert(&e.user_message());
                return Err(e);
            }
        };

        let outcome = self.predictor.predict(&request).await;
        self.complete(ticket, &request, outcome, page, map)
    }

    /// Validate a form and take a ticket for it
    ///
    /// Split from [`Session::complete`] so callers that run several
    /// requests concurrently can sequence the completions themselves.
    pub fn begin(&mut self, form: PredictionForm) -> ClientResult<(Ticket, PredictRequest)> {
        let request = form.into_request(&self.default_hora)?;
        let ticket = self.tracker.issue();
        tracing::info!(
            ticket = %ticket,
            cidade = %request.cidade,
            bairro = %request.bairro,
            tipo_crime = %request.tipo_crime,
            "Prediction requested"
        );
        Ok((ticket, request))
    }

    /// Apply the outcome of a submission
    ///
    /// Outcomes of stale tickets are dropped without touching the page.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        request: &PredictRequest,
        outcome: ClientResult<PredictionResult>,
        page: &mut dyn Page,
        map: &mut dyn MapView,
    ) -> ClientResult<SubmitOutcome> {
        if !self.tracker.accept(ticket) {
            return Ok(SubmitOutcome::Stale);
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(ticket = %ticket, "Prediction failed: {}", e);
                page.alert(&e.user_message());
                return Err(e);
            }
        };

        page.show_probability(&ProbabilityDisplay::from_probability(result.probability));

        let placed = match self.presenter.show_result(
            map,
            &self.directory,
            &request.cidade,
            &request.bairro,
            result.probability,
        ) {
            Ok(coords) => Some(coords),
            Err(e @ ClientError::NotFound(_)) => {
                page.alert(&e.user_message());
                None
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            ticket = %ticket,
            probability = result.probability,
            placed = placed.is_some(),
            "Prediction shown"
        );

        Ok(SubmitOutcome::Shown { result, placed })
    }
}
