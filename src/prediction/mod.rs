//! Prediction Request Flow
//!
//! Validates the form, sends it to the prediction endpoint and sequences
//! the responses so only the newest submission reaches the display.

mod form;
mod tracker;

pub use form::{is_valid_time, PredictionForm, DEFAULT_HORA};
pub use tracker::{SubmissionTracker, Ticket};

use crate::error::ClientResult;
use crate::http::PredictRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Probability returned by the prediction endpoint, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f64,
}

impl PredictionResult {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }
}

/// Anything that can answer a prediction request
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> ClientResult<PredictionResult>;
}
