//! Shared test fixtures: fake sources, a recording page and an in-process
//! HTTP server.

use crate::directory::{MetadataSource, SelectorKind};
use crate::error::{ClientError, ClientResult};
use crate::http::{MetadataResponse, NeighborhoodPayload, PredictRequest};
use crate::prediction::{PredictionResult, Predictor};
use crate::presenter::{Page, ProbabilityDisplay};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn enriched_metadata() -> MetadataResponse {
    MetadataResponse {
        cidades: vec!["Recife".to_string(), "Olinda".to_string()],
        bairros: vec![
            NeighborhoodPayload::Record {
                bairro: "Boa Viagem".to_string(),
                latitude: -8.1271,
                longitude: -34.9017,
                cidade: None,
            },
            NeighborhoodPayload::Record {
                bairro: "Casa Forte".to_string(),
                latitude: -8.0350,
                longitude: -34.9186,
                cidade: None,
            },
            NeighborhoodPayload::Record {
                bairro: "Carmo".to_string(),
                latitude: -8.0137,
                longitude: -34.8553,
                cidade: Some("Olinda".to_string()),
            },
        ],
        tipos_crime: vec!["Roubo".to_string(), "Furto".to_string()],
    }
}

/// Metadata source returning a fixed response, or failing
pub struct FakeMetadataSource {
    response: Option<MetadataResponse>,
    calls: AtomicUsize,
}

impl FakeMetadataSource {
    pub fn ok(response: MetadataResponse) -> Self {
        Self {
            response: Some(response),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails with an undecodable-response error
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for FakeMetadataSource {
    async fn fetch(&self) -> ClientResult<MetadataResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| ClientError::InvalidResponse("connection refused".to_string()))
    }
}

/// Predictor that records requests and answers with a fixed outcome
#[derive(Clone)]
pub struct FakePredictor {
    probability: Option<f64>,
    error: Arc<Mutex<Option<ClientError>>>,
    requests: Arc<Mutex<Vec<PredictRequest>>>,
}

impl FakePredictor {
    pub fn probability(probability: f64) -> Self {
        Self {
            probability: Some(probability),
            error: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails the first request with `error`
    pub fn failing(error: ClientError) -> Self {
        Self {
            probability: None,
            error: Arc::new(Mutex::new(Some(error))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<PredictRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Predictor for FakePredictor {
    async fn predict(&self, request: &PredictRequest) -> ClientResult<PredictionResult> {
        self.requests.lock().unwrap().push(request.clone());
        match self.probability {
            Some(p) => Ok(PredictionResult::new(p)),
            None => Err(self
                .error
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| ClientError::InvalidResponse("no response".to_string()))),
        }
    }
}

/// Page that records everything shown on it
#[derive(Debug, Default)]
pub struct RecordingPage {
    pub alerts: Vec<String>,
    pub selectors: Vec<(SelectorKind, Vec<String>)>,
    pub results: Vec<ProbabilityDisplay>,
}

impl RecordingPage {
    /// All options appended to one selector
    pub fn options(&self, kind: SelectorKind) -> Vec<String> {
        self.selectors
            .iter()
            .filter(|(k, _)| *k == kind)
            .flat_map(|(_, options)| options.iter().cloned())
            .collect()
    }
}

impl Page for RecordingPage {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn clear_selectors(&mut self) {
        self.selectors.clear();
    }

    fn populate_selector(&mut self, kind: SelectorKind, options: &[String]) {
        self.selectors.push((kind, options.to_vec()));
    }

    fn show_probability(&mut self, display: &ProbabilityDisplay) {
        self.results.push(display.clone());
    }
}

/// Serve `app` on an ephemeral local port, returning its base URL
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Base URL of a port nothing is listening on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
