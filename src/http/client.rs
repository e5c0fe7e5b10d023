//! Prediction API REST client
//!
//! HTTP client for the `/metadata` and `/predict` endpoints. One attempt per
//! call: the form is interactive and the user resubmits on failure.

use super::dto::{ErrorBody, MetadataResponse, PredictRequest, PredictResponse};
use crate::config::ApiConfig;
use crate::directory::MetadataSource;
use crate::error::{ClientError, ClientResult};
use crate::prediction::{PredictionResult, Predictor};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// REST client for the prediction API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client from configuration
    ///
    /// Without `request_timeout_secs` the transport defaults apply.
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch selector metadata
    pub async fn fetch_metadata(&self) -> ClientResult<MetadataResponse> {
        let url = format!("{}/metadata", self.base_url);
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(%request_id, %url, "Fetching metadata");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            let metadata: MetadataResponse = response.json().await?;
            tracing::debug!(
                %request_id,
                cities = metadata.cidades.len(),
                neighborhoods = metadata.bairros.len(),
                crime_types = metadata.tipos_crime.len(),
                "Metadata received"
            );
            Ok(metadata)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(api_error(status, &text))
        }
    }

    /// Request a crime probability for a validated form
    pub async fn predict(&self, request: &PredictRequest) -> ClientResult<PredictionResult> {
        let url = format!("{}/predict", self.base_url);
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(
            %request_id,
            bairro = %request.bairro,
            tipo_crime = %request.tipo_crime,
            "Requesting prediction"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            let body: PredictResponse = response.json().await?;
            if !body.probabilidade_crime.is_finite() {
                return Err(ClientError::InvalidResponse(format!(
                    "probability is not a number: {}",
                    body.probabilidade_crime
                )));
            }
            tracing::debug!(%request_id, probability = body.probabilidade_crime, "Prediction received");
            Ok(PredictionResult::new(body.probabilidade_crime))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(api_error(status, &text))
        }
    }
}

/// Build an `Api` error from a non-success response body
///
/// A JSON body contributes `error` and `details` verbatim; anything else is
/// surfaced as raw text.
fn api_error(status: StatusCode, body: &str) -> ClientError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();

    let (error, details) = match parsed {
        Some(ErrorBody {
            error: Some(error),
            details,
        }) => (error, details.map(|d| d.into_vec()).unwrap_or_default()),
        _ => {
            let text = body.trim();
            let error = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                text.to_string()
            };
            (error, Vec::new())
        }
    };

    ClientError::Api {
        status: status.as_u16(),
        error,
        details,
    }
}

#[async_trait]
impl MetadataSource for ApiClient {
    async fn fetch(&self) -> ClientResult<MetadataResponse> {
        self.fetch_metadata().await
    }
}

#[async_trait]
impl Predictor for ApiClient {
    async fn predict(&self, request: &PredictRequest) -> ClientResult<PredictionResult> {
        ApiClient::predict(self, request).await
    }
}
