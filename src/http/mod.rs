//! Prediction API Client
//!
//! HTTP layer for the two endpoints the page talks to:
//!
//! - `GET /metadata` - cities, neighborhoods, crime types
//! - `POST /predict` - crime probability for one form submission

mod client;
pub mod dto;

pub use client::ApiClient;
pub use dto::{MetadataResponse, NeighborhoodPayload, PredictRequest, PredictResponse};
