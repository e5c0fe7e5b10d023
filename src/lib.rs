//! # Crimecast
//!
//! Client for a crime probability service. Loads neighborhood metadata,
//! submits a day/time/place/crime-type query to the prediction endpoint and
//! places the answer on a map.
//!
//! ## Modules
//!
//! - [`directory`]: neighborhood directory and metadata loading
//! - [`prediction`]: form validation and submission sequencing
//! - [`presenter`]: map presenter, result panel, terminal rendition
//! - [`http`]: REST client for `/metadata` and `/predict`
//! - [`session`]: page lifetime state wiring the above together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crimecast::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(ApiClient::new(&ConfigApiConfig::default())?);
//!     let mut session = Session::new(
//!         client.clone(),
//!         client,
//!         DirectoryLoader::default(),
//!         MapSettings::default(),
//!         DEFAULT_HORA,
//!     );
//!
//!     let mut page = ConsolePage::stdio();
//!     let mut map = TerminalMap::new(std::io::stdout());
//!     session.on_page_load(&mut page, &mut map).await?;
//!
//!     let form = PredictionForm {
//!         dia: "2024-10-27".into(),
//!         hora: "14:30".into(),
//!         cidade: "Recife".into(),
//!         bairro: "Boa Viagem".into(),
//!         tipo_crime: "Roubo".into(),
//!     };
//!     session.on_submit(form, &mut page, &mut map).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod logging;
pub mod prediction;
pub mod presenter;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::{
    ApiConfig as ConfigApiConfig, Config, ConfigError, DirectoryConfig, FormConfig,
    LoggingConfig, MapConfig,
};

pub use directory::{
    CollisionPolicy, Coordinates, Directory, DirectoryLoader, Gazetteer, LoadedMetadata,
    MetadataSource, NeighborhoodRecord, SelectionLists, SelectorKind,
};

pub use error::{ClientError, ClientResult};

pub use http::{ApiClient, MetadataResponse, NeighborhoodPayload, PredictRequest};

pub use prediction::{
    PredictionForm, PredictionResult, Predictor, SubmissionTracker, Ticket, DEFAULT_HORA,
};

pub use presenter::{
    ConsolePage, MapPresenter, MapSettings, MapView, MarkerId, Page, Popup, ProbabilityDisplay,
    TerminalMap,
};

pub use session::{Session, SubmitOutcome};
