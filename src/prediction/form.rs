//! Prediction form
//!
//! Values as the user selected them, validated into a request body.

use crate::error::{ClientError, ClientResult};
use crate::http::PredictRequest;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Sentinel sent when the time field is left empty
pub const DEFAULT_HORA: &str = "00:00";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Raw form values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionForm {
    /// Day, `YYYY-MM-DD`
    pub dia: String,
    /// Time of day, `HH:MM`; may be empty
    #[serde(default)]
    pub hora: String,
    pub cidade: String,
    pub bairro: String,
    pub tipo_crime: String,
}

impl PredictionForm {
    /// Validate and build the request body
    ///
    /// An empty `hora` becomes `default_hora`. Everything else is passed
    /// through unchanged.
    pub fn into_request(self, default_hora: &str) -> ClientResult<PredictRequest> {
        let required = [
            ("dia", &self.dia),
            ("cidade", &self.cidade),
            ("bairro", &self.bairro),
            ("tipo_crime", &self.tipo_crime),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ClientError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        if NaiveDate::parse_from_str(&self.dia, DATE_FORMAT).is_err() {
            return Err(ClientError::Validation(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                self.dia
            )));
        }

        let hora = if self.hora.trim().is_empty() {
            default_hora.to_string()
        } else {
            self.hora
        };
        if !is_valid_time(&hora) {
            return Err(ClientError::Validation(format!(
                "invalid time '{}', expected HH:MM",
                hora
            )));
        }

        Ok(PredictRequest {
            dia: self.dia,
            hora,
            cidade: self.cidade,
            bairro: self.bairro,
            tipo_crime: self.tipo_crime,
        })
    }
}

/// `HH:MM` or `HH:MM:SS`
pub fn is_valid_time(value: &str) -> bool {
    TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(value, fmt).is_ok())
}
