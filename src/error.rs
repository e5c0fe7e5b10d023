//! Client error types
//!
//! Every failure the client can surface to the user, plus the text shown
//! when it is surfaced.

use thiserror::Error;

/// Errors that can occur while loading metadata or requesting a prediction
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport or connectivity failure, including undecodable bodies
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP response carrying an error payload
    #[error("API error {status}: {error}")]
    Api {
        status: u16,
        error: String,
        details: Vec<String>,
    },

    /// Neighborhood has no coordinates in the directory
    #[error("Coordinates not found for neighborhood '{0}'")]
    NotFound(String),

    /// Form values rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Two records share a lookup key under the reject policy
    #[error("Duplicate neighborhood '{name}' in metadata")]
    DuplicateNeighborhood { name: String },

    /// Response body decoded but its content is unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Gazetteer file could not be read
    #[error("Gazetteer error: {0}")]
    Gazetteer(#[from] csv::Error),
}

impl ClientError {
    /// Text for the blocking user notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) | ClientError::InvalidResponse(_) => {
                "Could not connect to the API. Check that the server is running.".to_string()
            }
            ClientError::Api { error, details, .. } => {
                format!("Error: {}\n{}", error, details.join(","))
            }
            ClientError::NotFound(name) => {
                format!("Coordinates for neighborhood '{}' not found.", name)
            }
            ClientError::Validation(msg) => format!("Invalid form: {}", msg),
            ClientError::DuplicateNeighborhood { name } => format!(
                "Failed to load data: neighborhood '{}' is listed more than once.",
                name
            ),
            ClientError::Gazetteer(e) => format!("Failed to read coordinates file: {}", e),
        }
    }

    /// Whether the error came from the transport rather than the server
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::InvalidResponse(_))
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::NotFound("Boa Viagem".to_string());
        assert_eq!(
            err.to_string(),
            "Coordinates not found for neighborhood 'Boa Viagem'"
        );

        let err = ClientError::DuplicateNeighborhood {
            name: "Centro".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate neighborhood 'Centro' in metadata");
    }

    #[test]
    fn test_api_error_message_includes_details() {
        let err = ClientError::Api {
            status: 400,
            error: "Erro de mapeamento".to_string(),
            details: vec![
                "Bairro 'X' não encontrado no mapeamento.".to_string(),
                "Cidade 'Y' não encontrada no mapeamento.".to_string(),
            ],
        };
        assert_eq!(
            err.user_message(),
            "Error: Erro de mapeamento\nBairro 'X' não encontrado no mapeamento.,Cidade 'Y' não encontrada no mapeamento."
        );
    }

    #[test]
    fn test_api_error_message_without_details() {
        let err = ClientError::Api {
            status: 500,
            error: "Modelo não carregado.".to_string(),
            details: Vec::new(),
        };
        assert_eq!(err.user_message(), "Error: Modelo não carregado.\n");
        assert!(!err.is_network());
    }

    #[test]
    fn test_invalid_response_is_reported_as_connectivity() {
        let err = ClientError::InvalidResponse("probability is NaN".to_string());
        assert!(err.is_network());
        assert!(err.user_message().contains("Could not connect"));
    }
}
