//! Wire types for the prediction API
//!
//! Field names follow the server's JSON contract.

use serde::{Deserialize, Serialize};

// ============================================
// GET /metadata
// ============================================

/// Body of `GET /metadata`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub cidades: Vec<String>,
    pub bairros: Vec<NeighborhoodPayload>,
    pub tipos_crime: Vec<String>,
}

/// One entry of `bairros`
///
/// Current servers send enriched records; older ones send bare names.
/// An object whose coordinates are missing, `null` or not numbers decodes
/// as [`NeighborhoodPayload::Unplaced`] instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NeighborhoodPayload {
    Record {
        bairro: String,
        latitude: f64,
        longitude: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cidade: Option<String>,
    },
    Unplaced {
        bairro: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cidade: Option<String>,
    },
    Name(String),
}

impl NeighborhoodPayload {
    pub fn name(&self) -> &str {
        match self {
            NeighborhoodPayload::Record { bairro, .. } => bairro,
            NeighborhoodPayload::Unplaced { bairro, .. } => bairro,
            NeighborhoodPayload::Name(name) => name,
        }
    }
}

// ============================================
// POST /predict
// ============================================

/// Body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub dia: String,
    pub hora: String,
    pub cidade: String,
    pub bairro: String,
    pub tipo_crime: String,
}

/// Success body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub probabilidade_crime: f64,
}

/// Error body returned with a non-success status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<ErrorDetails>,
}

/// `details` is either a single message or a list of them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Text(String),
    List(Vec<String>),
}

impl ErrorDetails {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ErrorDetails::Text(text) => vec![text],
            ErrorDetails::List(list) => list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_enriched_shape() {
        let json = r#"{
            "cidades": ["Recife", "Olinda"],
            "bairros": [
                {"bairro": "Boa Viagem", "latitude": -8.1271, "longitude": -34.9017},
                {"bairro": "Carmo", "latitude": -8.0137, "longitude": -34.8553, "cidade": "Olinda"}
            ],
            "tipos_crime": ["Roubo", "Furto"]
        }"#;

        let meta: MetadataResponse = serde_json::from_str(json).unwrap();
        assert_eq!(meta.cidades, vec!["Recife", "Olinda"]);
        assert_eq!(
            meta.bairros[1],
            NeighborhoodPayload::Record {
                bairro: "Carmo".to_string(),
                latitude: -8.0137,
                longitude: -34.8553,
                cidade: Some("Olinda".to_string()),
            }
        );
    }

    #[test]
    fn test_metadata_name_only_shape() {
        let json = r#"{"cidades": ["Recife"], "bairros": ["Boa Viagem", "Derby"], "tipos_crime": []}"#;

        let meta: MetadataResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            meta.bairros,
            vec![
                NeighborhoodPayload::Name("Boa Viagem".to_string()),
                NeighborhoodPayload::Name("Derby".to_string()),
            ]
        );
        assert_eq!(meta.bairros[1].name(), "Derby");
    }

    #[test]
    fn test_metadata_entry_without_coordinates() {
        let json = r#"{
            "cidades": ["Recife"],
            "bairros": [
                {"bairro": "Boa Viagem", "latitude": -8.1271, "longitude": -34.9017},
                {"bairro": "Derby", "latitude": null, "longitude": null, "cidade": "Recife"},
                {"bairro": "Torre"}
            ],
            "tipos_crime": ["Roubo"]
        }"#;

        let meta: MetadataResponse = serde_json::from_str(json).unwrap();
        assert_eq!(meta.bairros.len(), 3);
        assert!(matches!(meta.bairros[0], NeighborhoodPayload::Record { .. }));
        assert_eq!(
            meta.bairros[1],
            NeighborhoodPayload::Unplaced {
                bairro: "Derby".to_string(),
                cidade: Some("Recife".to_string()),
            }
        );
        assert_eq!(meta.bairros[2].name(), "Torre");
    }

    #[test]
    fn test_metadata_missing_field_rejected() {
        let json = r#"{"cidades": [], "bairros": []}"#;
        assert!(serde_json::from_str::<MetadataResponse>(json).is_err());
    }

    #[test]
    fn test_error_details_shapes() {
        let text: ErrorBody =
            serde_json::from_str(r#"{"error": "Erro", "details": "campo ausente"}"#).unwrap();
        assert_eq!(text.details.unwrap().into_vec(), vec!["campo ausente"]);

        let list: ErrorBody =
            serde_json::from_str(r#"{"error": "Erro de mapeamento", "details": ["a", "b"]}"#)
                .unwrap();
        assert_eq!(list.details.unwrap().into_vec(), vec!["a", "b"]);

        let bare: ErrorBody = serde_json::from_str(r#"{"error": "Modelo"}"#).unwrap();
        assert!(bare.details.is_none());
    }
}
