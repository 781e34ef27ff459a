use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::patient::PatientInput;

/// Drug count requested when the caller does not supply one.
pub const DEFAULT_NUM_DRUGS: i64 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("No data provided")]
    EmptyBody,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

/// A validated prediction request: patient data plus the requested number
/// of drug recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub patient: PatientInput,
    pub num_drugs: i64,
}

impl PredictionRequest {
    /// Validate an inbound request body.
    ///
    /// `num_drugs` is taken from the body when it is an integer and is not
    /// bounds-checked; anything else falls back to the default. The
    /// remaining keys are validated as patient data.
    pub fn from_body(body: &Value) -> Result<Self, ValidationError> {
        let data = body.as_object().ok_or(ValidationError::EmptyBody)?;
        let num_drugs = data
            .get("num_drugs")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_NUM_DRUGS);
        let patient = PatientInput::from_object(data).map_err(ValidationError::MissingFields)?;
        Ok(PredictionRequest { patient, num_drugs })
    }
}

/// The structured shape requested from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPrediction {
    pub probability_of_heart_disease: f64,
    pub recommended_drugs: Vec<String>,
}

/// Model output: either the requested structure, or the raw reply text when
/// the model ignored the format instructions. Exactly one shape per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Structured(StructuredPrediction),
    RawFallback { raw_output: String },
}

/// One durably stored prediction attempt. Append-only; nothing in the
/// system updates or deletes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub inputs: PatientInput,
    pub num_drugs_requested: i64,
    pub prediction: PredictionResult,
    /// RFC 3339 UTC timestamp captured at persistence time.
    pub created_at: String,
    pub model_used: String,
}
