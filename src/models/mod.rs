//! Domain models for prediction requests and persisted records.

pub mod patient;
pub mod prediction;

pub use patient::PatientInput;
pub use prediction::{
    PredictionRecord, PredictionRequest, PredictionResult, StructuredPrediction, ValidationError,
};
