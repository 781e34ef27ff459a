//! Request handlers for the prediction API.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::{ApiError, AppState};
use crate::ai::{parser, prompt, GROQ_MODEL};
use crate::models::patient::PatientInput;
use crate::models::prediction::{
    PredictionRecord, PredictionRequest, PredictionResult, ValidationError,
};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    database: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
struct PredictResponse {
    success: bool,
    prediction: PredictionResult,
    patient_data: PatientInput,
    num_drugs_requested: i64,
    timestamp: String,
    model_used: String,
}

#[derive(Serialize)]
struct PredictionsResponse {
    success: bool,
    predictions: Vec<PredictionRecord>,
    total: usize,
}

/// Static OK plus which backend was selected at startup. Does not re-probe.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        message: "Heart Disease Prediction API is running",
        database: state.backend.kind(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// The prediction orchestrator: parse -> validate -> infer -> persist ->
/// respond, each step short-circuiting into the `ApiError` boundary.
pub async fn predict(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let data = parse_body(&body)?;
    let request = PredictionRequest::from_body(&data)?;
    info!(num_drugs = request.num_drugs, "processing prediction request");

    let prompt = prompt::build_prompt(&request.patient, request.num_drugs);
    let reply = state.llm.complete(&prompt).await?;
    // Malformed model output is never fatal; it degrades to the raw shape.
    let prediction = parser::parse_prediction(&reply);

    let record = PredictionRecord {
        inputs: request.patient.clone(),
        num_drugs_requested: request.num_drugs,
        prediction: prediction.clone(),
        created_at: Utc::now().to_rfc3339(),
        model_used: GROQ_MODEL.to_string(),
    };
    state.backend.append(&record).await.map_err(ApiError::Save)?;
    info!(backend = state.backend.kind(), "prediction record saved");

    Ok(HttpResponse::Ok().json(PredictResponse {
        success: true,
        prediction,
        patient_data: request.patient,
        num_drugs_requested: request.num_drugs,
        timestamp: record.created_at,
        model_used: record.model_used,
    }))
}

/// Every stored record, for debugging and admin use.
pub async fn predictions(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state.backend.list_all().await.map_err(ApiError::Backend)?;
    let total = records.len();
    Ok(HttpResponse::Ok().json(PredictionsResponse {
        success: true,
        predictions: records,
        total,
    }))
}

/// Static sample payload for trying the predict endpoint.
pub async fn sample_data() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "sample_data": {
            "age": 43,
            "sex": 0,
            "cp": 3,
            "trestbps": 120,
            "chol": 239,
            "fbs": 1,
            "restecg": 1,
            "thalach": 152,
            "exang": 0,
            "oldpeak": 0.8,
            "slope": 1,
            "ca": 0,
            "thal": 3,
            "num_drugs": 5
        },
        "description": "Sample patient data for heart disease prediction"
    }))
}

// An absent, empty, unparseable, or non-object body is rejected before
// field validation.
fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    if body.is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ValidationError::EmptyBody)?;
    if !value.is_object() {
        return Err(ValidationError::EmptyBody);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_rejected() {
        assert_eq!(parse_body(b"").unwrap_err(), ValidationError::EmptyBody);
    }

    #[test]
    fn unparseable_body_is_rejected() {
        assert_eq!(
            parse_body(b"{oops").unwrap_err(),
            ValidationError::EmptyBody
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert_eq!(parse_body(b"null").unwrap_err(), ValidationError::EmptyBody);
        assert_eq!(parse_body(b"[1]").unwrap_err(), ValidationError::EmptyBody);
    }

    #[test]
    fn empty_object_reaches_field_validation() {
        assert!(parse_body(b"{}").unwrap().is_object());
    }
}
