//! Deterministic prompt construction for the risk-scoring request.

use serde_json::Value;

use crate::models::patient::PatientInput;

/// Build the fixed-template instruction for one prediction.
///
/// The template embeds the validated patient mapping verbatim and asks for
/// pure JSON so the reply can be decoded without stripping markdown. The
/// parser still handles fenced replies, since the model ignores that
/// instruction often enough.
pub fn build_prompt(patient: &PatientInput, num_drugs: i64) -> String {
    let patient_json = Value::Object(patient.fields().clone()).to_string();

    format!(
        r#"You are a clinical AI assistant. Based on the following patient data, provide:
1. Probability of having heart disease (0-1 range)
2. Top-{num_drugs} recommended drugs for treatment/prevention

Patient data: {patient_json}

Return ONLY valid JSON without markdown code blocks.
Format:
{{
  "probability_of_heart_disease": 0.XX,
  "recommended_drugs": ["Drug1", "Drug2", ...]
}}"#
    )
}
