//! Defensive parsing of the model's free-form reply.
//!
//! The provider is not under this system's control and violates the
//! requested format regularly: fenced code blocks, prose around the JSON,
//! or no JSON at all. Every path through here produces a well-formed
//! result so the request can still complete and persist.

use crate::models::prediction::{PredictionResult, StructuredPrediction};

/// Parse a raw model reply into a prediction result. Never fails: replies
/// that cannot be decoded as the requested structure become the raw
/// fallback shape.
pub fn parse_prediction(reply: &str) -> PredictionResult {
    let extracted = extract_payload(reply);
    match serde_json::from_str::<StructuredPrediction>(extracted) {
        Ok(structured) => PredictionResult::Structured(structured),
        Err(_) => PredictionResult::RawFallback {
            raw_output: extracted.to_string(),
        },
    }
}

/// Three-tier extraction: the first ```json fence pair, else the first
/// generic fence pair, else the whole text. An unclosed fence takes the
/// remainder of the text.
fn extract_payload(reply: &str) -> &str {
    let text = reply.trim();

    if let Some(start) = text.find("```json") {
        let rest = &text[start + 7..];
        return match rest.find("```") {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        };
    }

    if let Some(start) = text.find("```") {
        let rest = &text[start + 3..];
        return match rest.find("```") {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        };
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
  "probability_of_heart_disease": 0.72,
  "recommended_drugs": ["Aspirin", "Atorvastatin", "Lisinopril"]
}"#;

    fn expected() -> PredictionResult {
        PredictionResult::Structured(StructuredPrediction {
            probability_of_heart_disease: 0.72,
            recommended_drugs: vec![
                "Aspirin".into(),
                "Atorvastatin".into(),
                "Lisinopril".into(),
            ],
        })
    }

    #[test]
    fn parses_bare_json_reply() {
        assert_eq!(parse_prediction(PAYLOAD), expected());
    }

    #[test]
    fn parses_json_fenced_reply() {
        let reply = format!("Here you go:\n```json\n{PAYLOAD}\n```\nStay healthy!");
        assert_eq!(parse_prediction(&reply), expected());
    }

    #[test]
    fn parses_generic_fenced_reply() {
        let reply = format!("```\n{PAYLOAD}\n```");
        assert_eq!(parse_prediction(&reply), expected());
    }

    #[test]
    fn all_three_wrappings_yield_identical_results() {
        let bare = parse_prediction(PAYLOAD);
        let json_fenced = parse_prediction(&format!("```json\n{PAYLOAD}\n```"));
        let generic_fenced = parse_prediction(&format!("```\n{PAYLOAD}\n```"));
        assert_eq!(bare, json_fenced);
        assert_eq!(json_fenced, generic_fenced);
    }

    #[test]
    fn unclosed_fence_takes_the_remainder() {
        let reply = format!("```json\n{PAYLOAD}");
        assert_eq!(parse_prediction(&reply), expected());
    }

    #[test]
    fn malformed_reply_falls_back_to_raw_output() {
        let result = parse_prediction("I am sorry, I cannot provide medical advice.");
        assert_eq!(
            result,
            PredictionResult::RawFallback {
                raw_output: "I am sorry, I cannot provide medical advice.".into()
            }
        );
    }

    #[test]
    fn fenced_non_json_falls_back_to_extracted_text() {
        let result = parse_prediction("```\nnot json at all\n```");
        assert_eq!(
            result,
            PredictionResult::RawFallback {
                raw_output: "not json at all".into()
            }
        );
    }

    #[test]
    fn json_missing_required_keys_falls_back() {
        let result = parse_prediction(r#"{"score": 0.9}"#);
        assert_eq!(
            result,
            PredictionResult::RawFallback {
                raw_output: r#"{"score": 0.9}"#.into()
            }
        );
    }

    #[test]
    fn extra_keys_in_structured_reply_are_ignored() {
        let reply = r#"{
  "probability_of_heart_disease": 0.72,
  "recommended_drugs": ["Aspirin", "Atorvastatin", "Lisinopril"],
  "disclaimer": "consult a physician"
}"#;
        assert_eq!(parse_prediction(reply), expected());
    }
}
