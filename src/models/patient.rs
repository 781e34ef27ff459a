use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The clinical fields every prediction request must carry, in the order
/// they are reported back when some are missing.
pub const REQUIRED_FIELDS: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Validated patient data: exactly the 13 required clinical fields.
///
/// Construction strips every other key from the inbound object, so control
/// fields such as `num_drugs` never reach the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientInput(Map<String, Value>);

impl PatientInput {
    /// Validate a raw JSON object into a `PatientInput`.
    ///
    /// Returns the full subset of missing required fields so the caller can
    /// name all of them at once.
    pub fn from_object(data: &Map<String, Value>) -> Result<Self, Vec<String>> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !data.contains_key(**field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let mut fields = Map::new();
        for field in REQUIRED_FIELDS {
            if let Some(value) = data.get(field) {
                fields.insert(field.to_string(), value.clone());
            }
        }
        Ok(PatientInput(fields))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
