//! Wire payload sent to the external automation engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{Bucket, CriteriaBoard};
use crate::criterion::{Criterion, CriterionValue};

/// Path of the callback receiver, relative to this system's public origin.
pub const CALLBACK_PATH: &str = "/api/pige-results";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: Value,
}

impl From<&Criterion> for LabeledValue {
    fn from(criterion: &Criterion) -> Self {
        let value = match &criterion.value {
            // Presence in the bucket is the signal.
            CriterionValue::Boolean | CriterionValue::FreeText => Value::Bool(true),
            CriterionValue::Select { value, .. } => Value::String(value.clone()),
            CriterionValue::NumberRange { value } => {
                serde_json::to_value(value).unwrap_or(Value::Null)
            }
        };
        Self {
            label: criterion.label.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub location: String,
    pub radius_km: u32,
    pub essential: Vec<LabeledValue>,
    pub important: Vec<LabeledValue>,
    pub bonus: Vec<LabeledValue>,
    pub callback_url: String,
}

impl SearchPayload {
    /// Serialize the three buckets of `board`. The available pool is not sent.
    pub fn build(
        board: &CriteriaBoard,
        location: &str,
        radius_km: u32,
        callback_url: &str,
    ) -> Self {
        let labeled = |bucket: Bucket| -> Vec<LabeledValue> {
            board.bucket(bucket).iter().map(LabeledValue::from).collect()
        };
        Self {
            location: location.trim().to_string(),
            radius_km,
            essential: labeled(Bucket::Essential),
            important: labeled(Bucket::Important),
            bonus: labeled(Bucket::Secondary),
            callback_url: callback_url.to_string(),
        }
    }
}

/// Build the callback URL from this system's public origin.
pub fn callback_url(public_origin: &str) -> String {
    format!("{}{CALLBACK_PATH}", public_origin.trim_end_matches('/'))
}
