//! Stored callback results and correlation-id extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;

/// Name of the correlation field the engine embeds in its bodies.
pub const CORRELATION_FIELD: &str = "recherche_id";

/// One callback result, keyed by the search it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResult {
    pub search_id: String,
    pub received_at: Timestamp,
    pub payload: Value,
}

/// Pull the correlation id out of an engine body.
///
/// Accepts `{ "payload": { "recherche_id": .. } }` and the flat
/// `{ "recherche_id": .. }`. Numeric ids are rendered as decimal strings.
pub fn extract_search_id(body: &Value) -> Option<String> {
    body.get("payload")
        .and_then(|inner| inner.get(CORRELATION_FIELD))
        .and_then(id_from_value)
        .or_else(|| body.get(CORRELATION_FIELD).and_then(id_from_value))
}

fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
