//! Typed view over a stored engine result.
//!
//! The raw JSON payload stays authoritative; this view is best-effort and
//! only used for display. Field names follow the engine's output.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::extract_search_id;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStats {
    #[serde(rename = "agences_scrapees")]
    pub agencies_scanned: u64,
    #[serde(rename = "annonces_trouvees_total")]
    pub listings_found: u64,
    #[serde(rename = "annonces_apres_deduplication")]
    pub unique_listings: u64,
    #[serde(rename = "doublons_supprimes")]
    pub duplicates_removed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "prix")]
    pub price: f64,
    #[serde(rename = "nb_pieces")]
    pub rooms: Option<f64>,
    #[serde(rename = "nb_chambres")]
    pub bedrooms: Option<f64>,
    pub surface_m2: Option<f64>,
    #[serde(rename = "localisation")]
    pub location: String,
    /// Compatibility with the submitted criteria, 0-100.
    #[serde(rename = "score_compatibilite")]
    pub score: f64,
    #[serde(rename = "criteres_matches")]
    pub matched: Vec<String>,
    #[serde(rename = "criteres_manquants")]
    pub missing: Vec<String>,
    #[serde(rename = "url_annonce")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub search_id: Option<String>,
    pub stats: ReportStats,
    /// Sorted by descending compatibility score.
    pub listings: Vec<Listing>,
}

impl SearchReport {
    /// Read a report out of a callback payload.
    ///
    /// Looks for `stats` and `annonces` under `payload` first, then at the
    /// top level. Listings that fail to parse are skipped.
    pub fn from_payload(payload: &Value) -> Self {
        let body = payload
            .get("payload")
            .filter(|inner| inner.is_object())
            .unwrap_or(payload);

        let stats = body
            .get("stats")
            .and_then(|s| serde_json::from_value(s.clone()).ok())
            .unwrap_or_default();

        let mut listings: Vec<Listing> = body
            .get("annonces")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        listings.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            search_id: extract_search_id(payload),
            stats,
            listings,
        }
    }
}
