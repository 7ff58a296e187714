//! A contact's saved search profile, as stored on the contact record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchProfile {
    pub target_price: Option<f64>,
    /// Percentage, 0-100.
    pub price_margin_percent: Option<f64>,
    /// Comma-separated city names.
    pub cities: Option<String>,
    pub search_radius_km: Option<f64>,
    pub property_types: Vec<String>,
    pub min_rooms: Option<f64>,
    /// Square metres. Fractional values are accepted.
    pub min_living_area: Option<f64>,
    pub important_features: Vec<String>,
    pub property_style: Vec<String>,
}
