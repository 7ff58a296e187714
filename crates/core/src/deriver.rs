//! Derive an initial criteria board from a contact's search profile.
//!
//! Derivation is deterministic: the same profile always yields the same
//! board, including the ids of synthesized free-text criteria.

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::board::{Column, CriteriaBoard};
use crate::catalog;
use crate::criterion::{Criterion, CriterionKind, CriterionValue, NumberRange};

/// Smallest radius accepted by the search form, in km.
pub const MIN_RADIUS_KM: u32 = 1;

/// Largest radius accepted by the search form, in km.
pub const MAX_RADIUS_KM: u32 = 50;

/// Radius used when the profile does not specify one.
pub const DEFAULT_RADIUS_KM: u32 = 5;

/// Prefix applied to style labels turned into free-text criteria.
pub const STYLE_PREFIX: &str = "Style: ";

/// Outcome of profile derivation: the board plus seeded search fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSearch {
    pub board: CriteriaBoard,
    /// Seeded from the profile's cities, if any.
    pub location: Option<String>,
    /// Seeded from the profile's radius, clamped to the allowed range.
    pub radius_km: Option<u32>,
}

/// Lowercase and strip diacritics, so "Cheminée" matches `cheminee`.
pub fn normalize_feature_id(label: &str) -> String {
    label
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Clamp a profile radius into the form's allowed range.
pub fn clamp_radius_km(radius: f64) -> u32 {
    if !radius.is_finite() {
        return DEFAULT_RADIUS_KM;
    }
    (radius.round() as i64).clamp(MIN_RADIUS_KM as i64, MAX_RADIUS_KM as i64) as u32
}

/// Build a fresh board from `profile`, starting from `catalog`.
pub fn derive(profile: &crate::profile::SearchProfile, catalog: Vec<Criterion>) -> DerivedSearch {
    let mut board = CriteriaBoard::from_catalog(catalog);

    if let (Some(price), Some(margin)) = (profile.target_price, profile.price_margin_percent) {
        if price > 0.0 && margin > 0.0 {
            let min = (price * (1.0 - margin / 100.0)).round();
            let max = (price * (1.0 + margin / 100.0)).round();
            assign_range(&mut board, catalog::BUDGET, |range| {
                *range = NumberRange::between(min, max)
            });
        }
    }

    if let Some(first_type) = profile
        .property_types
        .iter()
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
    {
        assign(&mut board, catalog::PROPERTY_TYPE, |value| {
            if let CriterionValue::Select { value, options } = value {
                if !options.iter().any(|o| o == first_type) {
                    options.push(first_type.to_string());
                }
                *value = first_type.to_string();
            }
        });
    }

    if let Some(min_rooms) = profile.min_rooms.filter(|n| *n > 0.0) {
        assign_range(&mut board, catalog::ROOMS, |range| range.min = Some(min_rooms));
    }

    if let Some(min_area) = profile.min_living_area.filter(|n| *n > 0.0) {
        assign_range(&mut board, catalog::MIN_SURFACE, |range| range.min = Some(min_area));
    }

    let mut custom_labels = Vec::new();
    let mut seen = HashSet::new();
    for feature in &profile.important_features {
        let feature = feature.trim();
        if feature.is_empty() {
            continue;
        }
        let feature_id = normalize_feature_id(feature);
        if !seen.insert(feature_id.clone()) {
            continue;
        }
        let matches_boolean = board
            .available
            .iter()
            .any(|c| c.id == feature_id && c.kind() == CriterionKind::Boolean);
        if matches_boolean {
            board.move_criterion(&feature_id, Column::Available, Column::Important);
        } else {
            custom_labels.push(feature.to_string());
        }
    }

    custom_labels.extend(
        profile
            .property_style
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| format!("{STYLE_PREFIX}{s}")),
    );

    for (index, label) in custom_labels.into_iter().enumerate() {
        board
            .important
            .push(Criterion::free_text(format!("custom-feature-{index}"), label));
    }

    let location = profile
        .cities
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    DerivedSearch {
        board,
        location,
        radius_km: profile.search_radius_km.map(clamp_radius_km),
    }
}

/// Modify a catalog criterion's value and move it into `essential`.
///
/// Only criteria still in the available pool are assigned.
fn assign(board: &mut CriteriaBoard, id: &str, edit: impl FnOnce(&mut CriterionValue)) {
    let Some(index) = board.available.iter().position(|c| c.id == id) else {
        return;
    };
    let mut criterion = board.available.remove(index);
    edit(&mut criterion.value);
    board.essential.push(criterion);
}

fn assign_range(board: &mut CriteriaBoard, id: &str, edit: impl FnOnce(&mut NumberRange)) {
    assign(board, id, |value| {
        if let CriterionValue::NumberRange { value } = value {
            edit(value);
        }
    });
}
