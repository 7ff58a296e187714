//! Predefined criterion catalog.
//!
//! Every board starts from this list. Ids are stable: boolean feature ids
//! are the accent-folded lowercase form of their label so that free-text
//! feature names from a contact profile can be matched against them.

use crate::criterion::{Criterion, NumberRange};

pub const PROPERTY_TYPE: &str = "propertyType";
pub const BUDGET: &str = "budget";
pub const ROOMS: &str = "rooms";
pub const MIN_SURFACE: &str = "minSurface";
pub const LIVING_ROOM_SURFACE: &str = "livingRoomSurface";
pub const FLOOR_LEVEL: &str = "floorLevel";

/// Allowed values for the property type select.
pub const PROPERTY_TYPE_OPTIONS: &[&str] = &[
    "Maison",
    "Appartement",
    "Terrain",
    "Immeuble",
    "Local commercial",
];

pub const FLOOR_LEVEL_OPTIONS: &[&str] = &["RDC", "1er étage", "Dernier étage"];

/// Boolean feature criteria as `(id, label)` pairs.
pub const BOOLEAN_FEATURES: &[(&str, &str)] = &[
    ("jardin", "Jardin"),
    ("garage", "Garage"),
    ("piscine", "Piscine"),
    ("terrasse", "Terrasse"),
    ("balcon", "Balcon"),
    ("parking", "Parking"),
    ("ascenseur", "Ascenseur"),
    ("climatisation", "Climatisation"),
    ("cheminee", "Cheminée"),
    ("cave", "Cave"),
];

/// Build a fresh copy of the predefined catalog, in display order.
pub fn predefined() -> Vec<Criterion> {
    let mut criteria = vec![
        Criterion::select(PROPERTY_TYPE, "Type de bien", "Maison", PROPERTY_TYPE_OPTIONS),
        Criterion::number_range(
            BUDGET,
            "Budget (€)",
            NumberRange::between(200_000.0, 400_000.0),
        ),
        Criterion::number_range(ROOMS, "Pièces (min)", NumberRange::at_least(3.0)),
        Criterion::number_range(MIN_SURFACE, "Surface (min m²)", NumberRange::at_least(50.0)),
        Criterion::number_range(
            LIVING_ROOM_SURFACE,
            "Surface Salon (min m²)",
            NumberRange::at_least(20.0),
        ),
        Criterion::select(FLOOR_LEVEL, "Étage", "RDC", FLOOR_LEVEL_OPTIONS),
    ];
    criteria.extend(
        BOOLEAN_FEATURES
            .iter()
            .map(|(id, label)| Criterion::boolean(id, label)),
    );
    criteria
}

/// Whether `id` names a catalog criterion (as opposed to a synthesized one).
pub fn is_predefined(id: &str) -> bool {
    matches!(
        id,
        PROPERTY_TYPE | BUDGET | ROOMS | MIN_SURFACE | LIVING_ROOM_SURFACE | FLOOR_LEVEL
    ) || BOOLEAN_FEATURES.iter().any(|(feature_id, _)| *feature_id == id)
}
