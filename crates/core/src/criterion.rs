//! Searchable property criteria.
//!
//! A [`Criterion`] pairs a stable id and label with a [`CriterionValue`]
//! whose variant fixes both the criterion's kind and the shape of its
//! value, so a select can never carry a range and vice versa.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;

/// Inclusive numeric bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub min: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub max: Option<f64>,
}

/// Whole bounds are written as integers (`75`, not `75.0`).
fn serialize_bound<S: Serializer>(bound: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *bound {
        Some(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => serializer.serialize_some(&(v as i64)),
        Some(v) => serializer.serialize_some(&v),
        None => serializer.serialize_none(),
    }
}

impl NumberRange {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }
}

/// Discriminant of a [`CriterionValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriterionKind {
    Select,
    NumberRange,
    Boolean,
    FreeText,
}

impl CriterionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::NumberRange => "numberRange",
            Self::Boolean => "boolean",
            Self::FreeText => "freeText",
        }
    }
}

/// Kind-tagged value of a criterion.
///
/// `Boolean` and `FreeText` carry no payload: their presence in a bucket
/// is the signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CriterionValue {
    Select { value: String, options: Vec<String> },
    NumberRange { value: NumberRange },
    Boolean,
    FreeText,
}

impl CriterionValue {
    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::Select { .. } => CriterionKind::Select,
            Self::NumberRange { .. } => CriterionKind::NumberRange,
            Self::Boolean => CriterionKind::Boolean,
            Self::FreeText => CriterionKind::FreeText,
        }
    }
}

/// A replacement value for an existing criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueUpdate {
    Select(String),
    Range(NumberRange),
}

/// One searchable property attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub value: CriterionValue,
}

impl Criterion {
    pub fn select(id: &str, label: &str, value: &str, options: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: CriterionValue::Select {
                value: value.to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        }
    }

    pub fn number_range(id: &str, label: &str, range: NumberRange) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: CriterionValue::NumberRange { value: range },
        }
    }

    pub fn boolean(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: CriterionValue::Boolean,
        }
    }

    pub fn free_text(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: CriterionValue::FreeText,
        }
    }

    pub fn kind(&self) -> CriterionKind {
        self.value.kind()
    }

    /// Replace the value in place. The id and kind never change.
    ///
    /// Fails when the update shape does not match the criterion kind, or
    /// when a select value is not one of the allowed options.
    pub fn set_value(&mut self, update: ValueUpdate) -> Result<(), CoreError> {
        match (&mut self.value, update) {
            (CriterionValue::Select { value, options }, ValueUpdate::Select(new_value)) => {
                if !options.iter().any(|o| o == &new_value) {
                    return Err(CoreError::Validation(format!(
                        "'{new_value}' is not an allowed value for '{}'. Must be one of: {}",
                        self.label,
                        options.join(", ")
                    )));
                }
                *value = new_value;
                Ok(())
            }
            (CriterionValue::NumberRange { value }, ValueUpdate::Range(range)) => {
                if let (Some(min), Some(max)) = (range.min, range.max) {
                    if min > max {
                        return Err(CoreError::Validation(format!(
                            "Range for '{}' has min {min} greater than max {max}",
                            self.label
                        )));
                    }
                }
                *value = range;
                Ok(())
            }
            (current, _) => Err(CoreError::Validation(format!(
                "Criterion '{}' of kind {} does not accept this value",
                self.id,
                current.kind().as_str()
            ))),
        }
    }
}
