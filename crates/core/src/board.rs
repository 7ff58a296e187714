//! The criteria board: an "available" pool plus three priority buckets.
//!
//! Every criterion id lives in exactly one of the four columns. All
//! operations below preserve that partition; ids that cannot be found are
//! treated as stale UI events and ignored.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::criterion::{Criterion, ValueUpdate};
use crate::error::CoreError;

/// One of the three priority tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Essential,
    Important,
    Secondary,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Essential, Bucket::Important, Bucket::Secondary];
}

/// A board column: the available pool or a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Available,
    Essential,
    Important,
    Secondary,
}

impl From<Bucket> for Column {
    fn from(bucket: Bucket) -> Self {
        match bucket {
            Bucket::Essential => Column::Essential,
            Bucket::Important => Column::Important,
            Bucket::Secondary => Column::Secondary,
        }
    }
}

impl Column {
    /// Lookup order used when locating a criterion by id.
    pub const SEARCH_ORDER: [Column; 4] = [
        Column::Available,
        Column::Essential,
        Column::Important,
        Column::Secondary,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaBoard {
    pub available: Vec<Criterion>,
    pub essential: Vec<Criterion>,
    pub important: Vec<Criterion>,
    pub secondary: Vec<Criterion>,
}

impl CriteriaBoard {
    /// A board with the whole catalog in the available pool.
    pub fn fresh() -> Self {
        Self::from_catalog(catalog::predefined())
    }

    pub fn from_catalog(catalog: Vec<Criterion>) -> Self {
        Self {
            available: catalog,
            ..Default::default()
        }
    }

    pub fn column(&self, column: Column) -> &[Criterion] {
        match column {
            Column::Available => &self.available,
            Column::Essential => &self.essential,
            Column::Important => &self.important,
            Column::Secondary => &self.secondary,
        }
    }

    fn column_mut(&mut self, column: Column) -> &mut Vec<Criterion> {
        match column {
            Column::Available => &mut self.available,
            Column::Essential => &mut self.essential,
            Column::Important => &mut self.important,
            Column::Secondary => &mut self.secondary,
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Criterion] {
        self.column(bucket.into())
    }

    /// Find which column holds `id`, searching the pool first.
    pub fn locate(&self, id: &str) -> Option<Column> {
        Column::SEARCH_ORDER
            .into_iter()
            .find(|col| self.column(*col).iter().any(|c| c.id == id))
    }

    pub fn get(&self, id: &str) -> Option<&Criterion> {
        let column = self.locate(id)?;
        self.column(column).iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    /// Total number of criteria across all four columns.
    pub fn len(&self) -> usize {
        Column::SEARCH_ORDER
            .into_iter()
            .map(|col| self.column(col).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every id on the board, column by column.
    pub fn ids(&self) -> Vec<&str> {
        Column::SEARCH_ORDER
            .into_iter()
            .flat_map(|col| self.column(col).iter().map(|c| c.id.as_str()))
            .collect()
    }

    /// Remove `id` from whichever column holds it.
    fn take(&mut self, id: &str) -> Option<(Column, Criterion)> {
        let column = self.locate(id)?;
        let items = self.column_mut(column);
        let index = items.iter().position(|c| c.id == id)?;
        Some((column, items.remove(index)))
    }

    /// Move a criterion to `to`, appending it at the end.
    ///
    /// `from` is the drag source reported by the UI; the criterion is
    /// located by id regardless. Returns `false` when nothing moved: same
    /// source and destination, or an unknown id.
    pub fn move_criterion(&mut self, id: &str, from: Column, to: Column) -> bool {
        if from == to {
            return false;
        }
        match self.locate(id) {
            Some(current) if current == to => false,
            Some(_) => match self.take(id) {
                Some((_, criterion)) => {
                    self.column_mut(to).push(criterion);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Replace a criterion's value without changing its column.
    ///
    /// Returns `Ok(false)` when the id is not on the board.
    pub fn update_value(&mut self, id: &str, update: ValueUpdate) -> Result<bool, CoreError> {
        let Some(column) = self.locate(id) else {
            return Ok(false);
        };
        match self.column_mut(column).iter_mut().find(|c| c.id == id) {
            Some(criterion) => {
                criterion.set_value(update)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a criterion from its bucket.
    ///
    /// Catalog criteria go back to the available pool; synthesized ones are
    /// dropped. Criteria already in the pool are left alone. Returns the
    /// removed criterion, if any.
    pub fn delete(&mut self, id: &str) -> Option<Criterion> {
        match self.locate(id)? {
            Column::Available => None,
            _ => {
                let (_, criterion) = self.take(id)?;
                if catalog::is_predefined(&criterion.id) {
                    self.available.push(criterion.clone());
                }
                Some(criterion)
            }
        }
    }

    /// Append a free-text criterion straight into `bucket`.
    ///
    /// Blank text is ignored. Returns the generated id.
    pub fn add_free_text(&mut self, text: &str, bucket: Bucket) -> Option<String> {
        let label = text.trim();
        if label.is_empty() {
            return None;
        }
        let id = format!("freetext-{}", uuid::Uuid::new_v4());
        self.column_mut(bucket.into())
            .push(Criterion::free_text(id.clone(), label));
        Some(id)
    }
}
