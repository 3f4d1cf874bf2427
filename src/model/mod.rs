//! Schema-side data model: attributes, measures, fact statistics, and the
//! query workload the designer optimizes for.
//!
//! A [`Schema`] is built once per run by a loader and is read-only for the
//! duration of the run. Attributes are identified by their stable index
//! within the schema; candidate roll-ups refer to them by index (via
//! [`AttributeSet`]), never by deep structure.

pub mod attribute_set;
pub mod loader;
pub mod statistics;

pub use attribute_set::AttributeSet;
pub use loader::{SchemaError, SchemaLoader, Severity, TomlSchemaLoader, ValidationMessage};
pub use statistics::{HeuristicStatistics, StatisticsError, StatisticsProvider};

use std::sync::Arc;

/// A dimension level: one grouping column of the fact table.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// Estimated number of distinct values.
    pub cardinality: f64,
    /// Estimated storage bytes per value.
    pub bytes: f64,
}

/// An aggregatable fact-table column. Carried for space estimates and
/// reporting; never part of a grouping key.
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    pub name: String,
    /// Aggregator label, e.g. `sum` or `count`. Reporting only.
    pub aggregator: String,
    /// Estimated storage bytes per value.
    pub bytes: f64,
}

/// The dimensional schema of a fact table.
#[derive(Debug, Clone)]
pub struct Schema {
    fact_table: String,
    fact_row_count: f64,
    attributes: Vec<Attribute>,
    measures: Vec<Measure>,
    statistics: Arc<dyn StatisticsProvider>,
}

impl Schema {
    /// Maximum number of attributes; the candidate bitset is a `u64` and
    /// the lattice has `2^N` entries, so this is generous already.
    pub const MAX_ATTRIBUTES: usize = 63;

    pub fn new(
        fact_table: impl Into<String>,
        fact_row_count: f64,
        attributes: Vec<Attribute>,
        measures: Vec<Measure>,
        statistics: Arc<dyn StatisticsProvider>,
    ) -> Result<Self, SchemaError> {
        let mut messages = Vec::new();
        if attributes.len() > Self::MAX_ATTRIBUTES {
            messages.push(ValidationMessage::error(format!(
                "schema has {} attributes; at most {} are supported",
                attributes.len(),
                Self::MAX_ATTRIBUTES
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for attribute in &attributes {
            if !seen.insert(attribute.name.as_str()) {
                messages.push(ValidationMessage::error(format!(
                    "duplicate attribute name: '{}'",
                    attribute.name
                )));
            }
        }
        if !messages.is_empty() {
            return Err(SchemaError::Invalid(messages));
        }
        Ok(Self {
            fact_table: fact_table.into(),
            fact_row_count,
            attributes,
            measures,
            statistics,
        })
    }

    pub fn fact_table(&self) -> &str {
        &self.fact_table
    }

    pub fn fact_row_count(&self) -> f64 {
        self.fact_row_count
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    pub fn statistics(&self) -> &dyn StatisticsProvider {
        self.statistics.as_ref()
    }

    /// Names of the attributes in a subset, in schema order.
    pub fn attribute_names(&self, set: &AttributeSet) -> Vec<&str> {
        set.indices()
            .map(|i| self.attributes[i].name.as_str())
            .collect()
    }

    /// Estimated bytes per row of a roll-up grouping by `set`: the set's
    /// attribute columns plus every measure column.
    pub fn row_width(&self, set: &AttributeSet) -> f64 {
        let attribute_bytes: f64 = set.indices().map(|i| self.attributes[i].bytes).sum();
        let measure_bytes: f64 = self.measures.iter().map(|m| m.bytes).sum();
        attribute_bytes + measure_bytes
    }
}

/// One class of workload queries: the attribute set it groups by and its
/// relative frequency weight.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPattern {
    pub attributes: AttributeSet,
    pub frequency: f64,
}

/// The query workload: distinct grouping patterns with frequency weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
    patterns: Vec<QueryPattern>,
}

impl Workload {
    /// Build a workload, merging duplicate patterns by summing frequency.
    /// Patterns are kept in ascending bitset order.
    pub fn new(patterns: Vec<QueryPattern>) -> Self {
        let mut merged: std::collections::BTreeMap<AttributeSet, f64> =
            std::collections::BTreeMap::new();
        for pattern in patterns {
            *merged.entry(pattern.attributes).or_insert(0.0) += pattern.frequency;
        }
        Self {
            patterns: merged
                .into_iter()
                .map(|(attributes, frequency)| QueryPattern {
                    attributes,
                    frequency,
                })
                .collect(),
        }
    }

    pub fn patterns(&self) -> &[QueryPattern] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Sum of all pattern frequencies.
    pub fn total_frequency(&self) -> f64 {
        self.patterns.iter().map(|p| p.frequency).sum()
    }
}
