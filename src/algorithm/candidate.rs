// src/algorithm/candidate.rs
use crate::algorithm::{AlgorithmError, AlgorithmResult};
use crate::model::{AttributeSet, Schema, StatisticsError};

/// A candidate roll-up table: the attribute subset it groups by, plus its
/// coverage-independent estimates.
///
/// Identity is the attribute bitset: two aggregates with the same bits are
/// the same candidate no matter how they were constructed. The estimates
/// are pure functions of (schema, bits) and are computed once at
/// construction; benefit is coverage-dependent and deliberately NOT stored
/// here — it lives in the scoring pass of the lattice.
#[derive(Debug, Clone)]
pub struct Aggregate {
    attributes: AttributeSet,
    row_count: f64,
    space: f64,
    load_time: f64,
}

impl PartialEq for Aggregate {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl Eq for Aggregate {}

impl Aggregate {
    /// Build a candidate for an attribute subset, consulting the schema's
    /// statistics provider for its estimates.
    pub fn new(schema: &Schema, attributes: AttributeSet) -> Result<Self, StatisticsError> {
        // A set wider or narrower than the schema universe cannot be scored;
        // the lattice never constructs one.
        assert_eq!(
            attributes.width(),
            schema.attribute_count(),
            "attribute set width {} does not match schema universe {}",
            attributes.width(),
            schema.attribute_count()
        );
        let row_count = schema.statistics().row_count(&attributes)?;
        let load_time = schema.statistics().load_time(&attributes)?;
        let space = row_count * schema.row_width(&attributes);
        Ok(Self {
            attributes,
            row_count,
            space,
            load_time,
        })
    }

    /// Build a candidate from an explicit attribute-index list (ad-hoc
    /// what-if construction, outside the search).
    pub fn from_indices(schema: &Schema, attribute_indices: &[usize]) -> AlgorithmResult<Self> {
        let width = schema.attribute_count();
        let mut set = AttributeSet::empty(width);
        for &index in attribute_indices {
            if index >= width {
                return Err(AlgorithmError::AttributeOutOfRange { index, len: width });
            }
            set.set(index);
        }
        Ok(Self::new(schema, set)?)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Estimated number of rows in the materialized roll-up.
    pub fn row_count(&self) -> f64 {
        self.row_count
    }

    /// Estimated storage bytes.
    pub fn space(&self) -> f64 {
        self.space
    }

    /// Estimated cost (row units) of building and maintaining the roll-up.
    pub fn load_time(&self) -> f64 {
        self.load_time
    }

    /// Human-readable grouping key, e.g. `{day, product}`.
    pub fn description(&self, schema: &Schema) -> String {
        format!("{{{}}}", schema.attribute_names(&self.attributes).join(", "))
    }
}
