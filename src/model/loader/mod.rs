//! Schema loading and validation.
//!
//! A [`SchemaLoader`] turns an external schema description into a
//! [`Schema`] plus its query [`Workload`], or reports what is wrong with it
//! as a list of [`ValidationMessage`]s without panicking on recoverable
//! structural issues.
//!
//! The built-in loader reads a TOML document:
//!
//! ```toml
//! [fact]
//! table = "sales_fact"
//! row_count = 1000000
//!
//! [[attribute]]
//! name = "day"
//! cardinality = 365
//! bytes = 4
//!
//! [[measure]]
//! name = "units"
//! aggregator = "sum"
//! bytes = 8
//!
//! [[query]]
//! attributes = ["day"]
//! frequency = 10.0
//! ```

use crate::model::{
    Attribute, AttributeSet, HeuristicStatistics, Measure, QueryPattern, Schema, Workload,
};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Severity of a validation diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub message: String,
}

impl ValidationMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Errors raised while loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse schema file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid schema: {}", join_messages(.0))]
    Invalid(Vec<ValidationMessage>),
}

fn join_messages(messages: &[ValidationMessage]) -> String {
    messages
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Component that loads a schema and its workload.
pub trait SchemaLoader {
    /// Create the schema and workload, or fail with the validation errors
    /// that prevent it.
    fn create_schema(&self) -> Result<(Schema, Workload), SchemaError>;

    /// Validate the schema description. Returns all diagnostics, warnings
    /// included; an empty list means the description is clean.
    fn validate_schema(&self) -> Vec<ValidationMessage>;
}

// Raw serde shapes for the TOML document.

#[derive(Debug, Deserialize)]
struct SchemaDoc {
    fact: FactDoc,
    #[serde(default)]
    attribute: Vec<AttributeDoc>,
    #[serde(default)]
    measure: Vec<MeasureDoc>,
    #[serde(default)]
    query: Vec<QueryDoc>,
}

#[derive(Debug, Deserialize)]
struct FactDoc {
    table: String,
    row_count: f64,
}

#[derive(Debug, Deserialize)]
struct AttributeDoc {
    name: String,
    cardinality: f64,
    #[serde(default = "default_attribute_bytes")]
    bytes: f64,
}

#[derive(Debug, Deserialize)]
struct MeasureDoc {
    name: String,
    #[serde(default = "default_aggregator")]
    aggregator: String,
    #[serde(default = "default_measure_bytes")]
    bytes: f64,
}

#[derive(Debug, Deserialize)]
struct QueryDoc {
    attributes: Vec<String>,
    #[serde(default = "default_frequency")]
    frequency: f64,
}

fn default_attribute_bytes() -> f64 {
    4.0
}

fn default_measure_bytes() -> f64 {
    8.0
}

fn default_aggregator() -> String {
    "sum".to_string()
}

fn default_frequency() -> f64 {
    1.0
}

/// TOML-backed schema loader.
pub struct TomlSchemaLoader {
    source: String,
}

impl TomlSchemaLoader {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Ok(Self {
            source: std::fs::read_to_string(path)?,
        })
    }

    pub fn from_str(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    fn parse(&self) -> Result<SchemaDoc, SchemaError> {
        Ok(toml::from_str(&self.source)?)
    }

    fn validate_doc(doc: &SchemaDoc) -> Vec<ValidationMessage> {
        let mut messages = Vec::new();

        if doc.fact.row_count <= 0.0 {
            messages.push(ValidationMessage::error(format!(
                "fact table '{}' must have a positive row count",
                doc.fact.table
            )));
        }
        if doc.attribute.is_empty() {
            messages.push(ValidationMessage::error(
                "schema defines no attributes; nothing to aggregate by",
            ));
        }
        if doc.attribute.len() > Schema::MAX_ATTRIBUTES {
            messages.push(ValidationMessage::error(format!(
                "schema has {} attributes; at most {} are supported",
                doc.attribute.len(),
                Schema::MAX_ATTRIBUTES
            )));
        }

        let mut seen_attributes = std::collections::HashSet::new();
        for attribute in &doc.attribute {
            if !seen_attributes.insert(attribute.name.as_str()) {
                messages.push(ValidationMessage::error(format!(
                    "duplicate attribute name: '{}'",
                    attribute.name
                )));
            }
            if attribute.cardinality < 1.0 {
                messages.push(ValidationMessage::error(format!(
                    "attribute '{}' must have cardinality of at least 1",
                    attribute.name
                )));
            }
            if attribute.bytes < 0.0 {
                messages.push(ValidationMessage::error(format!(
                    "attribute '{}' has negative byte width",
                    attribute.name
                )));
            }
        }

        let mut seen_measures = std::collections::HashSet::new();
        for measure in &doc.measure {
            if !seen_measures.insert(measure.name.as_str()) {
                messages.push(ValidationMessage::error(format!(
                    "duplicate measure name: '{}'",
                    measure.name
                )));
            }
            if measure.bytes < 0.0 {
                messages.push(ValidationMessage::error(format!(
                    "measure '{}' has negative byte width",
                    measure.name
                )));
            }
        }

        for (position, query) in doc.query.iter().enumerate() {
            for name in &query.attributes {
                if !doc.attribute.iter().any(|a| &a.name == name) {
                    messages.push(ValidationMessage::error(format!(
                        "query #{} references undefined attribute '{}'",
                        position + 1,
                        name
                    )));
                }
            }
            if query.frequency < 0.0 {
                messages.push(ValidationMessage::error(format!(
                    "query #{} has negative frequency",
                    position + 1
                )));
            }
        }
        if doc.query.is_empty() {
            messages.push(ValidationMessage::warning(
                "workload defines no queries; no aggregate will show any benefit",
            ));
        }

        messages
    }

    fn build(doc: SchemaDoc) -> Result<(Schema, Workload), SchemaError> {
        let width = doc.attribute.len();

        let attributes: Vec<Attribute> = doc
            .attribute
            .iter()
            .map(|a| Attribute {
                name: a.name.clone(),
                cardinality: a.cardinality,
                bytes: a.bytes,
            })
            .collect();
        let measures: Vec<Measure> = doc
            .measure
            .iter()
            .map(|m| Measure {
                name: m.name.clone(),
                aggregator: m.aggregator.clone(),
                bytes: m.bytes,
            })
            .collect();

        let statistics = Arc::new(HeuristicStatistics::new(
            doc.fact.row_count,
            attributes.iter().map(|a| a.cardinality).collect(),
        ));

        let schema = Schema::new(
            doc.fact.table,
            doc.fact.row_count,
            attributes,
            measures,
            statistics,
        )?;

        let patterns = doc
            .query
            .iter()
            .map(|query| {
                let indices: Vec<usize> = query
                    .attributes
                    .iter()
                    // Validated above; unknown names cannot reach here.
                    .filter_map(|name| schema.attribute_index(name))
                    .collect();
                QueryPattern {
                    attributes: AttributeSet::from_indices(width, &indices),
                    frequency: query.frequency,
                }
            })
            .collect();

        Ok((schema, Workload::new(patterns)))
    }
}

impl SchemaLoader for TomlSchemaLoader {
    fn create_schema(&self) -> Result<(Schema, Workload), SchemaError> {
        let doc = self.parse()?;
        let messages = Self::validate_doc(&doc);
        if messages.iter().any(|m| m.severity == Severity::Error) {
            return Err(SchemaError::Invalid(
                messages
                    .into_iter()
                    .filter(|m| m.severity == Severity::Error)
                    .collect(),
            ));
        }
        Self::build(doc)
    }

    fn validate_schema(&self) -> Vec<ValidationMessage> {
        match self.parse() {
            Ok(doc) => Self::validate_doc(&doc),
            Err(e) => vec![ValidationMessage::error(e.to_string())],
        }
    }
}
