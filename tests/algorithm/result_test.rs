use aggdes::algorithm::{compute_aggregate_costs, Aggregate, CostBenefit};
use aggdes::model::{
    Attribute, AttributeSet, Measure, QueryPattern, Schema, StatisticsError, StatisticsProvider,
    Workload,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct TableStatistics {
    fact_rows: f64,
    rows: HashMap<u64, f64>,
}

impl TableStatistics {
    fn new(fact_rows: f64) -> Self {
        Self {
            fact_rows,
            ..Default::default()
        }
    }

    fn with(mut self, bits: u64, rows: f64) -> Self {
        self.rows.insert(bits, rows);
        self
    }
}

impl StatisticsProvider for TableStatistics {
    fn row_count(&self, attributes: &AttributeSet) -> Result<f64, StatisticsError> {
        Ok(self
            .rows
            .get(&attributes.bits())
            .copied()
            .unwrap_or(self.fact_rows))
    }

    fn load_time(&self, attributes: &AttributeSet) -> Result<f64, StatisticsError> {
        self.row_count(attributes)
    }
}

fn schema() -> Schema {
    let statistics = TableStatistics::new(1_000.0)
        .with(0b01, 10.0)
        .with(0b11, 100.0);
    let attributes = vec![
        Attribute {
            name: "day".to_string(),
            cardinality: 10.0,
            bytes: 4.0,
        },
        Attribute {
            name: "region".to_string(),
            cardinality: 10.0,
            bytes: 4.0,
        },
    ];
    let measures = vec![Measure {
        name: "units".to_string(),
        aggregator: "sum".to_string(),
        bytes: 8.0,
    }];
    Schema::new("sales", 1_000.0, attributes, measures, Arc::new(statistics)).unwrap()
}

#[test]
fn test_savings_attributed_to_cheapest_final_cover() {
    let schema = schema();
    let workload = Workload::new(vec![
        QueryPattern {
            attributes: AttributeSet::from_indices(2, &[0]),
            frequency: 3.0,
        },
        QueryPattern {
            attributes: AttributeSet::from_indices(2, &[1]),
            frequency: 1.0,
        },
    ]);
    let aggregates = vec![
        Aggregate::new(&schema, AttributeSet::from_bits(2, 0b01)).unwrap(),
        Aggregate::new(&schema, AttributeSet::from_bits(2, 0b11)).unwrap(),
    ];

    let records = compute_aggregate_costs(&schema, &workload, &aggregates).unwrap();
    assert_eq!(records.len(), 2);

    // The {day} pattern is served by the 10-row {day} aggregate, not the
    // 100-row {day, region} one: saved (1000-10)*3, 3/4 of query weight.
    assert_eq!(records[0].saved_query_rows, 2_970.0);
    assert_eq!(records[0].query_load, 0.75);
    assert_eq!(records[0].row_count, 10.0);

    // The {region} pattern falls to {day, region}: saved (1000-100)*1.
    assert_eq!(records[1].saved_query_rows, 900.0);
    assert_eq!(records[1].query_load, 0.25);
    assert_eq!(records[1].row_count, 100.0);

    // Space = rows * (grouping attribute bytes + measure bytes).
    assert_eq!(records[0].space, 10.0 * (4.0 + 8.0));
    assert_eq!(records[1].space, 100.0 * (4.0 + 4.0 + 8.0));
}

#[test]
fn test_uncovered_patterns_contribute_nothing() {
    let schema = schema();
    let workload = Workload::new(vec![QueryPattern {
        attributes: AttributeSet::from_indices(2, &[1]),
        frequency: 5.0,
    }]);
    // {day} is not a superset of {region}.
    let aggregates = vec![Aggregate::new(&schema, AttributeSet::from_bits(2, 0b01)).unwrap()];

    let records = compute_aggregate_costs(&schema, &workload, &aggregates).unwrap();
    assert_eq!(records[0].saved_query_rows, 0.0);
    assert_eq!(records[0].query_load, 0.0);
}

#[test]
fn test_empty_workload_yields_zero_query_load() {
    let schema = schema();
    let workload = Workload::default();
    let aggregates = vec![Aggregate::new(&schema, AttributeSet::from_bits(2, 0b01)).unwrap()];

    let records = compute_aggregate_costs(&schema, &workload, &aggregates).unwrap();
    assert_eq!(records[0].saved_query_rows, 0.0);
    assert_eq!(records[0].query_load, 0.0);
}

#[test]
fn test_describe_format() {
    let record = CostBenefit {
        row_count: 12.9,
        space: 100.2,
        load_time: 3.7,
        saved_query_rows: 42.9,
        query_load: 0.25,
    };
    assert_eq!(
        record.describe(),
        "12 rows, 100 bytes, 3 load cost, 42 query rows saved, used by 25% of queries"
    );
}

#[test]
fn test_aggregate_description_lists_attribute_names() {
    let schema = schema();
    let aggregate = Aggregate::new(&schema, AttributeSet::from_bits(2, 0b11)).unwrap();
    assert_eq!(aggregate.description(&schema), "{day, region}");
}
