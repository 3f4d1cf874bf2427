use aggdes::model::{AttributeSet, SchemaError, SchemaLoader, Severity, TomlSchemaLoader};

const SALES: &str = r#"
[fact]
table = "sales_fact"
row_count = 1000000

[[attribute]]
name = "day"
cardinality = 365

[[attribute]]
name = "product"
cardinality = 500
bytes = 8

[[attribute]]
name = "region"
cardinality = 10

[[measure]]
name = "units"
aggregator = "sum"

[[measure]]
name = "revenue"
bytes = 8

[[query]]
attributes = ["day", "product"]
frequency = 10.0

[[query]]
attributes = ["region"]

[[query]]
attributes = ["day", "product"]
frequency = 5.0
"#;

#[test]
fn test_create_schema_from_toml() {
    let loader = TomlSchemaLoader::from_str(SALES);
    let (schema, workload) = loader.create_schema().unwrap();

    assert_eq!(schema.fact_table(), "sales_fact");
    assert_eq!(schema.fact_row_count(), 1_000_000.0);
    assert_eq!(schema.attribute_count(), 3);
    assert_eq!(schema.attributes()[1].name, "product");
    assert_eq!(schema.attributes()[1].bytes, 8.0);
    // bytes defaults to 4 when omitted
    assert_eq!(schema.attributes()[0].bytes, 4.0);
    assert_eq!(schema.measures().len(), 2);
    assert_eq!(schema.measures()[0].aggregator, "sum");

    // Duplicate {day, product} queries merged: 10 + 5; frequency defaults
    // to 1 when omitted.
    assert_eq!(workload.patterns().len(), 2);
    let day_product = AttributeSet::from_indices(3, &[0, 1]);
    let merged = workload
        .patterns()
        .iter()
        .find(|p| p.attributes == day_product)
        .unwrap();
    assert_eq!(merged.frequency, 15.0);
    assert_eq!(workload.total_frequency(), 16.0);
}

#[test]
fn test_validate_clean_schema_warns_only_when_workload_empty() {
    let loader = TomlSchemaLoader::from_str(
        r#"
[fact]
table = "sales"
row_count = 1000

[[attribute]]
name = "day"
cardinality = 365
"#,
    );
    let messages = loader.validate_schema();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Warning);
    assert!(messages[0].message.contains("no queries"));

    // Warnings do not prevent schema creation.
    let (_, workload) = loader.create_schema().unwrap();
    assert!(workload.is_empty());
}

#[test]
fn test_validate_reports_structural_problems() {
    let loader = TomlSchemaLoader::from_str(
        r#"
[fact]
table = "sales"
row_count = 0

[[attribute]]
name = "day"
cardinality = 365

[[attribute]]
name = "day"
cardinality = 0.5

[[query]]
attributes = ["month"]
frequency = -1.0
"#,
    );
    let messages = loader.validate_schema();
    let errors: Vec<_> = messages
        .iter()
        .filter(|m| m.severity == Severity::Error)
        .collect();

    assert!(errors.iter().any(|m| m.message.contains("positive row count")));
    assert!(errors.iter().any(|m| m.message.contains("duplicate attribute")));
    assert!(errors.iter().any(|m| m.message.contains("cardinality")));
    assert!(errors
        .iter()
        .any(|m| m.message.contains("undefined attribute 'month'")));
    assert!(errors.iter().any(|m| m.message.contains("negative frequency")));

    assert!(matches!(
        loader.create_schema(),
        Err(SchemaError::Invalid(_))
    ));
}

#[test]
fn test_validate_rejects_empty_attribute_list() {
    let loader = TomlSchemaLoader::from_str(
        r#"
[fact]
table = "sales"
row_count = 1000
"#,
    );
    let messages = loader.validate_schema();
    assert!(messages
        .iter()
        .any(|m| m.severity == Severity::Error && m.message.contains("no attributes")));
}

#[test]
fn test_validate_rejects_oversized_universe() {
    let mut doc = String::from("[fact]\ntable = \"wide\"\nrow_count = 1000\n");
    for i in 0..64 {
        doc.push_str(&format!("[[attribute]]\nname = \"a{i}\"\ncardinality = 2\n"));
    }
    let loader = TomlSchemaLoader::from_str(doc);
    let messages = loader.validate_schema();
    assert!(messages
        .iter()
        .any(|m| m.severity == Severity::Error && m.message.contains("at most 63")));
}

#[test]
fn test_malformed_toml_surfaces_as_validation_error() {
    let loader = TomlSchemaLoader::from_str("not toml at all [");
    let messages = loader.validate_schema();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Error);

    assert!(matches!(loader.create_schema(), Err(SchemaError::Parse(_))));
}
