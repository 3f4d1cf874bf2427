//! Aggdes CLI - Design aggregate tables for a star-schema workload
//!
//! Usage:
//!   aggdes design <schema.toml> --cost-limit <budget> [options]
//!   aggdes validate <schema.toml>
//!
//! Examples:
//!   aggdes design demos/sales.toml --cost-limit 500000
//!   aggdes design demos/sales.toml --cost-limit 500000 --aggregate-limit 10 --output json
//!   aggdes validate demos/sales.toml

use aggdes::algorithm::{Algorithm, GreedyAlgorithm, Progress};
use aggdes::config::ParameterSet;
use aggdes::model::{SchemaLoader, Severity, TomlSchemaLoader};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "aggdes")]
#[command(about = "Aggdes - Greedy aggregate-table designer for star-schema workloads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select aggregates for a schema and workload
    Design {
        /// Path to the schema TOML file
        file: PathBuf,

        /// Storage/load budget for the whole aggregate set
        #[arg(long)]
        cost_limit: f64,

        /// Minimum benefit per unit cost for any single aggregate
        #[arg(long, default_value_t = 0.0)]
        min_ratio: f64,

        /// Maximum number of aggregates (approximate cap)
        #[arg(long)]
        aggregate_limit: Option<u32>,

        /// Wall-clock limit in seconds
        #[arg(long)]
        time_limit: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Validate a schema file without running the design
    Validate {
        /// Path to the schema TOML file
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// Machine-readable JSON
    Json,
}

/// Forwards algorithm progress messages to the log.
struct LogProgress;

impl Progress for LogProgress {
    fn report(&mut self, message: &str, complete: f64) {
        info!(complete, "{message}");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Design {
            file,
            cost_limit,
            min_ratio,
            aggregate_limit,
            time_limit,
            output,
        } => cmd_design(
            file,
            ParameterSet {
                time_limit_seconds: time_limit,
                cost_limit,
                min_cost_benefit_ratio: min_ratio,
                aggregate_limit,
            },
            output,
        ),
        Commands::Validate { file } => cmd_validate(file),
    }
}

fn cmd_design(file: PathBuf, parameters: ParameterSet, output: OutputFormat) -> ExitCode {
    let loader = match TomlSchemaLoader::from_path(&file) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error reading '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let (schema, workload) = match loader.create_schema() {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Schema error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut algorithm = GreedyAlgorithm::new();
    let result = match algorithm.run(&schema, &workload, &parameters, &mut LogProgress) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Design error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Text => {
            println!(
                "Selected {} aggregate(s) for fact table '{}'",
                result.aggregates().len(),
                schema.fact_table()
            );
            println!(
                "Cost limit {:.0}, total cost {:.0}, total benefit {:.0}",
                result.cost_limit(),
                result.total_cost(),
                result.total_benefit()
            );
            for (aggregate, cost_benefit) in
                result.aggregates().iter().zip(result.cost_benefits())
            {
                println!(
                    "  {}: {}",
                    aggregate.description(&schema),
                    cost_benefit.describe()
                );
            }
        }
        OutputFormat::Json => {
            let aggregates: Vec<_> = result
                .aggregates()
                .iter()
                .zip(result.cost_benefits())
                .map(|(aggregate, cost_benefit)| {
                    serde_json::json!({
                        "attributes": schema.attribute_names(aggregate.attributes()),
                        "cost_benefit": cost_benefit,
                    })
                })
                .collect();
            let report = serde_json::json!({
                "fact_table": schema.fact_table(),
                "cost_limit": result.cost_limit(),
                "total_cost": result.total_cost(),
                "total_benefit": result.total_benefit(),
                "aggregates": aggregates,
            });
            println!("{}", serde_json::to_string_pretty(&report).unwrap());
        }
    }
    ExitCode::SUCCESS
}

fn cmd_validate(file: PathBuf) -> ExitCode {
    let loader = match TomlSchemaLoader::from_path(&file) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error reading '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let messages = loader.validate_schema();
    if messages.is_empty() {
        println!("{}: OK", file.display());
        return ExitCode::SUCCESS;
    }
    for message in &messages {
        println!("{message}");
    }
    if messages.iter().any(|m| m.severity == Severity::Error) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
