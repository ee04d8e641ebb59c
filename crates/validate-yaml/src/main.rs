use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yamlschema_validation::{ValidationOptions, ValidationReport, Validator, load_schema_file};

/// Exit status when validation reported at least one error
const EXIT_INVALID: u8 = 1;
/// Exit status for unreadable input or an unusable schema
const EXIT_FAILURE: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Validate YAML documents against a schema
#[derive(Parser, Debug)]
#[command(name = "validate-yaml")]
#[command(about = "Validate YAML documents against schemas", long_about = None)]
struct Args {
    /// Path to the schema file (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    schema: PathBuf,

    /// Path to the YAML document to validate; reads stdin when absent
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Report keys not declared by the schema as errors
    #[arg(long)]
    strict_keys: bool,

    /// Stop at the first error
    #[arg(long)]
    stop_on_first: bool,

    /// Only trust explicit tags when inferring scalar types
    #[arg(long)]
    strict_types: bool,

    /// Accept YAML 1.1 booleans such as yes/no/on/off
    #[arg(long = "yaml11-bools", value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    yaml11_bools: bool,

    /// Sort diagnostics by source position
    #[arg(long, value_name = "BOOL", default_value_t = true, action = clap::ArgAction::Set)]
    sort: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Args {
    fn options(&self) -> ValidationOptions {
        ValidationOptions {
            strict_keys: self.strict_keys,
            stop_on_first: self.stop_on_first,
            strict_types: self.strict_types,
            yaml11_booleans: self.yaml11_bools,
        }
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "validate_yaml=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let schema = load_schema_file(&args.schema).context("load schema")?;

    let content = read_input(args.input.as_ref())?;

    let validator = Validator::new(schema).with_options(args.options());
    let report = validator.validate_str(&content);

    print_report(&report, args)?;

    if report.has_errors() {
        Ok(ExitCode::from(EXIT_INVALID))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    tracing::debug!(input = ?path, "reading input");
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read input from stdin")?;
            Ok(content)
        }
    }
}

fn print_report(report: &ValidationReport, args: &Args) -> Result<()> {
    match args.format {
        OutputFormat::Json => {
            let mut report = report.clone();
            if args.sort {
                report.sort_by_position();
            }
            let json = serde_json::to_string_pretty(&report.to_json())
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Text if report.is_empty() => println!("valid"),
        OutputFormat::Text => print!("{}", report.format_all(args.sort)),
    }
    Ok(())
}
