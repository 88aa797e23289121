//! # hl7-cli
//!
//! Command-line interface for HL7 v2 messages: parse to JSON, generate from
//! JSON, validate against MDM^T02, build from form data, and inspect.
//!
//! Exit codes: 0 on success, 2 when the input was read but rejected (parse
//! failure, invalid report, no value at a path), 3 on any other error.

mod catalog;
mod config;
mod views;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use hl7_builder::MdmMessageData;
use hl7_codec::{Hl7Generator, Hl7Parser, ParseOutcome, ParseReport};
use hl7_model::{Document, FieldPath};
use hl7_validation::{ValidationReporter, should_validate_as_mdm};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use views::View;

const EXIT_REJECTED: u8 = 2;
const EXIT_FATAL: u8 = 3;

#[derive(Parser)]
#[command(name = "hl7")]
#[command(about = "HL7 v2 message toolkit")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a message and print the parse report as JSON
    Parse {
        /// Input message file
        input: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Generate a message from a JSON document
    Generate {
        /// Document JSON file
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Segment order, e.g. MSH,PID,TXA or `document`
        #[arg(long)]
        order: Option<String>,
    },

    /// Validate a message against the MDM^T02 profile
    Validate {
        /// Input message file
        input: PathBuf,
    },

    /// Build an MDM^T02 message from JSON or YAML form data
    Build {
        /// Form data file (.json, .yaml, .yml)
        input: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a message as raw text, a tree, or a field table
    Inspect {
        /// Input message file
        input: PathBuf,

        /// Output layout
        #[arg(long, value_enum, default_value_t = View::Raw)]
        view: View,
    },

    /// Print the value at a field path such as PID-3.1 or OBX[1]-5
    Get {
        /// Input message file
        input: PathBuf,

        /// Field path
        path: String,
    },
}

/// `validate` output for messages that are not MDM
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SkippedValidation {
    skipped: bool,
    message_type: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { input, pretty } => {
            let text = read_input(&input)?;
            let result = Hl7Parser::with_limits(config.limits).parse(&text);
            let success = result.is_ok();
            if let Ok(outcome) = &result {
                eprintln!(
                    "Parse summary: segments={}, warnings={}",
                    outcome.document.occurrence_count(),
                    outcome.warnings.len()
                );
            }

            let report = ParseReport::from(result);
            println!("{}", to_json(&report, pretty || config.pretty)?);
            Ok(exit_status(success))
        }
        Commands::Generate {
            input,
            output,
            order,
        } => {
            let json = read_input(&input)?;
            let doc: Document = serde_json::from_str(&json)
                .with_context(|| format!("Invalid document JSON in {}", input.display()))?;
            let text = Hl7Generator::with_order(config.segment_order(order.as_deref()))
                .generate(&doc)?;
            write_output(output.as_deref(), &text)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { input } => {
            let outcome = parse_input(&input, &config)?;
            let message_type = outcome.message_type;
            if !should_validate_as_mdm(message_type.as_deref()) {
                tracing::info!(?message_type, "Not an MDM message, validation skipped");
                let skipped = SkippedValidation {
                    skipped: true,
                    message_type,
                };
                println!("{}", to_json(&skipped, config.pretty)?);
                return Ok(ExitCode::SUCCESS);
            }

            let report = hl7_validation::validate(&outcome.document);
            eprint!("{}", ValidationReporter::new().render_text(&report));
            println!("{}", to_json(&report, config.pretty)?);
            Ok(exit_status(report.valid))
        }
        Commands::Build { input, output } => {
            let data = read_form_data(&input)?;
            let text = hl7_builder::generate_mdm(&data)?;
            write_output(output.as_deref(), &text)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { input, view } => {
            let outcome = parse_input(&input, &config)?;
            views::write_view(view, &outcome.document, io::stdout().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Get { input, path } => {
            let path: FieldPath = path.parse()?;
            let outcome = parse_input(&input, &config)?;
            let value = match path.component {
                None => outcome.document.field_at(&path).map(views::display_value),
                Some(_) => outcome.document.value_at(&path).map(str::to_string),
            };
            match value {
                Some(value) => {
                    println!("{value}");
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("No value at {path}");
                    Ok(ExitCode::from(EXIT_REJECTED))
                }
            }
        }
    }
}

fn exit_status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_REJECTED)
    }
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_input(path: &Path, config: &CliConfig) -> Result<ParseOutcome> {
    let text = read_input(path)?;
    Hl7Parser::with_limits(config.limits)
        .parse(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_form_data(path: &Path) -> Result<MdmMessageData> {
    let text = read_input(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let data = if is_yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid YAML form data in {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON form data in {}", path.display()))?
    };
    Ok(data)
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote message");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
