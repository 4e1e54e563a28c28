use clap::{Parser, Subcommand};
use form_logic::{
    EngineConfig, FormLogic, IdRemap, ValidationResult, extract_rules, list_referenceable_fields,
    rules_schema,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "FORM_LOGIC_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Inspect conditional visibility rules of a form document",
    long_about = "Lists fields and rules of an authoring document, resolves field visibility for a set of answers, and validates answers with hidden fields exempt"
)]
struct Cli {
    /// Optional EngineConfig JSON (node type names, logic operator fallback).
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,
    /// Log engine decisions to stderr (overridden by FORM_LOGIC_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the fields rules may reference.
    Fields {
        /// Path to the authoring document JSON.
        #[arg(long, value_name = "DOCUMENT")]
        document: PathBuf,
    },
    /// Print the rules found in the document and any logic nodes that were skipped.
    Rules {
        /// Path to the authoring document JSON.
        #[arg(long, value_name = "DOCUMENT")]
        document: PathBuf,
    },
    /// Print the visibility of every field for a set of answers.
    Resolve {
        /// Path to the authoring document JSON.
        #[arg(long, value_name = "DOCUMENT")]
        document: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Validate answers; hidden fields are exempt.
    Validate {
        /// Path to the authoring document JSON.
        #[arg(long, value_name = "DOCUMENT")]
        document: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Give every field a fresh id and rewrite all rule references.
    Remap {
        /// Path to the authoring document JSON.
        #[arg(long, value_name = "DOCUMENT")]
        document: PathBuf,
        /// Where to write the remapped document (defaults to stdout).
        #[arg(long, value_name = "OUT")]
        out: Option<PathBuf>,
    },
    /// Print the JSON Schema of a rule collection.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Fields { document } => run_fields(&document, &config),
        Command::Rules { document } => run_rules(&document, &config),
        Command::Resolve { document, answers } => run_resolve(&document, &answers, &config),
        Command::Validate { document, answers } => run_validate(&document, &answers, &config),
        Command::Remap { document, out } => run_remap(&document, out, &config),
        Command::Schema => print_json(&rules_schema()),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => {
            let config: EngineConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
            debug!(path = %path.display(), "engine config loaded");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn read_json(path: &Path) -> CliResult<Value> {
    let contents = fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {}", path.display(), error))?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_fields(document_path: &Path, config: &EngineConfig) -> CliResult<()> {
    let document = read_json(document_path)?;
    let fields = list_referenceable_fields(&document, config)?;
    print_json(&fields)
}

fn run_rules(document_path: &Path, config: &EngineConfig) -> CliResult<()> {
    let document = read_json(document_path)?;
    let extraction = extract_rules(&document, config)?;
    print_json(&extraction)
}

fn run_resolve(document_path: &Path, answers_path: &Path, config: &EngineConfig) -> CliResult<()> {
    let logic = FormLogic::from_document(&read_json(document_path)?, config)?;
    let answers = read_json(answers_path)?;
    print_json(&logic.visibility(&answers))
}

fn run_validate(document_path: &Path, answers_path: &Path, config: &EngineConfig) -> CliResult<()> {
    let logic = FormLogic::from_document(&read_json(document_path)?, config)?;
    let answers = read_json(answers_path)?;

    let result = logic.validate(&answers);
    println!(
        "Validation result: {}",
        if result.valid { "valid" } else { "invalid" }
    );
    describe_validation(&result);

    let hidden: Vec<String> = logic
        .visibility(&answers)
        .into_iter()
        .filter(|(_, visible)| !visible)
        .map(|(id, _)| id)
        .collect();
    if !hidden.is_empty() {
        println!("Hidden fields: {}", hidden.join(", "));
    }

    if result.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!("  {} - {}", error.path, error.message);
        }
    }
    if !result.missing_required.is_empty() {
        println!(
            "Missing required answers: {}",
            result.missing_required.join(", ")
        );
    }
    if !result.unknown_fields.is_empty() {
        println!(
            "Unknown answer fields: {}",
            result.unknown_fields.join(", ")
        );
    }
}

fn run_remap(document_path: &Path, out: Option<PathBuf>, config: &EngineConfig) -> CliResult<()> {
    let mut document = read_json(document_path)?;
    let fields = list_referenceable_fields(&document, config)?;
    let remap = IdRemap::regenerate(&fields);
    let rewritten = remap.apply_to_document(&mut document, config)?;

    match out {
        Some(path) => {
            fs::write(&path, serde_json::to_string_pretty(&document)?)?;
            println!(
                "Remapped {} fields ({} references); wrote {}",
                remap.len(),
                rewritten,
                path.display()
            );
            Ok(())
        }
        None => print_json(&document),
    }
}
