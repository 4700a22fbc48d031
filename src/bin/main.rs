//! Quill CLI - inspect and exercise report filter definitions
//!
//! Usage:
//!   quill operators <type>
//!   quill check <definition.json> <catalog.json>
//!   quill serialize <definition.json>
//!   quill preview <id> [--filtered]
//!
//! Examples:
//!   quill operators date
//!   quill check report.json fields.json
//!   quill preview 7 --filtered

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use quill::catalog::{Catalog, DataType, ExecutorCatalogProvider, Field};
use quill::config::Settings;
use quill::executor::protocol::FieldRecord;
use quill::executor::ExecutorClient;
use quill::filter::operators_for;
use quill::model::{
    DefinitionId, DefinitionRecord, DefinitionStore, ExecutorDefinitionStore,
    ReportTypeDefinition,
};
use quill::notice::Notice;
use quill::preview::{ExecutorPreviewBackend, PreviewOutcome};
use quill::session::EditingSession;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - field projection and filter configuration for report definitions")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to quill.toml or ~/.config/quill/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the operators offered for a field data type
    Operators {
        /// Data type name, e.g. text, integer, date
        data_type: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        output: OutputFormat,
    },

    /// Reconcile a stored definition against a field catalog
    Check {
        /// Path to the definition record (JSON)
        definition: PathBuf,

        /// Path to the field list (JSON array)
        catalog: PathBuf,
    },

    /// Print the filter parameter a definition would send
    Serialize {
        /// Path to the definition record (JSON)
        definition: PathBuf,
    },

    /// Fetch a data preview of a stored definition
    Preview {
        /// Definition id
        id: u64,

        /// Apply the definition's default filter
        #[arg(short, long)]
        filtered: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON array
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    quill::logging::init(&settings.logging, cli.verbose);

    match cli.command {
        Commands::Operators { data_type, output } => cmd_operators(&data_type, output),
        Commands::Check {
            definition,
            catalog,
        } => cmd_check(&definition, &catalog),
        Commands::Serialize { definition } => cmd_serialize(&definition),
        Commands::Preview { id, filtered } => cmd_preview(&settings, id, filtered).await,
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, quill::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&source)
        .map_err(|e| format!("Error parsing '{}': {}", path.display(), e))
}

fn read_definition(path: &Path) -> Result<(ReportTypeDefinition, Vec<Notice>), String> {
    let record: DefinitionRecord = read_json(path)?;
    ReportTypeDefinition::from_record(record)
        .map_err(|e| format!("Invalid definition '{}': {}", path.display(), e))
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", notice);
    }
}

fn cmd_operators(data_type: &str, output: OutputFormat) -> ExitCode {
    let data_type = DataType::parse(data_type);
    let specs = operators_for(&data_type);

    match output {
        OutputFormat::Table => {
            println!("Operators for {}:", data_type.as_str());
            for spec in &specs {
                let shape = serde_json::to_value(spec.value_shape)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default();
                println!("  {:<24} {:<28} {}", spec.operator.as_str(), spec.label, shape);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&specs) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding operators: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn cmd_check(definition: &Path, catalog: &Path) -> ExitCode {
    let (definition, notices) = match read_definition(definition) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    print_notices(&notices);

    let records: Vec<FieldRecord> = match read_json(catalog) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let Some(data_source_id) = definition.data_source_id else {
        eprintln!("Definition '{}' has no data source", definition.code);
        return ExitCode::FAILURE;
    };

    let fields: Vec<Field> = records.into_iter().map(Field::from).collect();
    let catalog = Arc::new(Catalog::new(data_source_id, fields));
    debug!(fields = catalog.len(), "catalog loaded from file");

    let mut session = EditingSession::edit(definition);
    let report = session.on_data_source_changed(catalog);
    print_notices(session.notices());

    if report.is_empty() {
        println!("OK: definition is consistent with the catalog");
        return ExitCode::SUCCESS;
    }

    // Print the repaired record so it can be saved back.
    let record = match session.definition().to_record() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error encoding definition: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&record) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding definition: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_serialize(definition: &Path) -> ExitCode {
    let (definition, notices) = match read_definition(definition) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    print_notices(&notices);

    match definition.filter_config.to_param() {
        Some(param) => println!("{}", param),
        None => eprintln!("No filter would be sent"),
    }
    ExitCode::SUCCESS
}

async fn cmd_preview(settings: &Settings, id: u64, filtered: bool) -> ExitCode {
    let client = match ExecutorClient::spawn_with_settings(settings).await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Error starting executor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = ExecutorDefinitionStore::new(client.clone());
    let (definition, notices) = match store.load(DefinitionId(id)).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading definition {}: {}", id, e);
            return ExitCode::FAILURE;
        }
    };
    print_notices(&notices);

    let data_source_id = definition.data_source_id;
    let mut session = EditingSession::edit(definition).with_preview_limit(settings.preview.limit);

    // Stored conditions may name fields the data source no longer has.
    if let Some(data_source_id) = data_source_id {
        let provider = ExecutorCatalogProvider::new(client.clone());
        session.select_data_source(&provider, data_source_id).await;
        print_notices(&session.take_notices());
    }

    debug!(
        definition_id = id,
        ?data_source_id,
        filtered,
        "requesting preview"
    );

    let backend = ExecutorPreviewBackend::new(client);

    match session.request_preview(&backend, filtered).await {
        Some(PreviewOutcome::Committed) => {}
        Some(PreviewOutcome::Failed(notice)) => {
            eprintln!("{}", notice);
            return ExitCode::FAILURE;
        }
        Some(PreviewOutcome::Stale) | None => {
            eprintln!("No preview available for definition {}", id);
            return ExitCode::FAILURE;
        }
    }

    let Some(preview) = session.preview() else {
        return ExitCode::FAILURE;
    };
    let state = preview.state();
    for row in &state.items {
        println!("{}", row);
    }
    eprintln!(
        "{} of {} rows{}",
        state.items.len(),
        state.total,
        if state.filters_applied { " (filtered)" } else { "" }
    );
    ExitCode::SUCCESS
}
