use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aibom_core::ProvenanceMap;
use aibom_extract::{
    DirectoryFiles, ExtractionContext, MetadataExtractor, ModelInfo, NoSummarizer,
};
use aibom_registry::FieldRegistry;
use aibom_scoring::{CompletenessScorer, RequiredKeysValidator, ScoreReport};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "aibom-engine")]
#[command(about = "Registry-driven AIBOM field extraction and completeness scoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a field registry and report its integrity.
    CheckRegistry(CheckRegistryArgs),
    /// Extract field values with provenance from a model bundle.
    Extract(ExtractArgs),
    /// Score one or more AIBOM documents for completeness.
    Score(ScoreArgs),
}

#[derive(Debug, Args)]
struct CheckRegistryArgs {
    /// Field registry JSON file.
    registry: PathBuf,
    /// Exit non-zero when integrity errors are found.
    #[arg(long)]
    strict: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Model bundle JSON: model_id, model_info, readme, configs.
    #[arg(long)]
    input: PathBuf,
    /// Field registry JSON file. Without it the legacy extractor runs.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Local checkout of the model repository, used for missing README,
    /// configuration records and license files.
    #[arg(long)]
    files_dir: Option<PathBuf>,
    /// Derive a description from the README when no source provides one.
    #[arg(long)]
    enrich: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// AIBOM documents to score.
    #[arg(required = true)]
    documents: Vec<PathBuf>,
    /// Field registry JSON file.
    #[arg(long)]
    registry: PathBuf,
    /// Provenance map, or the output of `extract`, applied to every document.
    #[arg(long)]
    provenance: Option<PathBuf>,
    /// Attach schema validation results to each report.
    #[arg(long)]
    validate: bool,
    /// Number of parallel scoring jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

/// Input accepted by `extract`.
#[derive(Debug, Deserialize)]
struct ModelBundle {
    model_id: String,
    #[serde(default)]
    model_info: Option<ModelInfo>,
    #[serde(default)]
    readme: Option<String>,
    #[serde(default)]
    configs: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
struct ScoredDocument {
    document: String,
    report: ScoreReport,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::CheckRegistry(args) => run_check_registry(args),
        Command::Extract(args) => run_extract(args),
        Command::Score(args) => run_score(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check_registry(args: CheckRegistryArgs) -> Result<(), String> {
    let registry = load_registry(&args.registry)?;
    let report = registry.validate_integrity();
    print_output(&report, args.format)?;

    if args.strict && !report.valid {
        return Err(format!(
            "Registry '{}' has {} integrity error(s)",
            args.registry.display(),
            report.errors.len()
        ));
    }
    Ok(())
}

fn run_extract(args: ExtractArgs) -> Result<(), String> {
    let raw = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let bundle: ModelBundle = serde_json::from_str(&raw)
        .map_err(|err| format!("Invalid model bundle '{}': {err}", args.input.display()))?;

    let mut builder = ExtractionContext::builder(&bundle.model_id).enable_enrichment(args.enrich);
    if let Some(info) = bundle.model_info {
        builder = builder.model_info(info);
    }
    if let Some(readme) = bundle.readme {
        builder = builder.readme(readme);
    }
    for (record, value) in bundle.configs {
        builder = builder.config(record, value);
    }
    if let Some(dir) = &args.files_dir {
        if !dir.is_dir() {
            return Err(format!("Files directory '{}' does not exist", dir.display()));
        }
        builder = builder.files(Arc::new(DirectoryFiles::new(dir)));
    }
    let context = builder.build();

    let extractor = match &args.registry {
        Some(path) => MetadataExtractor::new(Arc::new(load_registry(path)?)),
        None => MetadataExtractor::legacy(),
    }
    .with_summarizer(Arc::new(NoSummarizer));

    let output = extractor.extract(&context);
    info!(
        model = context.model_id(),
        fields = output.metadata.len(),
        "extraction finished"
    );
    print_output(&output, args.format)
}

fn run_score(args: ScoreArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let registry = Arc::new(load_registry(&args.registry)?);
    let provenance = args.provenance.as_deref().map(load_provenance).transpose()?;

    let mut scorer = CompletenessScorer::new(registry);
    if args.validate {
        scorer = scorer.with_validator(RequiredKeysValidator);
    }

    let jobs = args.jobs.unwrap_or_else(rayon::current_num_threads).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;
    debug!(jobs, documents = args.documents.len(), "scoring documents");

    let results: Vec<Result<ScoredDocument, String>> = pool.install(|| {
        args.documents
            .par_iter()
            .map(|path| {
                let document = read_json(path)?;
                let report = scorer.score(&document, provenance.as_ref());
                Ok(ScoredDocument {
                    document: path.display().to_string(),
                    report,
                })
            })
            .collect()
    });
    let scored = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    print_output(&scored, args.format)
}

fn load_registry(path: &Path) -> Result<FieldRegistry, String> {
    FieldRegistry::load(path).map_err(|err| err.to_string())
}

/// Accepts a bare provenance map or an `extract` output carrying one.
fn load_provenance(path: &Path) -> Result<ProvenanceMap, String> {
    let mut value = read_json(path)?;
    if let Some(inner) = value.get_mut("provenance") {
        value = inner.take();
    }
    serde_json::from_value(value)
        .map_err(|err| format!("Invalid provenance map '{}': {err}", path.display()))
}

fn read_json(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| format!("Invalid JSON in '{}': {err}", path.display()))
}

fn print_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let rendered = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize output: {e}"))?,
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("Failed to serialize output: {e}"))?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
