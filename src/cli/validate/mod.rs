//! Validate command - audits every interactor claim of a pipeline document

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context as _};
use clap::Args;
use tracing::info;

use super::{banner, format_elapsed, resolve_credential};
use crate::config::AppConfig;
use crate::domain::{ApiCredential, DomainError, ReasoningProviderFactory};
use crate::infrastructure::document_io::{default_output_path, load_document, save_document};
use crate::infrastructure::llm::GeminiProviderFactory;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::services::{EvidenceValidator, ValidationReport};

/// Arguments for the validate command
#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to the pipeline JSON file to validate
    pub input: PathBuf,

    /// Output path (default: <input>_validated.<ext>)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print detailed progress information
    #[arg(long)]
    pub verbose: bool,

    /// Number of interactors per batch (overrides config)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

/// Run the evidence audit
pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging, args.verbose);

    let credential = resolve_credential(None, &config.service.api_key_env);
    let factory = GeminiProviderFactory::new(
        config.service.base_url.as_str(),
        Duration::from_secs(config.service.timeout_secs),
    );

    execute(&args, &config, &factory, credential).await?;
    Ok(())
}

/// Audit `args.input` and save the result; returns where it was written
pub(crate) async fn execute(
    args: &ValidateArgs,
    config: &AppConfig,
    factory: &dyn ReasoningProviderFactory,
    credential: Option<ApiCredential>,
) -> anyhow::Result<PathBuf> {
    let credential = credential.ok_or_else(|| {
        DomainError::credential(format!(
            "{} not found. Add it to your .env file.",
            config.service.api_key_env
        ))
    })?;

    if !args.input.exists() {
        bail!("Input file not found: {}", args.input.display());
    }

    banner("EVIDENCE VALIDATOR & CITATION ENRICHER");
    println!("Input: {}", args.input.display());

    let document = load_document(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let provider = factory.create(&credential)?;
    let validator = EvidenceValidator::new(provider, config.validator.profile.clone());
    let batch_size = args.batch_size.unwrap_or(config.validator.batch_size);

    banner(&format!("EVIDENCE AUDIT FOR {}", document.main_protein()));

    let started = Instant::now();
    let (document, report) = validator.validate(document, batch_size).await;
    let elapsed = started.elapsed();

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    save_document(&document, &output)
        .await
        .with_context(|| format!("Failed to save {}", output.display()))?;

    info!(
        batches = report.batches,
        fell_back = report.batches_fell_back,
        "Validation finished"
    );

    banner("[OK] VALIDATION COMPLETE");
    print_summary(&report);
    println!("{}", format_elapsed(elapsed));
    println!("Output saved to: {}", output.display());

    Ok(output)
}

fn print_summary(report: &ValidationReport) {
    let tally = &report.tally;

    println!(
        "Interactors: {} in, {} out ({} deleted, {} without valid functions)",
        report.interactors_in,
        report.interactors_out,
        tally.interactors_deleted,
        tally.interactors_emptied
    );
    println!(
        "Functions: {} verified, {} corrected, {} dropped",
        tally.claims_verified, tally.claims_corrected, tally.claims_dropped
    );

    if report.batches_fell_back > 0 {
        println!(
            "Batches kept unaudited: {} of {}",
            report.batches_fell_back, report.batches
        );
    }
}
