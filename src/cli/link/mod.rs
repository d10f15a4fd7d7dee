//! Link-chains command - resolves indirect interactions into the store

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context as _};
use clap::Args;

use super::{banner, format_elapsed, resolve_credential};
use crate::config::AppConfig;
use crate::domain::{ApiCredential, ReasoningProviderFactory};
use crate::infrastructure::document_io::{load_link_target, save_link_target};
use crate::infrastructure::interaction::JsonFileInteractionStore;
use crate::infrastructure::llm::GeminiProviderFactory;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::services::IndirectChainLinker;

/// Arguments for the link-chains command
#[derive(Args, Clone)]
pub struct LinkArgs {
    /// Pipeline document or bare ctx_json file
    pub input: PathBuf,

    /// Output path (default: overwrite the input)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// API key (default: read from the configured environment variable)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Interaction store directory (overrides config)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Print detailed progress information
    #[arg(long)]
    pub verbose: bool,
}

/// Run the chain linker
pub async fn run(args: LinkArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    init_logging(&config.logging, args.verbose);

    let credential = resolve_credential(args.api_key.clone(), &config.service.api_key_env);
    let factory = Arc::new(GeminiProviderFactory::new(
        config.service.base_url.as_str(),
        Duration::from_secs(config.service.timeout_secs),
    ));

    execute(&args, &config, factory, credential).await?;
    Ok(())
}

/// Link the chains of `args.input` and save the result; returns where it was written
pub(crate) async fn execute(
    args: &LinkArgs,
    config: &AppConfig,
    factory: Arc<dyn ReasoningProviderFactory>,
    credential: Option<ApiCredential>,
) -> anyhow::Result<PathBuf> {
    if !args.input.exists() {
        bail!("Input file not found: {}", args.input.display());
    }

    let target = load_link_target(&args.input)
        .await
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let Some(ctx) = target.context() else {
        bail!("No ctx_json object in {}", args.input.display());
    };

    let store_path = args
        .store
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.store.path));
    let store = Arc::new(JsonFileInteractionStore::new(store_path));
    let linker = IndirectChainLinker::new(factory, store, config.linker.profile.clone());

    banner(&format!("INDIRECT CHAIN LINKER for {}", ctx.main()));

    let started = Instant::now();
    let (ctx, report) = linker.link_indirect_chains(ctx, credential.as_ref()).await;
    let elapsed = started.elapsed();

    let target = target.with_context(ctx);
    let output = args.output.clone().unwrap_or_else(|| args.input.clone());

    save_link_target(&target, &output)
        .await
        .with_context(|| format!("Failed to save {}", output.display()))?;

    println!(
        "Successfully linked {} of {} indirect chains in database.",
        report.linked, report.chains
    );
    println!("{}", format_elapsed(elapsed));
    println!("Output saved to: {}", output.display());

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reasoning::{MockProviderFactory, MockReasoningProvider};
    use crate::domain::ReasoningProfile;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn args(input: PathBuf, store: PathBuf) -> LinkArgs {
        LinkArgs {
            input,
            output: None,
            api_key: None,
            store: Some(store),
            verbose: false,
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.linker.profile = ReasoningProfile::chain_link().with_base_delay_ms(0);
        config
    }

    #[tokio::test]
    async fn test_bare_context_is_linked_in_place() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ctx.json");
        let store = dir.path().join("store");
        std::fs::write(
            &input,
            json!({
                "main": "ATXN3",
                "interactors": [
                    {"primary": "TP53", "interaction_type": "indirect", "upstream_interactor": "VCP"}
                ]
            })
            .to_string(),
        )
        .unwrap();

        let provider = Arc::new(
            MockReasoningProvider::new().with_text(r#"{"function": "Extraction", "arrow": "inhibits"}"#),
        );
        let factory = Arc::new(MockProviderFactory::new(provider));

        let output = execute(
            &args(input.clone(), store.clone()),
            &config(),
            factory,
            ApiCredential::new("test-key"),
        )
        .await
        .unwrap();

        assert_eq!(output, input);

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&input).unwrap()).unwrap();
        assert_eq!(
            written["interactors"][0]["_linked_mediator_interaction"],
            json!("VCP->TP53")
        );
        assert!(store.join("VCP.json").exists());
    }

    #[tokio::test]
    async fn test_without_credential_the_input_is_rewritten_unchanged() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("ctx.json");
        let store = dir.path().join("store");
        let original = json!({
            "main": "ATXN3",
            "interactors": [{"primary": "TP53", "interaction_type": "indirect", "upstream_interactor": "VCP"}]
        });
        std::fs::write(&input, original.to_string()).unwrap();

        let factory = Arc::new(MockProviderFactory::new(Arc::new(MockReasoningProvider::new())));

        execute(&args(input.clone(), store.clone()), &config(), factory.clone(), None)
            .await
            .unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&input).unwrap()).unwrap();
        assert_eq!(written, original);
        assert_eq!(factory.created(), 0);
        assert!(!store.exists());
    }
}
