//! Indirect chain linker
//!
//! For every indirect interactor (main -> mediator -> target) the reasoning
//! service characterises the mediator -> target step. The result is filed in
//! the interaction store under the mediator and the interactor is annotated
//! with a back-reference.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::prompts::chain_link_prompt;
use crate::domain::{
    ApiCredential, Context, DomainError, FallbackExecutor, FunctionClaim, InteractionRecord,
    InteractionStore, Interactor, ReasoningProfile, ReasoningProviderFactory,
};
use crate::infrastructure::extraction::extract_json;

/// Outcome counts for one linking run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Indirect interactors that name a mediator
    pub chains: usize,
    pub linked: usize,
    pub skipped: usize,
}

pub struct IndirectChainLinker {
    factory: Arc<dyn ReasoningProviderFactory>,
    store: Arc<dyn InteractionStore>,
    profile: ReasoningProfile,
}

impl IndirectChainLinker {
    pub fn new(
        factory: Arc<dyn ReasoningProviderFactory>,
        store: Arc<dyn InteractionStore>,
        profile: ReasoningProfile,
    ) -> Self {
        Self {
            factory,
            store,
            profile,
        }
    }

    /// Link every indirect chain of `ctx`.
    ///
    /// Without a credential, or with nothing to link, the context comes back
    /// unchanged and neither the service nor the store is touched. A chain
    /// that fails at any step is skipped; the others still run.
    pub async fn link_indirect_chains(
        &self,
        mut ctx: Context,
        credential: Option<&ApiCredential>,
    ) -> (Context, LinkReport) {
        let mut report = LinkReport::default();

        let Some(credential) = credential else {
            info!("[IndirectLinker] No API key found. Skipping.");
            return (ctx, report);
        };

        let mut interactors = match ctx.interactors() {
            Ok(interactors) => interactors,
            Err(e) => {
                warn!("[IndirectLinker] Unreadable interactor list: {}", e);
                return (ctx, report);
            }
        };

        report.chains = interactors.iter().filter(|i| i.mediator().is_some()).count();

        if report.chains == 0 {
            debug!("[IndirectLinker] No indirect interactors found.");
            return (ctx, report);
        }

        let provider = match self.factory.create(credential) {
            Ok(provider) => provider,
            Err(e) => {
                warn!("[IndirectLinker] Could not create reasoning provider: {}", e);
                report.skipped = report.chains;
                return (ctx, report);
            }
        };
        let executor = FallbackExecutor::new(provider, self.profile.chain());

        let main = ctx.main().to_string();

        info!(main = %main, "Found {} indirect interactions to process.", report.chains);

        for interactor in interactors.iter_mut() {
            let Some(mediator) = interactor.mediator().map(str::to_string) else {
                continue;
            };
            let Some(target) = interactor.primary().map(str::to_string) else {
                warn!(mediator = %mediator, "[Warn] Skipping chain via {}: target has no name", mediator);
                report.skipped += 1;
                continue;
            };

            debug!("Processing chain: {} -> {} -> {}", main, mediator, target);

            match self.link_chain(&executor, &main, &mediator, &target, interactor).await {
                Ok(()) => {
                    interactor.set_linked_mediator(format!("{}->{}", mediator, target));
                    report.linked += 1;
                }
                Err(e) => {
                    warn!(
                        mediator = %mediator,
                        target = %target,
                        "[Warn] Skipping chain {} -> {}: {}",
                        mediator,
                        target,
                        e
                    );
                    report.skipped += 1;
                }
            }
        }

        info!(
            "Successfully linked {} indirect chains in database.",
            report.linked
        );

        if report.linked > 0 {
            ctx.set_interactors(interactors);
        }

        (ctx, report)
    }

    async fn link_chain(
        &self,
        executor: &FallbackExecutor,
        main: &str,
        mediator: &str,
        target: &str,
        interactor: &Interactor,
    ) -> Result<(), DomainError> {
        let prompt = chain_link_prompt(main, mediator, target, &chain_context(main, mediator, target, interactor))?;

        let response = executor.execute(&self.profile.request(prompt)).await?;
        let claim = decode_claim(extract_json(&response.text)?)?;

        let existing = self
            .store
            .get_all_interactions(mediator)
            .await?
            .into_iter()
            .find(|record| record.primary() == Some(target));

        let record = match existing {
            Some(mut record) => {
                record.push_function(claim);
                record
            }
            None => {
                let arrow = claim.get("arrow").cloned();
                InteractionRecord::direct(target, arrow, claim).discovered_in(main)
            }
        };

        debug!("Saving linked interaction: {} -> {}", mediator, target);
        self.store.save_interaction(mediator, target, record).await
    }
}

/// Describe the chain, using the interactor's first claim when it has one
fn chain_context(main: &str, mediator: &str, target: &str, interactor: &Interactor) -> String {
    let chain = format!("Chain: {} -> {} -> {}", main, mediator, target);

    match interactor.functions().into_iter().next() {
        Some(claim) => format!(
            "Function: {}\nProcess: {}\n{}",
            claim.text("function").unwrap_or_else(|| "unspecified".to_string()),
            claim.text("cellular_process").unwrap_or_else(|| "unspecified".to_string()),
            chain
        ),
        None => chain,
    }
}

/// The reply must be a single non-empty object; its fields are stored as sent
fn decode_claim(value: Value) -> Result<FunctionClaim, DomainError> {
    match FunctionClaim::try_from(value) {
        Ok(claim) if !claim.is_empty() => Ok(claim),
        Ok(_) => Err(DomainError::serialization("Expected a function object, got an empty object")),
        Err(other) => Err(DomainError::serialization(format!(
            "Expected a function object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an empty object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::interaction::MockInteractionStore;
    use crate::domain::reasoning::{MockProviderFactory, MockReasoningProvider, MockReply};
    use crate::infrastructure::interaction::InMemoryInteractionStore;
    use serde_json::json;

    fn profile() -> ReasoningProfile {
        ReasoningProfile::chain_link().with_base_delay_ms(0)
    }

    fn credential() -> ApiCredential {
        ApiCredential::new("test-key").unwrap()
    }

    fn claim_reply(function: &str) -> String {
        let claim = json!({
            "function": function,
            "arrow": "inhibits",
            "cellular_process": "VCP extracts ubiquitinated TP53 for degradation",
            "evidence": [{"paper_title": "VCP and TP53", "year": 2019}]
        });
        format!("```json\n{}\n```", claim)
    }

    fn context() -> Context {
        Context::new(
            "ATXN3",
            vec![
                Interactor::new("VCP").with_function(FunctionClaim::new("ERAD")),
                Interactor::new("TP53")
                    .indirect_via("VCP")
                    .with_function(FunctionClaim::new("p53 turnover")),
            ],
        )
    }

    fn linker(
        provider: &Arc<MockReasoningProvider>,
        store: Arc<dyn InteractionStore>,
    ) -> (IndirectChainLinker, Arc<MockProviderFactory>) {
        let factory = Arc::new(MockProviderFactory::new(provider.clone()));
        (IndirectChainLinker::new(factory.clone(), store, profile()), factory)
    }

    #[tokio::test]
    async fn test_no_credential_skips_everything() {
        let provider = Arc::new(MockReasoningProvider::new());
        // no expectations: any store call would panic
        let store = Arc::new(MockInteractionStore::new());
        let (linker, factory) = linker(&provider, store);

        let (ctx, report) = linker.link_indirect_chains(context(), None).await;

        assert_eq!(ctx, context());
        assert_eq!(report, LinkReport::default());
        assert_eq!(factory.created(), 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_indirect_interactors_skips_everything() {
        let provider = Arc::new(MockReasoningProvider::new());
        let store = Arc::new(MockInteractionStore::new());
        let (linker, factory) = linker(&provider, store);
        let direct_only = Context::new("ATXN3", vec![Interactor::new("VCP")]);

        let (ctx, report) = linker
            .link_indirect_chains(direct_only.clone(), Some(&credential()))
            .await;

        assert_eq!(ctx, direct_only);
        assert_eq!(report.chains, 0);
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test]
    async fn test_links_chain_and_annotates_interactor() {
        let provider = Arc::new(MockReasoningProvider::new().with_text(claim_reply("Extraction for degradation")));
        let store = Arc::new(InMemoryInteractionStore::new());
        let (linker, _) = linker(&provider, store.clone());

        let (ctx, report) = linker.link_indirect_chains(context(), Some(&credential())).await;

        assert_eq!(report.chains, 1);
        assert_eq!(report.linked, 1);
        let interactors = ctx.interactors().unwrap();
        assert_eq!(interactors[1].linked_mediator(), Some("VCP->TP53"));
        assert_eq!(interactors[0].linked_mediator(), None);

        let records = store.get_all_interactions("VCP").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].primary(), Some("TP53"));
        assert_eq!(records[0].get("arrow"), Some(&json!("inhibits")));
        assert_eq!(records[0].get("interaction_type"), Some(&json!("direct")));
        assert_eq!(records[0].get("discovered_in_query"), Some(&json!("ATXN3")));

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("Function: p53 turnover"));
        assert!(prompt.contains("Chain: ATXN3 -> VCP -> TP53"));
    }

    #[tokio::test]
    async fn test_linking_same_pair_twice_appends_claim() {
        let provider = Arc::new(
            MockReasoningProvider::new()
                .with_text(claim_reply("first"))
                .with_text(claim_reply("second")),
        );
        let store = Arc::new(InMemoryInteractionStore::new());
        let (linker, _) = linker(&provider, store.clone());

        let (ctx, _) = linker.link_indirect_chains(context(), Some(&credential())).await;
        let (_, report) = linker.link_indirect_chains(ctx, Some(&credential())).await;

        assert_eq!(report.linked, 1);

        let records = store.get_all_interactions("VCP").await.unwrap();
        assert_eq!(records.len(), 1);

        let labels: Vec<_> = records[0]
            .functions()
            .into_iter()
            .map(|f| f.label().to_string())
            .collect();
        assert_eq!(labels, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_unusable_replies_skip_chain_without_saving() {
        let provider = Arc::new(
            MockReasoningProvider::new()
                .with_text("No mechanism could be established.")
                .with_text("[1, 2]"),
        );
        let mut store = MockInteractionStore::new();
        store.expect_get_all_interactions().never();
        store.expect_save_interaction().never();
        let (linker, _) = linker(&provider, Arc::new(store));

        let ctx = Context::new(
            "ATXN3",
            vec![
                Interactor::new("TP53").indirect_via("VCP"),
                Interactor::new("LAMP2").indirect_via("HSC70"),
            ],
        );

        let (ctx, report) = linker.link_indirect_chains(ctx, Some(&credential())).await;

        assert_eq!(report.chains, 2);
        assert_eq!(report.skipped, 2);
        assert!(ctx.interactors().unwrap().iter().all(|i| i.linked_mediator().is_none()));
    }

    #[tokio::test]
    async fn test_store_failure_skips_only_that_chain() {
        let provider = Arc::new(MockReasoningProvider::new().with_fallback(MockReply::text(claim_reply("f"))));
        let mut store = MockInteractionStore::new();
        store
            .expect_get_all_interactions()
            .times(2)
            .returning(|_| Ok(Vec::new()));
        store
            .expect_save_interaction()
            .withf(|a, _, _| a == "VCP")
            .times(1)
            .returning(|_, _, _| Err(DomainError::storage("disk full")));
        store
            .expect_save_interaction()
            .withf(|a, b, _| a == "HSC70" && b == "LAMP2")
            .times(1)
            .returning(|_, _, _| Ok(()));
        let (linker, _) = linker(&provider, Arc::new(store));

        let ctx = Context::new(
            "ATXN3",
            vec![
                Interactor::new("TP53").indirect_via("VCP"),
                Interactor::new("LAMP2").indirect_via("HSC70"),
            ],
        );

        let (ctx, report) = linker.link_indirect_chains(ctx, Some(&credential())).await;

        assert_eq!(report.linked, 1);
        assert_eq!(report.skipped, 1);
        let interactors = ctx.interactors().unwrap();
        assert_eq!(interactors[0].linked_mediator(), None);
        assert_eq!(interactors[1].linked_mediator(), Some("HSC70->LAMP2"));
    }

    #[tokio::test]
    async fn test_service_exhaustion_skips_chain() {
        let provider = Arc::new(MockReasoningProvider::new().with_fallback(MockReply::NotFound));
        let store = Arc::new(MockInteractionStore::new());
        let (linker, _) = linker(&provider, store);

        let (_, report) = linker.link_indirect_chains(context(), Some(&credential())).await;

        assert_eq!(report.skipped, 1);
        assert_eq!(provider.models_called(), vec!["gemini-2.5-pro"]);
    }

    #[test]
    fn test_chain_context_without_functions() {
        let interactor = Interactor::new("TP53").indirect_via("VCP");
        assert_eq!(
            chain_context("ATXN3", "VCP", "TP53", &interactor),
            "Chain: ATXN3 -> VCP -> TP53"
        );
    }

    #[tokio::test]
    async fn test_loosely_typed_claim_is_stored_as_sent() {
        let reply = json!({
            "function": "Extraction",
            "specific_effects": "raises TP53 turnover",
            "evidence": [{"paper_title": "VCP and TP53", "year": "in press"}],
            "biological_consequence": null
        });
        let provider = Arc::new(MockReasoningProvider::new().with_text(reply.to_string()));
        let store = Arc::new(InMemoryInteractionStore::new());
        let (linker, _) = linker(&provider, store.clone());

        let (_, report) = linker.link_indirect_chains(context(), Some(&credential())).await;

        assert_eq!(report.linked, 1);

        let records = store.get_all_interactions("VCP").await.unwrap();
        assert_eq!(records[0].get("arrow"), Some(&Value::Null));
        assert_eq!(
            serde_json::to_value(&records[0].functions()[0]).unwrap(),
            reply
        );
    }

    #[tokio::test]
    async fn test_unreadable_interactor_list_is_left_alone() {
        let provider = Arc::new(MockReasoningProvider::new());
        let store = Arc::new(MockInteractionStore::new());
        let (linker, factory) = linker(&provider, store);
        let ctx: Context = serde_json::from_value(json!({
            "main": "ATXN3",
            "interactors": "see upstream"
        }))
        .unwrap();

        let (out, report) = linker.link_indirect_chains(ctx.clone(), Some(&credential())).await;

        assert_eq!(out, ctx);
        assert_eq!(report, LinkReport::default());
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn test_decode_claim_rejects_non_objects() {
        assert!(decode_claim(json!({})).is_err());
        assert!(decode_claim(json!([{"function": "x"}])).is_err());
        assert_eq!(decode_claim(json!({"function": "x"})).unwrap().label(), "x");
    }
}
