//! Evidence validator - adversarial audit of every interactor claim
//!
//! Interactors are sent to the reasoning service in contiguous batches. Each
//! reply is merged through the keep/correct/drop policy; a batch that cannot
//! be audited keeps its original interactors.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, warn};

use super::prompts::{evidence_audit_prompt, BatchPosition};
use crate::domain::audit::merge_audited;
use crate::domain::{
    AuditReply, Document, DomainError, FallbackExecutor, Interactor, MergeTally,
    ReasoningProfile, ReasoningProvider,
};
use crate::infrastructure::extraction::extract_json;

/// Outcome counts for one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub interactors_in: usize,
    pub interactors_out: usize,
    pub batches: usize,
    /// Batches that kept their original interactors
    pub batches_fell_back: usize,
    pub tally: MergeTally,
}

/// Result of auditing one batch
#[derive(Debug)]
enum BatchOutcome {
    Merged(Vec<Interactor>, MergeTally),
    /// The reply was valid JSON but not an interactor list
    Unrecognized,
}

#[derive(Debug)]
pub struct EvidenceValidator {
    executor: FallbackExecutor,
    profile: ReasoningProfile,
}

impl EvidenceValidator {
    pub fn new(provider: Arc<dyn ReasoningProvider>, profile: ReasoningProfile) -> Self {
        let executor = FallbackExecutor::new(provider, profile.chain());

        Self { executor, profile }
    }

    /// Audit every interactor of `document`. Never fails: a batch whose audit
    /// cannot be completed is carried over unchanged.
    pub async fn validate(
        &self,
        mut document: Document,
        batch_size: usize,
    ) -> (Document, ValidationReport) {
        let batch_size = batch_size.max(1);
        let main_protein = document.main_protein().to_string();
        let mut report = ValidationReport::default();

        let interactors = match document.interactors() {
            Ok(interactors) => interactors,
            Err(e) => {
                error!("[Error] Unreadable interactor list, document left unchanged: {}", e);
                return (document, report);
            }
        };
        let total = interactors.len();
        report.interactors_in = total;

        if interactors.is_empty() {
            info!(main_protein = %main_protein, "No interactors to audit");
            return (document, report);
        }

        let mut validated = Vec::with_capacity(total);

        for (index, batch) in interactors.chunks(batch_size).enumerate() {
            let position = BatchPosition {
                start: index * batch_size,
                end: index * batch_size + batch.len(),
                total,
            };

            info!(
                batch = index + 1,
                "Auditing batch {}: Interactors {}-{}",
                index + 1,
                position.start + 1,
                position.end
            );
            report.batches += 1;

            match self.audit_batch(&main_protein, batch, position).await {
                Ok(BatchOutcome::Merged(kept, tally)) => {
                    report.tally.absorb(&tally);
                    validated.extend(kept);
                }
                Ok(BatchOutcome::Unrecognized) => {
                    warn!(
                        batch = index + 1,
                        "[Warn] Failed to parse validation response structure. Keeping original."
                    );
                    report.batches_fell_back += 1;
                    validated.extend_from_slice(batch);
                }
                Err(e) => {
                    error!(batch = index + 1, "[Error] Batch validation failed: {}", e);
                    report.batches_fell_back += 1;
                    validated.extend_from_slice(batch);
                }
            }
        }

        report.interactors_out = validated.len();
        document.replace_interactors(validated);

        (document, report)
    }

    async fn audit_batch(
        &self,
        main_protein: &str,
        batch: &[Interactor],
        position: BatchPosition,
    ) -> Result<BatchOutcome, DomainError> {
        let batch_json: Vec<Value> = batch.iter().cloned().map(Value::from).collect();

        let prompt = evidence_audit_prompt(main_protein, &batch_json, position)?;
        let response = self.executor.execute(&self.profile.request(prompt)).await?;
        let reply = AuditReply::classify(extract_json(&response.text)?);

        match reply.into_interactors()? {
            Some(audited) => {
                let mut tally = MergeTally::default();
                let kept = merge_audited(audited, &mut tally);
                Ok(BatchOutcome::Merged(kept, tally))
            }
            None => Ok(BatchOutcome::Unrecognized),
        }
    }
}
