//! Merge policy for audited interactors
//!
//! Two levels: an interactor can be deleted outright, otherwise each of its
//! claims is judged on its own and the interactor survives if any claim does.

use tracing::info;

use crate::domain::document::{FunctionClaim, Interactor, Validity};

/// Minimum confidence for a `TRUE` claim that reports a score
pub const CONFIDENCE_THRESHOLD: i64 = 8;

/// Characters of the consensus text echoed for a corrected claim
const CONSENSUS_PREVIEW_CHARS: usize = 100;

/// Verdict on a single claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimDecision {
    Keep,
    KeepCorrected,
    Reject(Validity),
    LowConfidence(i64),
}

/// Judge one claim. Unmarked, non-text and unrecognised tags count as `TRUE`.
pub fn judge_claim(claim: &FunctionClaim) -> ClaimDecision {
    let validity = claim.effective_validity();

    if validity.is_rejected() {
        return ClaimDecision::Reject(validity);
    }
    if validity == Validity::Corrected {
        return ClaimDecision::KeepCorrected;
    }

    match claim.confidence() {
        Some(score) if score < CONFIDENCE_THRESHOLD => ClaimDecision::LowConfidence(score),
        _ => ClaimDecision::Keep,
    }
}

/// Running totals across all merged batches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeTally {
    pub interactors_kept: usize,
    pub interactors_deleted: usize,
    pub interactors_emptied: usize,
    pub claims_verified: usize,
    pub claims_corrected: usize,
    pub claims_dropped: usize,
}

impl MergeTally {
    pub fn absorb(&mut self, other: &MergeTally) {
        self.interactors_kept += other.interactors_kept;
        self.interactors_deleted += other.interactors_deleted;
        self.interactors_emptied += other.interactors_emptied;
        self.claims_verified += other.claims_verified;
        self.claims_corrected += other.claims_corrected;
        self.claims_dropped += other.claims_dropped;
    }
}

/// Apply the policy to every audited interactor, keeping survivors in order
pub fn merge_audited(audited: Vec<Interactor>, tally: &mut MergeTally) -> Vec<Interactor> {
    audited
        .into_iter()
        .filter_map(|interactor| merge_interactor(interactor, tally))
        .collect()
}

fn merge_interactor(mut interactor: Interactor, tally: &mut MergeTally) -> Option<Interactor> {
    let primary = interactor.name().to_string();

    if interactor.is_marked(&Validity::Deleted) {
        info!(
            primary = %primary,
            "[DELETE] Removing {} (Reason: {})",
            primary,
            interactor.text("validation_note").as_deref().unwrap_or("none given")
        );
        tally.interactors_deleted += 1;
        return None;
    }

    let claims = interactor.take_functions();
    let mut surviving = Vec::with_capacity(claims.len());

    for raw in claims {
        let claim = match FunctionClaim::try_from(raw) {
            Ok(claim) => claim,
            Err(other) => {
                info!(primary = %primary, "[DROP] Malformed function for {}: {}", primary, other);
                tally.claims_dropped += 1;
                continue;
            }
        };

        let decision = judge_claim(&claim);
        log_claim(&primary, &claim, &decision);

        match decision {
            ClaimDecision::Keep => tally.claims_verified += 1,
            ClaimDecision::KeepCorrected => tally.claims_corrected += 1,
            ClaimDecision::Reject(_) | ClaimDecision::LowConfidence(_) => {
                tally.claims_dropped += 1;
                continue;
            }
        }

        surviving.push(claim);
    }

    let emptied = surviving.is_empty();
    interactor.set_functions(surviving);

    if emptied && !interactor.is_marked(&Validity::True) {
        info!(primary = %primary, "[DELETE] Removing {} (No valid functions)", primary);
        tally.interactors_emptied += 1;
        return None;
    }

    tally.interactors_kept += 1;
    Some(interactor)
}

fn log_claim(primary: &str, claim: &FunctionClaim, decision: &ClaimDecision) {
    match decision {
        ClaimDecision::Reject(validity) => {
            info!(primary, "[DROP] Function '{}' for {} ({})", claim.label(), primary, validity);
        }
        ClaimDecision::LowConfidence(score) => {
            info!(primary, "[DROP] Function '{}' (Low Confidence: {})", claim.label(), score);
        }
        ClaimDecision::KeepCorrected => {
            let consensus: String = claim
                .text("scientific_consensus")
                .unwrap_or_default()
                .chars()
                .take(CONSENSUS_PREVIEW_CHARS)
                .collect();
            info!(
                primary,
                "[CORRECTED] {}: {} -> {} | Consensus: {}...",
                primary,
                claim.label(),
                claim.text("mechanism_check").as_deref().unwrap_or("unspecified"),
                consensus
            );
        }
        ClaimDecision::Keep => {
            if let Some(verdict) = claim.text("audit_verdict") {
                info!(primary, "[VERIFIED] {}: {} ({})", primary, claim.label(), verdict);
            }
        }
    }
}
