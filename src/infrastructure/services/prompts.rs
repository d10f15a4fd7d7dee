//! Prompt templates for the evidence audit and chain linking

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::domain::{DomainError, PromptTemplate};

const EVIDENCE_AUDIT_TEMPLATE: &str = r#"EVIDENCE AUDIT AND CORRECTION

Act as a skeptical reviewer of published protein interaction claims.
Treat every claim below as unsupported until primary literature confirms it.

MAIN PROTEIN: ${var:main_protein}
POSITION: interactor ${var:batch_first} to ${var:batch_last} of ${var:total}

CLAIMS UNDER REVIEW (JSON):
${var:batch_json}

PROCEDURE

1. Search for refutation first.
   Look for evidence AGAINST each claim before looking for support. At minimum run:
   - "${var:main_protein}" "${var:first_primary}" interaction
   - "${var:main_protein}" "${var:first_primary}" no interaction
   - "${var:main_protein}" "${var:first_primary}" mechanism contradiction
   If a claim names a mechanism (for example "activates via deubiquitination"),
   also search for the opposite mechanism ("represses transcription",
   "promotes degradation").

2. Check each claim independently on four axes:
   - Interaction: physical binding, or only a functional or co-localisation link?
   - Mechanism: is the named enzymatic or regulatory mechanism the right one?
   - Effect: stabilises or degrades, activates or inhibits?
   - Role: oncogene or tumour suppressor in this context?

3. Fill in these audit fields on EVERY function:
   - validity: "TRUE" | "CORRECTED" | "FALSE" | "DELETED"
   - audit_verdict: "Verified" | "Refuted" | "Corrected" | "Unproven"
   - mechanism_check: "Accurate" | "Incorrect Mechanism" | "Opposite Effect" | "Wrong Protein"
   - scientific_consensus: 2-3 sentences on what the field currently holds
   - source_conflict: "None" or the publication the claim contradicts
   - search_queries_performed: list of the searches you ran
   - confidence_score: integer 1-10 (9 or more to mark Verified)
   Replace the evidence array with real citations you found.

4. Corrections and removals:
   - For a corrected function rewrite the function name, arrow, cellular process
     and effect description, and cite the exact paper title with a literal quote.
   - If the interaction itself is refuted (wrong protein, no interaction), set the
     interactor's top-level validity to "DELETED" and explain why in validation_note.

OUTPUT
Return JSON only: the same list of interactors you received, in the same shape,
enriched with the audit fields above. Either a bare list or an object with an
"interactors" list is accepted.
"#;

const CHAIN_LINK_TEMPLATE: &str = r#"INDIRECT INTERACTION CHAIN: ${var:main} -> ${var:mediator} -> ${var:target}

The protein being studied is ${var:main}. ${var:target} was reported as an indirect
interactor of ${var:main}, acting through ${var:mediator}.

Describe the specific molecular mechanism by which ${var:mediator} (mediator) acts on
${var:target} (target), and how that step carries the effect of the whole chain.

Chain context:
${var:context}

REQUIREMENTS
1. Mechanism: name the concrete step (for example "phosphorylates at Ser45",
   "recruits to the promoter", "ubiquitinates for degradation"). Verbs such as
   "regulates" or "is associated with" are not acceptable.
2. Causality: explain why ${var:mediator} is required for the effect of ${var:main} on ${var:target}.
3. Direction: state whether ${var:mediator} activates, inhibits or binds ${var:target}.

Research the ${var:mediator} -> ${var:target} interaction and return ONLY one JSON object:
{
  "function": "Specific molecular mechanism",
  "arrow": "activates|inhibits|binds",
  "cellular_process": "How ${var:mediator} physically or functionally acts on ${var:target} within the chain",
  "effect_description": "One sentence on the net effect",
  "biological_consequence": [
    "Step 1: ${var:main} acts on ${var:mediator}",
    "Step 2: ${var:mediator} binds or modifies ${var:target}",
    "Step 3: ${var:target} carries out the downstream function"
  ],
  "specific_effects": ["Effect 1", "Effect 2"],
  "evidence": [
    {"paper_title": "Exact title of a paper confirming the ${var:mediator}-${var:target} interaction", "year": 2024}
  ]
}
"#;

static EVIDENCE_AUDIT: Lazy<PromptTemplate> =
    Lazy::new(|| PromptTemplate::parse(EVIDENCE_AUDIT_TEMPLATE));

static CHAIN_LINK: Lazy<PromptTemplate> = Lazy::new(|| PromptTemplate::parse(CHAIN_LINK_TEMPLATE));

/// Where a batch sits in the interactor list, 0-based and end-exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPosition {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

pub fn evidence_audit_prompt(
    main_protein: &str,
    batch: &[Value],
    position: BatchPosition,
) -> Result<String, DomainError> {
    let first_primary = batch
        .first()
        .and_then(|interactor| interactor.get("primary"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let values = HashMap::from([
        ("main_protein", main_protein.to_string()),
        ("batch_json", serde_json::to_string_pretty(batch)?),
        ("batch_first", (position.start + 1).to_string()),
        ("batch_last", position.end.to_string()),
        ("total", position.total.to_string()),
        ("first_primary", first_primary.to_string()),
    ]);

    EVIDENCE_AUDIT
        .render(&values)
        .map_err(|e| DomainError::configuration(e.to_string()))
}

pub fn chain_link_prompt(
    main: &str,
    mediator: &str,
    target: &str,
    context: &str,
) -> Result<String, DomainError> {
    let values = HashMap::from([
        ("main", main.to_string()),
        ("mediator", mediator.to_string()),
        ("target", target.to_string()),
        ("context", context.to_string()),
    ]);

    CHAIN_LINK
        .render(&values)
        .map_err(|e| DomainError::configuration(e.to_string()))
}
