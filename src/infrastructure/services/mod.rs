//! Pipeline services built on the reasoning service

mod chain_linker;
mod evidence_validator;
mod prompts;

pub use chain_linker::{IndirectChainLinker, LinkReport};
pub use evidence_validator::{EvidenceValidator, ValidationReport};
pub use prompts::{chain_link_prompt, evidence_audit_prompt, BatchPosition};
