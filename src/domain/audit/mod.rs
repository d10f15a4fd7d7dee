//! Evidence audit domain - reply classification and the keep/correct/drop policy

mod policy;
mod reply;

pub use policy::{judge_claim, merge_audited, ClaimDecision, MergeTally, CONFIDENCE_THRESHOLD};
pub use reply::AuditReply;
