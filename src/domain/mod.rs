//! Domain layer - Core business logic and entities

pub mod audit;
pub mod document;
pub mod error;
pub mod fallback;
pub mod interaction;
pub mod prompt;
pub mod reasoning;

pub use audit::{AuditReply, ClaimDecision, MergeTally};
pub use document::{Context, Document, FunctionClaim, InteractionType, Interactor, Validity};
pub use error::DomainError;
pub use fallback::{FallbackChain, FallbackExecutor, ReasoningProfile, RetryPolicy};
pub use interaction::{InteractionRecord, InteractionStore};
pub use prompt::{PromptTemplate, TemplateError};
pub use reasoning::{
    ApiCredential, ReasoningProvider, ReasoningProviderFactory, ReasoningRequest,
    ReasoningResponse, Usage,
};
