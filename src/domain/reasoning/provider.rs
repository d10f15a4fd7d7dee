use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ApiCredential, ReasoningRequest, ReasoningResponse};
use crate::domain::DomainError;

/// Trait for reasoning services that can answer a prompt with web search
#[async_trait]
pub trait ReasoningProvider: Send + Sync + Debug {
    /// Send one prompt to `model` and return the reply text
    async fn generate(
        &self,
        model: &str,
        request: &ReasoningRequest,
    ) -> Result<ReasoningResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

/// Builds providers from a credential supplied at call time
pub trait ReasoningProviderFactory: Send + Sync + Debug {
    fn create(&self, credential: &ApiCredential)
        -> Result<Arc<dyn ReasoningProvider>, DomainError>;
}
