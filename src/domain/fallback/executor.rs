//! Fallback executor - walks a model chain with per-model retry and backoff

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::FallbackChain;
use crate::domain::reasoning::{ReasoningProvider, ReasoningRequest, ReasoningResponse};
use crate::domain::DomainError;

/// Where the executor is in the chain
#[derive(Debug, Clone, PartialEq, Eq)]
enum CallState {
    Attempting { model: usize, attempt: u32 },
    Backoff { model: usize, attempt: u32, delay: Duration },
    Exhausted,
}

/// Calls the reasoning service, falling back through the chain's models.
///
/// Each model gets up to `max_attempts` tries with exponential backoff in
/// between. A model-not-found error moves on to the next model at once.
/// When every model is used up the caller gets one `ServiceExhausted` error.
#[derive(Debug, Clone)]
pub struct FallbackExecutor {
    provider: Arc<dyn ReasoningProvider>,
    chain: FallbackChain,
}

impl FallbackExecutor {
    pub fn new(provider: Arc<dyn ReasoningProvider>, chain: FallbackChain) -> Self {
        Self { provider, chain }
    }

    pub async fn execute(
        &self,
        request: &ReasoningRequest,
    ) -> Result<ReasoningResponse, DomainError> {
        let mut state = self.start_of(0);

        loop {
            state = match state {
                CallState::Attempting { model, attempt } => {
                    let name = &self.chain.models()[model];

                    if attempt == 1 {
                        debug!(model = %name, provider = self.provider.provider_name(), "Trying model");
                    }

                    match self.provider.generate(name, request).await {
                        Ok(response) if !response.text.trim().is_empty() => {
                            if let Some(usage) = &response.usage {
                                debug!(
                                    model = %name,
                                    prompt_tokens = ?usage.prompt_tokens,
                                    output_tokens = ?usage.output_tokens,
                                    thinking_tokens = ?usage.thinking_tokens,
                                    "Reasoning call succeeded"
                                );
                            }
                            return Ok(response);
                        }
                        Ok(_) => {
                            let error = DomainError::provider(
                                self.provider.provider_name(),
                                "No text in response",
                            );
                            self.after_failure(model, attempt, &error)
                        }
                        Err(error) => self.after_failure(model, attempt, &error),
                    }
                }
                CallState::Backoff {
                    model,
                    attempt,
                    delay,
                } => {
                    tokio::time::sleep(delay).await;
                    CallState::Attempting {
                        model,
                        attempt: attempt + 1,
                    }
                }
                CallState::Exhausted => {
                    return Err(DomainError::service_exhausted(self.chain.models().to_vec()));
                }
            };
        }
    }

    fn start_of(&self, model: usize) -> CallState {
        if model < self.chain.models().len() && self.chain.retry().max_attempts > 0 {
            CallState::Attempting { model, attempt: 1 }
        } else {
            CallState::Exhausted
        }
    }

    fn after_failure(&self, model: usize, attempt: u32, error: &DomainError) -> CallState {
        let name = &self.chain.models()[model];

        if error.is_model_not_found() {
            warn!(model = %name, "[Warn] Model {} not found. Trying next...", name);
            return self.start_of(model + 1);
        }

        let retry = self.chain.retry();

        if attempt < retry.max_attempts {
            let delay = retry.delay_after_attempt(attempt);
            info!(
                model = %name,
                attempt,
                "[Retry] Error: {}. Retrying in {:.1}s...",
                error,
                delay.as_secs_f64()
            );
            CallState::Backoff {
                model,
                attempt,
                delay,
            }
        } else {
            warn!(model = %name, attempts = attempt, "[Warn] Failed with {} after retries: {}", name, error);
            self.start_of(model + 1)
        }
    }
}
