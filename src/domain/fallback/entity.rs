//! Model fallback chain and retry policy

use std::time::Duration;

use serde::Deserialize;

use crate::domain::reasoning::ReasoningRequest;

/// Retry policy applied to each model of a fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per model, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after that
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 5000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay_ms,
        }
    }

    /// Delay to wait after a failed `attempt` (1-indexed)
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Ordered list of model identifiers to try
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    models: Vec<String>,
    retry: RetryPolicy,
}

impl FallbackChain {
    pub fn new(models: Vec<String>) -> Self {
        Self {
            models,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

/// Everything needed to call the service for one kind of task: which models
/// to try, how hard to retry, and the generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReasoningProfile {
    pub models: Vec<String>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    pub thinking_budget: u32,
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub top_p: Option<f32>,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    5000
}

fn default_temperature() -> f32 {
    0.2
}

impl ReasoningProfile {
    /// Profile for the per-claim evidence audit
    pub fn evidence_audit() -> Self {
        Self {
            models: vec![
                "gemini-3.0-pro-preview".to_string(),
                "gemini-2.0-flash-thinking-exp-01-21".to_string(),
            ],
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            thinking_budget: 32768,
            max_output_tokens: 65536,
            temperature: default_temperature(),
            top_p: Some(0.90),
        }
    }

    /// Profile for mediator-to-target chain analysis
    pub fn chain_link() -> Self {
        Self {
            models: vec!["gemini-2.5-pro".to_string()],
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            thinking_budget: 8192,
            max_output_tokens: 8192,
            temperature: default_temperature(),
            top_p: None,
        }
    }

    pub fn with_base_delay_ms(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    pub fn chain(&self) -> FallbackChain {
        FallbackChain::new(self.models.clone())
            .with_retry(RetryPolicy::new(self.max_attempts, self.base_delay_ms))
    }

    /// Request with maximum reasoning and web search enabled
    pub fn request(&self, prompt: impl Into<String>) -> ReasoningRequest {
        let mut builder = ReasoningRequest::builder(prompt)
            .thinking_budget(self.thinking_budget)
            .include_thoughts(true)
            .web_search(true)
            .max_output_tokens(self.max_output_tokens)
            .temperature(self.temperature);

        if let Some(top_p) = self.top_p {
            builder = builder.top_p(top_p);
        }

        builder.build()
    }
}
