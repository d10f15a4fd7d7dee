//! Model fallback domain - ordered model chains with retry and backoff

mod entity;
mod executor;

pub use entity::{FallbackChain, ReasoningProfile, RetryPolicy};
pub use executor::FallbackExecutor;
