//! Reasoning service domain models and traits

mod credential;
mod provider;
mod request;
mod response;

pub use credential::ApiCredential;
pub use provider::{ReasoningProvider, ReasoningProviderFactory};
pub use request::{ReasoningRequest, ReasoningRequestBuilder};
pub use response::{ReasoningResponse, Usage};

#[cfg(test)]
pub use provider::mock::{MockProviderFactory, MockReasoningProvider, MockReply};
