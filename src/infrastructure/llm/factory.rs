use std::sync::Arc;
use std::time::Duration;

use super::gemini::{GeminiProvider, DEFAULT_GEMINI_BASE_URL};
use super::http_client::HttpClient;
use crate::domain::{ApiCredential, DomainError, ReasoningProvider, ReasoningProviderFactory};

/// Factory for Gemini providers bound to a credential supplied at call time
#[derive(Debug, Clone)]
pub struct GeminiProviderFactory {
    base_url: String,
    timeout: Duration,
}

impl GeminiProviderFactory {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

impl Default for GeminiProviderFactory {
    fn default() -> Self {
        Self::new(DEFAULT_GEMINI_BASE_URL, Duration::from_secs(300))
    }
}

impl ReasoningProviderFactory for GeminiProviderFactory {
    fn create(
        &self,
        credential: &ApiCredential,
    ) -> Result<Arc<dyn ReasoningProvider>, DomainError> {
        let http_client = HttpClient::with_timeout(self.timeout)?;
        let provider =
            GeminiProvider::with_base_url(http_client, credential.expose(), self.base_url.as_str());

        Ok(Arc::new(provider))
    }
}
