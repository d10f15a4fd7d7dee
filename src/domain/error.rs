use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(
        "Failed to parse JSON from LLM response. Response length: {length} chars, Preview: {preview}..."
    )]
    Parse { length: usize, preview: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("All models failed: {}", models.join(", "))]
    ServiceExhausted { models: Vec<String> },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Number of characters of a raw reply kept in a parse error
const PREVIEW_CHARS: usize = 200;

impl DomainError {
    /// Build a parse error from the raw text that could not be decoded
    pub fn parse(text: &str) -> Self {
        Self::Parse {
            length: text.chars().count(),
            preview: text.chars().take(PREVIEW_CHARS).collect(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
        }
    }

    pub fn service_exhausted(models: Vec<String>) -> Self {
        Self::ServiceExhausted { models }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether retrying against the same model is pointless.
    ///
    /// Providers do not always surface a 404 as a typed error, so the message
    /// text is checked as well.
    pub fn is_model_not_found(&self) -> bool {
        match self {
            Self::ModelNotFound { .. } => true,
            Self::Provider { message, .. } => {
                message.contains("404") || message.to_lowercase().contains("not found")
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        Self::serialization(e.to_string())
    }
}
