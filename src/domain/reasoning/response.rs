/// Token accounting reported by the service.
///
/// Counts come from untrusted JSON; a count that is missing or not a number
/// stays `None` rather than becoming zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub thinking_tokens: Option<u64>,
}

/// Text reply from the reasoning service
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningResponse {
    pub model: String,
    pub text: String,
    pub usage: Option<Usage>,
}

impl ReasoningResponse {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}
