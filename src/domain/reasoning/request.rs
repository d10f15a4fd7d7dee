/// Parameters for one call to the reasoning service
#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    pub prompt: String,
    /// Token budget for the model's internal reasoning
    pub thinking_budget: Option<u32>,
    pub include_thoughts: bool,
    /// Whether the live web-search tool is offered to the model
    pub web_search: bool,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl ReasoningRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            thinking_budget: None,
            include_thoughts: false,
            web_search: false,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
        }
    }

    pub fn builder(prompt: impl Into<String>) -> ReasoningRequestBuilder {
        ReasoningRequestBuilder::new(prompt)
    }
}

/// Builder for ReasoningRequest
#[derive(Debug)]
pub struct ReasoningRequestBuilder {
    request: ReasoningRequest,
}

impl ReasoningRequestBuilder {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            request: ReasoningRequest::new(prompt),
        }
    }

    pub fn thinking_budget(mut self, tokens: u32) -> Self {
        self.request.thinking_budget = Some(tokens);
        self
    }

    pub fn include_thoughts(mut self, include: bool) -> Self {
        self.request.include_thoughts = include;
        self
    }

    pub fn web_search(mut self, enabled: bool) -> Self {
        self.request.web_search = enabled;
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.request.max_output_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.request.temperature = Some(temp);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.request.top_p = Some(top_p);
        self
    }

    pub fn build(self) -> ReasoningRequest {
        self.request
    }
}
