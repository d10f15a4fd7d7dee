use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::http_client::HttpClientTrait;
use crate::domain::document::coerce_integer;
use crate::domain::{DomainError, ReasoningProvider, ReasoningRequest, ReasoningResponse, Usage};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini `generateContent` provider with Google Search grounding
#[derive(Debug)]
pub struct GeminiProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiProvider<C> {
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            api_key: api_key.into(),
            base_url,
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, request: &ReasoningRequest) -> Value {
        let mut generation_config = json!({});

        if let Some(temp) = request.temperature {
            generation_config["temperature"] = json!(temp);
        }

        if let Some(top_p) = request.top_p {
            generation_config["topP"] = json!(top_p);
        }

        if let Some(max_tokens) = request.max_output_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }

        if let Some(budget) = request.thinking_budget {
            generation_config["thinkingConfig"] = json!({
                "thinkingBudget": budget,
                "includeThoughts": request.include_thoughts,
            });
        }

        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        });

        if request.web_search {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        body
    }

    fn parse_response(&self, model: &str, json: Value) -> Result<ReasoningResponse, DomainError> {
        let response: GeminiResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("gemini", format!("Failed to parse response: {}", e))
        })?;

        let candidate = response.candidates.into_iter().next().ok_or_else(|| {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            DomainError::provider("gemini", format!("No text in response ({})", reason))
        })?;

        // thought summaries are not part of the answer
        let text = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text)
            .collect::<String>();

        let mut reasoning_response = ReasoningResponse::new(model, text.trim());

        if let Some(usage) = response.usage_metadata {
            reasoning_response = reasoning_response.with_usage(parse_usage(&usage));
        }

        Ok(reasoning_response)
    }
}

#[async_trait]
impl<C: HttpClientTrait> ReasoningProvider for GeminiProvider<C> {
    async fn generate(
        &self,
        model: &str,
        request: &ReasoningRequest,
    ) -> Result<ReasoningResponse, DomainError> {
        let url = self.generate_url(model);
        let body = self.build_request(request);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| {
                if e.is_model_not_found() {
                    DomainError::model_not_found(model)
                } else {
                    e
                }
            })?;

        self.parse_response(model, response)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

fn parse_usage(metadata: &Value) -> Usage {
    let count = |key: &str| {
        metadata
            .get(key)
            .and_then(coerce_integer)
            .and_then(|n| u64::try_from(n).ok())
    };

    Usage {
        prompt_tokens: count("promptTokenCount"),
        output_tokens: count("candidatesTokenCount"),
        thinking_tokens: count("thoughtsTokenCount"),
    }
}

// Gemini API types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
