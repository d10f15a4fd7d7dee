//! Reasoning service clients

mod factory;
mod gemini;
mod http_client;

pub use factory::GeminiProviderFactory;
pub use gemini::{GeminiProvider, DEFAULT_GEMINI_BASE_URL};
pub use http_client::{HttpClient, HttpClientTrait};
