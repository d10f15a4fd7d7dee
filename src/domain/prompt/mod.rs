//! Prompt templates with variable support

mod template;

pub use template::{PromptTemplate, TemplateError};
