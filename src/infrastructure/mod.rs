//! Infrastructure layer - External service implementations

pub mod document_io;
pub mod extraction;
pub mod interaction;
pub mod llm;
pub mod logging;
pub mod services;
