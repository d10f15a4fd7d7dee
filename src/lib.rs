//! Interactor evidence auditor
//!
//! Post-processing for protein interaction pipeline output:
//! - Adversarial re-verification of every claimed interactor function
//! - Model fallback with retry and backoff around the reasoning service
//! - Linking of indirect interaction chains into a persistent store

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::extraction::extract_json;
pub use infrastructure::services::{
    EvidenceValidator, IndirectChainLinker, LinkReport, ValidationReport,
};
