//! CLI module for the interactor audit tool
//!
//! Subcommands:
//! - `validate`: audit every interactor claim of a pipeline document
//! - `link-chains`: characterise mediator -> target links of indirect interactors

pub mod link;
pub mod validate;

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::domain::ApiCredential;

/// Evidence auditor for protein interaction pipeline output
#[derive(Parser)]
#[command(name = "interactor-audit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate and enrich evidence in a pipeline JSON document
    Validate(validate::ValidateArgs),

    /// Link indirect interaction chains into the interaction store
    LinkChains(link::LinkArgs),
}

const RULE_WIDTH: usize = 80;

/// Print a title between two horizontal rules
pub(crate) fn banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}\n{}\n{}", rule, title, rule);
}

/// Resolve the API key: an explicit value first, then the named environment
/// variable. Blank values count as absent.
pub(crate) fn resolve_credential(explicit: Option<String>, env_var: &str) -> Option<ApiCredential> {
    explicit
        .and_then(ApiCredential::new)
        .or_else(|| std::env::var(env_var).ok().and_then(ApiCredential::new))
}

/// The stderr line for a failed command, including its error chain
pub fn error_line(error: &anyhow::Error) -> String {
    format!("[ERROR] {:#}", error)
}

/// `Total time: 1.5 minutes (90s)`
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    format!("Total time: {:.1} minutes ({:.0}s)", secs / 60.0, secs)
}
