//! Stored protein interaction records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::document::{claims_of, FunctionClaim, InteractionType};

/// One stored interaction, filed under its source protein and keyed by `primary`.
///
/// Records are kept as raw JSON objects so fields written by other pipeline
/// stages survive a load and save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionRecord(Map<String, Value>);

impl InteractionRecord {
    /// A direct interaction holding a single claim. A missing arrow is stored as `null`.
    pub fn direct(primary: impl Into<String>, arrow: Option<Value>, claim: FunctionClaim) -> Self {
        let mut fields = Map::new();
        fields.insert("primary".to_string(), Value::String(primary.into()));
        fields.insert("arrow".to_string(), arrow.unwrap_or(Value::Null));
        fields.insert("functions".to_string(), Value::Array(vec![claim.into()]));
        fields.insert(
            "interaction_type".to_string(),
            Value::String(InteractionType::Direct.as_str().to_string()),
        );
        Self(fields)
    }

    /// Main protein of the query that produced this record
    pub fn discovered_in(mut self, query: impl Into<String>) -> Self {
        self.0
            .insert("discovered_in_query".to_string(), Value::String(query.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.get("primary").and_then(Value::as_str)
    }

    pub fn functions(&self) -> Vec<FunctionClaim> {
        claims_of(self.0.get("functions"))
    }

    /// Append a claim, starting a fresh list when the stored one is unusable
    pub fn push_function(&mut self, claim: FunctionClaim) {
        match self.0.get_mut("functions") {
            Some(Value::Array(claims)) => claims.push(claim.into()),
            _ => {
                self.0
                    .insert("functions".to_string(), Value::Array(vec![claim.into()]));
            }
        }
    }
}
