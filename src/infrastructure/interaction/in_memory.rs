//! In-memory interaction store

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, InteractionRecord, InteractionStore};

/// Thread-safe in-memory store. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryInteractionStore {
    records: RwLock<HashMap<String, Vec<InteractionRecord>>>,
}

impl InMemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records filed under `protein`
    pub fn count(&self, protein: &str) -> usize {
        self.records
            .read()
            .map(|records| records.get(protein).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn get_all_interactions(
        &self,
        protein: &str,
    ) -> Result<Vec<InteractionRecord>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(records.get(protein).cloned().unwrap_or_default())
    }

    async fn save_interaction(
        &self,
        protein_a: &str,
        protein_b: &str,
        record: InteractionRecord,
    ) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        upsert(records.entry(protein_a.to_string()).or_default(), protein_b, record);

        Ok(())
    }
}

/// Replace the record whose `primary` is `partner`, or append it
pub(super) fn upsert(records: &mut Vec<InteractionRecord>, partner: &str, record: InteractionRecord) {
    match records.iter_mut().find(|r| r.primary() == Some(partner)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
