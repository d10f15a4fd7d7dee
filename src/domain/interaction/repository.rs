//! Interaction store trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::InteractionRecord;
use crate::domain::DomainError;

/// Long-lived store of protein interactions keyed by protein pair
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// All records filed under `protein`
    async fn get_all_interactions(&self, protein: &str)
        -> Result<Vec<InteractionRecord>, DomainError>;

    /// Insert or replace the record for the pair (`protein_a`, `protein_b`)
    async fn save_interaction(
        &self,
        protein_a: &str,
        protein_b: &str,
        record: InteractionRecord,
    ) -> Result<(), DomainError>;
}
