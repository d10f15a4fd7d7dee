//! File-backed interaction store
//!
//! One `<PROTEIN>.json` file per source protein:
//! `{"protein": "...", "interactions": [...]}`.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::in_memory::upsert;
use crate::domain::{DomainError, InteractionRecord, InteractionStore};

#[derive(Debug, Serialize, Deserialize)]
struct ProteinFile {
    protein: String,
    #[serde(default)]
    interactions: Vec<InteractionRecord>,
}

#[derive(Debug, Clone)]
pub struct JsonFileInteractionStore {
    root: PathBuf,
}

impl JsonFileInteractionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_for(&self, protein: &str) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(protein)))
    }

    async fn read_file(&self, protein: &str) -> Result<Option<ProteinFile>, DomainError> {
        let path = self.file_for(protein);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let file: ProteinFile = serde_json::from_str(&content).map_err(|e| {
            DomainError::storage(format!("Corrupt interaction file {}: {}", path.display(), e))
        })?;

        if file.protein != protein {
            warn!(
                protein,
                stored = %file.protein,
                path = %path.display(),
                "Interaction file belongs to another protein, ignoring it"
            );
            return Ok(None);
        }

        Ok(Some(file))
    }
}

#[async_trait]
impl InteractionStore for JsonFileInteractionStore {
    async fn get_all_interactions(
        &self,
        protein: &str,
    ) -> Result<Vec<InteractionRecord>, DomainError> {
        Ok(self
            .read_file(protein)
            .await?
            .map(|file| file.interactions)
            .unwrap_or_default())
    }

    async fn save_interaction(
        &self,
        protein_a: &str,
        protein_b: &str,
        record: InteractionRecord,
    ) -> Result<(), DomainError> {
        let mut file = self.read_file(protein_a).await?.unwrap_or_else(|| ProteinFile {
            protein: protein_a.to_string(),
            interactions: Vec::new(),
        });

        upsert(&mut file.interactions, protein_b, record);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create store directory: {}", e)))?;

        let mut content = serde_json::to_string_pretty(&file)?;
        content.push('\n');

        let path = self.file_for(protein_a);
        tokio::fs::write(&path, content).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(protein_a, protein_b, path = %path.display(), "Saved interaction");
        Ok(())
    }
}

/// File name for a protein. ASCII letters, digits and `-` are kept and every
/// other byte is written as `%XX`, so distinct names never share a file. The
/// empty name maps to `_`, which no other name can produce.
fn file_stem(protein: &str) -> String {
    if protein.is_empty() {
        return "_".to_string();
    }

    let mut stem = String::with_capacity(protein.len());
    for byte in protein.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}
