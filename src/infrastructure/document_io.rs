//! Reading and writing pipeline documents

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Context, Document, DomainError};

/// What `link-chains` was pointed at: a full document or a bare context
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Document(Document),
    Context(Context),
}

impl LinkTarget {
    /// The context to link; `None` when a document's `ctx_json` is not an object
    pub fn context(&self) -> Option<Context> {
        match self {
            Self::Document(document) => document.context(),
            Self::Context(ctx) => Some(ctx.clone()),
        }
    }

    /// Put the linked context back where it came from
    pub fn with_context(self, ctx: Context) -> Self {
        match self {
            Self::Document(mut document) => {
                document.set_context(ctx);
                Self::Document(document)
            }
            Self::Context(_) => Self::Context(ctx),
        }
    }
}

pub async fn load_document(path: &Path) -> Result<Document, DomainError> {
    let value = read_json(path).await?;

    serde_json::from_value(value).map_err(|e| {
        DomainError::serialization(format!("Invalid document {}: {}", path.display(), e))
    })
}

pub async fn load_link_target(path: &Path) -> Result<LinkTarget, DomainError> {
    let value = read_json(path).await?;
    let is_document = value.get("ctx_json").is_some();

    let target = if is_document {
        serde_json::from_value(value).map(LinkTarget::Document)
    } else {
        serde_json::from_value(value).map(LinkTarget::Context)
    };

    target.map_err(|e| {
        DomainError::serialization(format!("Invalid document {}: {}", path.display(), e))
    })
}

/// Write with 2-space indentation and a trailing newline
pub async fn save_document<T: Serialize>(document: &T, path: &Path) -> Result<(), DomainError> {
    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DomainError::io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| DomainError::io(format!("Failed to write {}: {}", path.display(), e)))
}

pub async fn save_link_target(target: &LinkTarget, path: &Path) -> Result<(), DomainError> {
    match target {
        LinkTarget::Document(document) => save_document(document, path).await,
        LinkTarget::Context(ctx) => save_document(ctx, path).await,
    }
}

/// `<stem>_validated<ext>` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{}_validated.{}", stem, ext.to_string_lossy()),
        None => format!("{}_validated", stem),
    };

    input.with_file_name(file_name)
}

async fn read_json(path: &Path) -> Result<Value, DomainError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::io(format!("Failed to read {}: {}", path.display(), e)))?;

    serde_json::from_str(&content).map_err(|e| {
        DomainError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("runs/ATXN3_pipeline.json")),
            PathBuf::from("runs/ATXN3_pipeline_validated.json")
        );
        assert_eq!(
            default_output_path(Path::new("data")),
            PathBuf::from("data_validated")
        );
    }

    #[tokio::test]
    async fn test_round_trip_preserves_unknown_fields_and_utf8() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out/in_validated.json");

        let original = json!({
            "ctx_json": {
                "main": "ATXN3",
                "interactors": [{"primary": "VCP", "functions": [], "note": "α-helix"}],
                "pipeline_version": 4
            },
            "snapshot_json": {"main": "ATXN3", "interactors": []},
            "run_id": "abc"
        });
        std::fs::write(&input, original.to_string()).unwrap();

        let document = load_document(&input).await.unwrap();
        save_document(&document, &output).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.ends_with("}\n"));
        assert!(written.contains("α-helix"));
        assert!(written.contains("\n  \"ctx_json\""));

        let reloaded: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(reloaded["run_id"], json!("abc"));
        assert_eq!(reloaded["ctx_json"]["pipeline_version"], json!(4));
        assert_eq!(reloaded["ctx_json"]["interactors"][0]["note"], json!("α-helix"));
    }

    #[tokio::test]
    async fn test_unaudited_document_is_written_back_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("in_validated.json");

        let original = r#"{
  "run_id": "abc",
  "ctx_json": {
    "interactors": [
      {
        "primary": "VCP",
        "arrow": null,
        "functions": [
          {
            "function": "ERAD",
            "specific_effects": "raises X",
            "search_queries_performed": [],
            "evidence": [
              {
                "paper_title": "T",
                "year": "2020a"
              }
            ]
          }
        ]
      }
    ],
    "main": "ATXN3"
  }
}
"#;
        std::fs::write(&input, original).unwrap();

        let document = load_document(&input).await.unwrap();
        save_document(&document, &output).await.unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), original);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let error = load_document(&dir.path().join("nope.json")).await.unwrap_err();

        assert!(matches!(error, DomainError::Io { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{oops").unwrap();

        let error = load_document(&path).await.unwrap_err();
        assert!(matches!(error, DomainError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_link_target_accepts_bare_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(&path, r#"{"main": "ATXN3", "interactors": []}"#).unwrap();

        let target = load_link_target(&path).await.unwrap();

        assert!(matches!(target, LinkTarget::Context(_)));
        assert_eq!(target.context().unwrap().main(), "ATXN3");
    }

    #[tokio::test]
    async fn test_link_target_accepts_full_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"ctx_json": {"main": "ATXN3"}, "extra": 1}"#).unwrap();

        let target = load_link_target(&path).await.unwrap();
        assert_eq!(target.context().unwrap().main(), "ATXN3");
        let target = target.with_context(Context::new("VCP", Vec::new()));

        save_link_target(&target, &path).await.unwrap();
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(written["ctx_json"]["main"], json!("VCP"));
        assert_eq!(written["extra"], json!(1));
    }

    #[tokio::test]
    async fn test_document_without_context_object_has_no_link_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"ctx_json": "pending"}"#).unwrap();

        let target = load_link_target(&path).await.unwrap();

        assert!(matches!(target, LinkTarget::Document(_)));
        assert!(target.context().is_none());
    }
}
