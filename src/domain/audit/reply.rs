//! Shape of the audit service's reply

use serde_json::Value;

use crate::domain::document::Interactor;
use crate::domain::DomainError;

/// Audit reply, classified once at the boundary.
///
/// The service is asked for the interactor list but sometimes wraps it in an
/// object; anything else cannot be merged.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditReply {
    /// A bare list of interactors
    List(Vec<Value>),
    /// An object carrying the list under `interactors`
    Wrapped(Vec<Value>),
    Unrecognized(Value),
}

impl AuditReply {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            Value::Object(mut map) => {
                if matches!(map.get("interactors"), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = map.remove("interactors") {
                        return Self::Wrapped(items);
                    }
                }
                Self::Unrecognized(Value::Object(map))
            }
            other => Self::Unrecognized(other),
        }
    }

    /// Decode the listed interactors; `None` for an unrecognized reply.
    ///
    /// Each entry only has to be a JSON object. Its fields are kept as sent.
    pub fn into_interactors(self) -> Result<Option<Vec<Interactor>>, DomainError> {
        match self {
            Self::List(items) | Self::Wrapped(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<Interactor>, _>>()
                .map(Some)
                .map_err(DomainError::from),
            Self::Unrecognized(_) => Ok(None),
        }
    }
}
