//! Validity tags assigned by the audit

/// Retention tag for a claim or an interactor.
///
/// Tags are matched case-insensitively. Anything else is kept verbatim in
/// `Other` so it round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// Claim unchanged, evidence confirmed
    True,
    /// Claim rewritten with new evidence
    Corrected,
    /// Claim unsupported; drop the claim only
    False,
    /// Whole entry invalid
    Deleted,
    Other(String),
}

impl Validity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::True => "TRUE",
            Self::Corrected => "CORRECTED",
            Self::False => "FALSE",
            Self::Deleted => "DELETED",
            Self::Other(raw) => raw,
        }
    }

    /// Whether a claim carrying this tag is removed outright
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::False | Self::Deleted)
    }
}

impl From<String> for Validity {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRUE" => Self::True,
            "CORRECTED" => Self::Corrected,
            "FALSE" => Self::False,
            "DELETED" => Self::Deleted,
            _ => Self::Other(value),
        }
    }
}

impl From<Validity> for String {
    fn from(validity: Validity) -> Self {
        validity.as_str().to_string()
    }
}

impl std::fmt::Display for Validity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
