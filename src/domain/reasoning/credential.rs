/// API key for the reasoning service.
///
/// Passed explicitly to whatever needs it; `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Returns `None` for an empty or whitespace-only key
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();

        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key.trim().to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}
