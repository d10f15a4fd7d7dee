//! Pipeline document entities
//!
//! Interactors and claims arrive from upstream pipeline stages and from model
//! replies, so each one is held as its raw JSON object. The audit reads a few
//! fields through typed accessors and writes everything else back exactly as
//! it came in, key order and explicit nulls included.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Validity;

/// Placeholder used when a document carries no main protein
pub const UNKNOWN_PROTEIN: &str = "UNKNOWN";

const CTX_JSON: &str = "ctx_json";
const SNAPSHOT_JSON: &str = "snapshot_json";
const INTERACTORS: &str = "interactors";
const FUNCTIONS: &str = "functions";
const VALIDITY: &str = "validity";
const LINKED_MEDIATOR: &str = "_linked_mediator_interaction";

/// Top-level pipeline document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new(ctx: Context) -> Self {
        let mut fields = Map::new();
        fields.insert(CTX_JSON.to_string(), Value::Object(ctx.0));
        Self(fields)
    }

    pub fn with_snapshot(mut self, snapshot: Map<String, Value>) -> Self {
        self.0.insert(SNAPSHOT_JSON.to_string(), Value::Object(snapshot));
        self
    }

    fn ctx(&self) -> Option<&Map<String, Value>> {
        self.0.get(CTX_JSON).and_then(Value::as_object)
    }

    /// A copy of the `ctx_json` section, if the document has one
    pub fn context(&self) -> Option<Context> {
        self.ctx().cloned().map(Context)
    }

    /// Write `ctx` back as the `ctx_json` section
    pub fn set_context(&mut self, ctx: Context) {
        self.0.insert(CTX_JSON.to_string(), Value::Object(ctx.0));
    }

    pub fn main_protein(&self) -> &str {
        self.ctx().map_or(UNKNOWN_PROTEIN, main_of)
    }

    pub fn interactors(&self) -> Result<Vec<Interactor>, serde_json::Error> {
        self.ctx().map_or_else(|| Ok(Vec::new()), interactors_of)
    }

    pub fn snapshot(&self) -> Option<&Map<String, Value>> {
        self.0.get(SNAPSHOT_JSON).and_then(Value::as_object)
    }

    /// Replace the interactor list in `ctx_json` and in the `snapshot_json` mirror
    pub fn replace_interactors(&mut self, interactors: Vec<Interactor>) {
        let list = list_value(interactors);

        if let Some(Value::Object(snapshot)) = self.0.get_mut(SNAPSHOT_JSON) {
            snapshot.insert(INTERACTORS.to_string(), list.clone());
        }
        if let Some(Value::Object(ctx)) = self.0.get_mut(CTX_JSON) {
            ctx.insert(INTERACTORS.to_string(), list);
        }
    }
}

/// The `ctx_json` section: one main protein and its claimed interactors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(Map<String, Value>);

impl Context {
    pub fn new(main: impl Into<String>, interactors: Vec<Interactor>) -> Self {
        let mut fields = Map::new();
        fields.insert("main".to_string(), Value::String(main.into()));
        fields.insert(INTERACTORS.to_string(), list_value(interactors));
        Self(fields)
    }

    pub fn main(&self) -> &str {
        main_of(&self.0)
    }

    /// Decode the interactor list. A missing or `null` list is empty.
    pub fn interactors(&self) -> Result<Vec<Interactor>, serde_json::Error> {
        interactors_of(&self.0)
    }

    pub fn set_interactors(&mut self, interactors: Vec<Interactor>) {
        self.0.insert(INTERACTORS.to_string(), list_value(interactors));
    }
}

fn main_of(ctx: &Map<String, Value>) -> &str {
    ctx.get("main").and_then(Value::as_str).unwrap_or(UNKNOWN_PROTEIN)
}

fn interactors_of(ctx: &Map<String, Value>) -> Result<Vec<Interactor>, serde_json::Error> {
    match ctx.get(INTERACTORS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(list) => Vec::<Interactor>::deserialize(list),
    }
}

fn list_value<T: Into<Value>>(items: Vec<T>) -> Value {
    Value::Array(items.into_iter().map(Into::into).collect())
}

/// Whether an interactor touches the main protein directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionType {
    Direct,
    Indirect,
    Other(String),
}

impl InteractionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct => "direct",
            Self::Indirect => "indirect",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for InteractionType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" => Self::Direct,
            "indirect" => Self::Indirect,
            _ => Self::Other(value.to_string()),
        }
    }
}

/// A protein claimed to interact with the main protein
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Interactor(Map<String, Value>);

impl Interactor {
    pub fn new(primary: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("primary".to_string(), Value::String(primary.into()));
        Self(fields)
    }

    pub fn with_function(mut self, claim: FunctionClaim) -> Self {
        match self.0.get_mut(FUNCTIONS) {
            Some(Value::Array(claims)) => claims.push(claim.into()),
            _ => {
                self.0.insert(FUNCTIONS.to_string(), Value::Array(vec![claim.into()]));
            }
        }
        self
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.0.insert(VALIDITY.to_string(), Value::String(validity.into()));
        self
    }

    /// Mark as an indirect interaction reached through `mediator`
    pub fn indirect_via(mut self, mediator: impl Into<String>) -> Self {
        self.0.insert(
            "interaction_type".to_string(),
            Value::String(InteractionType::Indirect.as_str().to_string()),
        );
        self.0
            .insert("upstream_interactor".to_string(), Value::String(mediator.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Partner name, when it is present as text
    pub fn primary(&self) -> Option<&str> {
        self.0.get("primary").and_then(Value::as_str)
    }

    /// Display form of the partner name for logs and prompts
    pub fn name(&self) -> &str {
        self.primary().unwrap_or("<unnamed>")
    }

    pub fn validity(&self) -> Option<Validity> {
        validity_of(&self.0)
    }

    pub fn is_marked(&self, validity: &Validity) -> bool {
        self.validity().as_ref() == Some(validity)
    }

    pub fn text(&self, key: &str) -> Option<String> {
        text_of(self.0.get(key))
    }

    pub fn interaction_type(&self) -> Option<InteractionType> {
        self.0
            .get("interaction_type")
            .and_then(Value::as_str)
            .map(InteractionType::from)
    }

    /// The mediator, when this is an indirect interaction that names one
    pub fn mediator(&self) -> Option<&str> {
        if self.interaction_type() != Some(InteractionType::Indirect) {
            return None;
        }

        self.0
            .get("upstream_interactor")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
    }

    /// Claims that are JSON objects, in order
    pub fn functions(&self) -> Vec<FunctionClaim> {
        claims_of(self.0.get(FUNCTIONS))
    }

    /// Take the raw claim list. A list that is missing or not an array is empty.
    pub fn take_functions(&mut self) -> Vec<Value> {
        match self.0.get_mut(FUNCTIONS).map(Value::take) {
            Some(Value::Array(claims)) => claims,
            _ => Vec::new(),
        }
    }

    pub fn set_functions(&mut self, claims: Vec<FunctionClaim>) {
        self.0.insert(FUNCTIONS.to_string(), list_value(claims));
    }

    pub fn linked_mediator(&self) -> Option<&str> {
        self.0.get(LINKED_MEDIATOR).and_then(Value::as_str)
    }

    pub fn set_linked_mediator(&mut self, link: impl Into<String>) {
        self.0
            .insert(LINKED_MEDIATOR.to_string(), Value::String(link.into()));
    }
}

impl From<Interactor> for Value {
    fn from(interactor: Interactor) -> Self {
        Value::Object(interactor.0)
    }
}

/// One claimed molecular function between two proteins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionClaim(Map<String, Value>);

impl FunctionClaim {
    pub fn new(function: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("function".to_string(), Value::String(function.into()));
        Self(fields)
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.0.insert(VALIDITY.to_string(), Value::String(validity.into()));
        self
    }

    pub fn with_confidence(mut self, score: impl Into<Value>) -> Self {
        self.0.insert("confidence_score".to_string(), score.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tag as sent. Non-text tags count as absent.
    pub fn validity(&self) -> Option<Validity> {
        validity_of(&self.0)
    }

    /// Effective tag: an unmarked claim counts as `TRUE`
    pub fn effective_validity(&self) -> Validity {
        self.validity().unwrap_or(Validity::True)
    }

    /// Confidence score coerced to an integer, if it is numeric at all
    pub fn confidence(&self) -> Option<i64> {
        self.0.get("confidence_score").and_then(coerce_integer)
    }

    pub fn label(&self) -> &str {
        self.0
            .get("function")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
    }

    pub fn text(&self, key: &str) -> Option<String> {
        text_of(self.0.get(key))
    }
}

impl TryFrom<Value> for FunctionClaim {
    type Error = Value;

    /// Only JSON objects are claims; anything else is handed back
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

impl From<FunctionClaim> for Value {
    fn from(claim: FunctionClaim) -> Self {
        Value::Object(claim.0)
    }
}

fn validity_of(fields: &Map<String, Value>) -> Option<Validity> {
    fields
        .get(VALIDITY)
        .and_then(Value::as_str)
        .map(|tag| Validity::from(tag.to_string()))
}

pub(crate) fn claims_of(list: Option<&Value>) -> Vec<FunctionClaim> {
    match list {
        Some(Value::Array(claims)) => claims
            .iter()
            .filter_map(|claim| FunctionClaim::try_from(claim.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Text view of a free-form field; strings are unquoted
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Best-effort integer view of an untrusted JSON value.
///
/// Numbers are truncated toward zero, numeric strings are parsed, anything
/// else is absent.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_round_trip_is_exact() {
        let raw = r#"{
  "run_id": "abc",
  "ctx_json": {
    "interactors": [
      {
        "functions": [
          {
            "specific_effects": "raises X",
            "evidence": [
              {
                "year": "in press",
                "paper_title": "T",
                "pmid": "99"
              }
            ],
            "function": "ERAD",
            "biological_consequence": "a single sentence",
            "search_queries_performed": []
          }
        ],
        "arrow": null,
        "primary": "VCP",
        "interaction_type": "direct"
      }
    ],
    "main": "ATXN3",
    "step": 4
  }
}"#;

        let document: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(document.main_protein(), "ATXN3");
        assert_eq!(document.interactors().unwrap()[0].primary(), Some("VCP"));

        assert_eq!(serde_json::to_string_pretty(&document).unwrap(), raw);
    }

    #[test]
    fn test_missing_main_defaults_to_unknown() {
        let document: Document =
            serde_json::from_value(json!({"ctx_json": {"interactors": null}})).unwrap();
        assert_eq!(document.main_protein(), UNKNOWN_PROTEIN);
        assert!(document.interactors().unwrap().is_empty());

        let bare = Document::default();
        assert_eq!(bare.main_protein(), UNKNOWN_PROTEIN);
        assert!(bare.context().is_none());
    }

    #[test]
    fn test_non_object_interactor_is_an_error() {
        let document: Document =
            serde_json::from_value(json!({"ctx_json": {"interactors": ["VCP"]}})).unwrap();
        assert!(document.interactors().is_err());
    }

    #[test]
    fn test_replace_interactors_mirrors_snapshot() {
        let mut document: Document = serde_json::from_value(json!({
            "ctx_json": {"main": "P1", "interactors": [{"primary": "P2"}], "step": 2},
            "snapshot_json": {"main": "P1", "interactors": [{"primary": "P2"}], "v": 1}
        }))
        .unwrap();

        document.replace_interactors(vec![Interactor::new("P3")]);

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "ctx_json": {"main": "P1", "interactors": [{"primary": "P3"}], "step": 2},
                "snapshot_json": {"main": "P1", "interactors": [{"primary": "P3"}], "v": 1}
            })
        );
    }

    #[test]
    fn test_mediator_requires_indirect_type() {
        let indirect = Interactor::new("TP53").indirect_via("MDM2");
        assert_eq!(indirect.mediator(), Some("MDM2"));

        let direct: Interactor =
            serde_json::from_value(json!({"primary": "TP53", "upstream_interactor": "MDM2"})).unwrap();
        assert_eq!(direct.mediator(), None);

        let blank = Interactor::new("TP53").indirect_via("  ");
        assert_eq!(blank.mediator(), None);

        let numeric: Interactor = serde_json::from_value(json!({
            "primary": "TP53", "interaction_type": "indirect", "upstream_interactor": 7
        }))
        .unwrap();
        assert_eq!(numeric.mediator(), None);
    }

    #[test]
    fn test_confidence_coercion() {
        assert_eq!(FunctionClaim::new("f").with_confidence(9).confidence(), Some(9));
        assert_eq!(FunctionClaim::new("f").with_confidence(7.9).confidence(), Some(7));
        assert_eq!(FunctionClaim::new("f").with_confidence("8").confidence(), Some(8));
        assert_eq!(FunctionClaim::new("f").with_confidence("high").confidence(), None);
        assert_eq!(FunctionClaim::new("f").with_confidence(Value::Null).confidence(), None);
        assert_eq!(FunctionClaim::new("f").confidence(), None);
    }

    #[test]
    fn test_unmarked_claim_is_true() {
        assert_eq!(FunctionClaim::new("f").effective_validity(), Validity::True);
    }

    #[test]
    fn test_non_text_validity_counts_as_absent() {
        let claim: FunctionClaim =
            serde_json::from_value(json!({"function": "f", "validity": false})).unwrap();
        assert_eq!(claim.validity(), None);
        assert_eq!(claim.effective_validity(), Validity::True);

        let interactor: Interactor =
            serde_json::from_value(json!({"primary": "A", "validity": 1})).unwrap();
        assert!(!interactor.is_marked(&Validity::True));
    }

    #[test]
    fn test_missing_primary_is_tolerated() {
        let interactor: Interactor =
            serde_json::from_value(json!({"functions": [{"function": "f"}, "stray"]})).unwrap();

        assert_eq!(interactor.primary(), None);
        assert_eq!(interactor.name(), "<unnamed>");
        assert_eq!(interactor.functions().len(), 1);
    }

    #[test]
    fn test_take_and_set_functions_keep_key_position() {
        let mut interactor: Interactor = serde_json::from_value(json!({
            "primary": "A",
            "functions": [{"function": "f"}, {"function": "g"}],
            "arrow": null
        }))
        .unwrap();

        let claims = interactor.take_functions();
        assert_eq!(claims.len(), 2);

        interactor.set_functions(vec![FunctionClaim::new("g")]);

        let keys: Vec<_> = interactor.0.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["primary", "functions", "arrow"]);
        assert_eq!(interactor.get("arrow"), Some(&Value::Null));
    }

    #[test]
    fn test_text_fields() {
        let claim: FunctionClaim = serde_json::from_value(json!({
            "audit_verdict": "Verified",
            "mechanism_check": null,
            "scientific_consensus": ["a", "b"]
        }))
        .unwrap();

        assert_eq!(claim.text("audit_verdict").as_deref(), Some("Verified"));
        assert_eq!(claim.text("mechanism_check"), None);
        assert_eq!(claim.text("scientific_consensus").as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(claim.label(), "<unnamed>");
    }
}
