//! # Body Module
//!
//! Builds example request bodies from validation rule sets.
//!
//! Every field's rule tokens are mapped to a literal example value (see
//! [`rules::example_value`]) and written into a JSON tree by its dotted path.
//! If any field expects an uploaded file the tree is flattened into a
//! multipart field list instead.

mod dotted;
pub mod rules;

pub use dotted::{finalize, flatten, set_dotted, wildcard_key};
pub use rules::{example_value, is_file_type, DEFAULT_EXAMPLE};

use crate::framework::{RuleProvider, RuleSpec};
use crate::metadata::EnrichedRoute;
use http::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Generated stand-in payload for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum BodySchema {
    /// The method carries no body
    None,
    /// A body is expected but no example could be produced
    Empty,
    Raw(Value),
    FormData(Vec<FormField>),
}

impl BodySchema {
    /// `true` for `Raw` and `FormData`.
    pub fn has_example(&self) -> bool {
        matches!(self, BodySchema::Raw(_) | BodySchema::FormData(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    File,
    Text,
}

/// One multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: String,
    pub kind: FieldKind,
    /// Present for text fields only
    pub value: Option<String>,
}

/// Produces a [`BodySchema`] per enriched route.
#[derive(Debug, Clone)]
pub struct BodyExampleGenerator {
    auto_examples: bool,
}

impl BodyExampleGenerator {
    pub fn new(auto_examples: bool) -> Self {
        BodyExampleGenerator { auto_examples }
    }

    pub fn generate(&self, route: &EnrichedRoute, rules: &dyn RuleProvider) -> BodySchema {
        if !self.auto_examples {
            return BodySchema::Empty;
        }
        let method = &route.route.method;
        if [Method::GET, Method::DELETE, Method::HEAD, Method::OPTIONS].contains(method) {
            return BodySchema::None;
        }
        let Some(class) = route.form_request.as_deref() else {
            return BodySchema::Empty;
        };

        let rule_set = match rules.rules(class, method) {
            Ok(rule_set) => rule_set,
            Err(e) => {
                warn!(
                    route = %route.id(),
                    class,
                    error = %e,
                    "rule evaluation failed, leaving body empty"
                );
                return BodySchema::Empty;
            }
        };
        debug!(route = %route.id(), class, fields = rule_set.len(), "generating body example");
        build_schema(&rule_set)
    }
}

impl Default for BodyExampleGenerator {
    fn default() -> Self {
        BodyExampleGenerator::new(true)
    }
}

/// Example body for an ordered rule set.
pub fn build_schema(rule_set: &[(String, RuleSpec)]) -> BodySchema {
    let mut tree = Map::new();
    let mut file_fields: HashMap<&str, bool> = HashMap::new();
    let mut has_file = false;

    for (field, spec) in rule_set {
        let tokens = spec.tokens();
        let is_file = is_file_type(&tokens);
        has_file |= is_file;
        file_fields.insert(field.as_str(), is_file);
        set_dotted(&mut tree, field, example_value(&tokens));
    }
    let tree = finalize(Value::Object(tree));

    if !has_file {
        return BodySchema::Raw(tree);
    }

    let fields = flatten(&tree)
        .into_iter()
        .map(|(key, value)| {
            let rule_key = wildcard_key(&key);
            let is_file = file_fields
                .get(rule_key.as_str())
                .or_else(|| file_fields.get(key.as_str()))
                .copied()
                .unwrap_or(false);
            if is_file {
                FormField {
                    key,
                    kind: FieldKind::File,
                    value: None,
                }
            } else {
                FormField {
                    key,
                    kind: FieldKind::Text,
                    value: Some(form_value(&value)),
                }
            }
        })
        .collect();
    BodySchema::FormData(fields)
}

/// Multipart text rendering of an example value.
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
