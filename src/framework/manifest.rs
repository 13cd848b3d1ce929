//! Route manifest: a file export of the framework's route table and the
//! reflection data the generator needs.
//!
//! YAML (`.yaml` / `.yml`) and JSON are both accepted. Rule maps keep their
//! declaration order.

use super::{
    EndpointMeta, ParameterType, RawRoute, Reflector, RouteTable, RuleProvider, RuleSet, RuleSpec,
};
use anyhow::{anyhow, Context};
use http::Method;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

const BUILTIN_TYPES: [&str; 14] = [
    "int", "float", "string", "bool", "array", "callable", "iterable", "object", "mixed", "null",
    "false", "true", "void", "never",
];

/// In-memory route manifest implementing every framework contract.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    routes: Vec<RawRoute>,
    classes: HashMap<String, ManifestClass>,
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    routes: Vec<ManifestRoute>,
    #[serde(default)]
    classes: HashMap<String, ManifestClass>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MethodList {
    /// `GET|HEAD`, as printed by route listings
    Piped(String),
    List(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ManifestRoute {
    #[serde(alias = "method")]
    methods: MethodList,
    uri: String,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    middleware: Vec<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parameters: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestClass {
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    methods: HashMap<String, ManifestMethod>,
    #[serde(default)]
    rules: Option<Map<String, Value>>,
    #[serde(default)]
    method_rules: HashMap<String, Map<String, Value>>,
    #[serde(default)]
    rules_error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestMethod {
    #[serde(default)]
    attribute: Option<ManifestAttribute>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    parameters: Vec<ManifestParam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestAttribute {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    folder: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ManifestParam {
    Single(String),
    Union(Vec<String>),
}

/// Load a manifest from a YAML or JSON file.
pub fn load_manifest(path: &Path) -> anyhow::Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route manifest: {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false);
    let value: Value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse route manifest: {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse route manifest: {}", path.display()))?
    };
    Manifest::from_value(value)
        .with_context(|| format!("Invalid route manifest: {}", path.display()))
}

impl Manifest {
    /// Build a manifest from an already parsed document.
    pub fn from_value(value: Value) -> anyhow::Result<Self> {
        let file: ManifestFile = serde_json::from_value(value)?;
        let routes = file
            .routes
            .into_iter()
            .map(ManifestRoute::into_raw)
            .collect::<anyhow::Result<Vec<_>>>()?;
        let mut classes = HashMap::with_capacity(file.classes.len());
        for (name, mut class) in file.classes {
            class.method_rules = normalize_method_rules(&name, class.method_rules)?;
            let key = normalize_class(&name).to_string();
            if classes.contains_key(&key) {
                anyhow::bail!("class {key} is declared more than once");
            }
            classes.insert(key, class);
        }
        debug!(routes = routes.len(), "loaded route manifest");
        Ok(Manifest { routes, classes })
    }

    fn method(&self, class: &str, method: &str) -> Option<&ManifestMethod> {
        self.classes
            .get(normalize_class(class))
            .and_then(|c| c.methods.get(method))
    }
}

impl ManifestRoute {
    fn into_raw(self) -> anyhow::Result<RawRoute> {
        let verbs: Vec<String> = match self.methods {
            MethodList::Piped(s) => s.split('|').map(str::to_string).collect(),
            MethodList::List(list) => list,
        };
        let methods = verbs
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| {
                Method::from_bytes(v.to_ascii_uppercase().as_bytes())
                    .map_err(|_| anyhow!("invalid HTTP method '{v}' on route {}", self.uri))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        if methods.is_empty() {
            anyhow::bail!("route {} declares no HTTP method", self.uri);
        }
        Ok(RawRoute {
            methods,
            uri: self.uri,
            action: self.action,
            middleware: self.middleware,
            name: self.name.filter(|n| !n.is_empty()),
            parameter_names: self.parameters,
        })
    }
}

fn normalize_class(name: &str) -> &str {
    name.trim_start_matches('\\')
}

/// Uppercase the verb keys, rejecting verbs declared twice.
fn normalize_method_rules(
    class: &str,
    method_rules: HashMap<String, Map<String, Value>>,
) -> anyhow::Result<HashMap<String, Map<String, Value>>> {
    let mut normalized = HashMap::with_capacity(method_rules.len());
    for (verb, rules) in method_rules {
        let verb = verb.trim().to_ascii_uppercase();
        if normalized.insert(verb.clone(), rules).is_some() {
            anyhow::bail!("method_rules for {verb} declared more than once on {class}");
        }
    }
    Ok(normalized)
}

fn parse_type(name: &str) -> ParameterType {
    let name = normalize_class(name.trim().trim_start_matches('?'));
    if BUILTIN_TYPES.contains(&name.to_ascii_lowercase().as_str()) {
        ParameterType::Builtin(name.to_string())
    } else {
        ParameterType::Class(name.to_string())
    }
}

fn rule_set_from_map(map: &Map<String, Value>) -> anyhow::Result<RuleSet> {
    map.iter()
        .map(|(field, value)| {
            let spec = match value {
                Value::String(s) => RuleSpec::Piped(s.clone()),
                Value::Array(items) => RuleSpec::List(
                    items
                        .iter()
                        .map(|item| {
                            item.as_str().map(str::to_string).ok_or_else(|| {
                                anyhow!("rule for '{field}' is not a string: {item}")
                            })
                        })
                        .collect::<anyhow::Result<Vec<_>>>()?,
                ),
                other => anyhow::bail!("rules for '{field}' must be a string or list, got {other}"),
            };
            Ok((field.clone(), spec))
        })
        .collect()
}

impl RouteTable for Manifest {
    fn routes(&self) -> Vec<RawRoute> {
        self.routes.clone()
    }
}

impl Reflector for Manifest {
    fn class_exists(&self, class: &str) -> bool {
        self.classes.contains_key(normalize_class(class))
    }

    fn method_exists(&self, class: &str, method: &str) -> bool {
        self.method(class, method).is_some()
    }

    fn endpoint_attribute(&self, class: &str, method: &str) -> Option<EndpointMeta> {
        self.method(class, method)?
            .attribute
            .as_ref()
            .map(|a| EndpointMeta {
                name: a.name.clone(),
                description: a.description.clone(),
                folder: a.folder.clone(),
            })
    }

    fn doc_comment(&self, class: &str, method: &str) -> Option<String> {
        self.method(class, method)?.doc.clone()
    }

    fn parameter_types(&self, class: &str, method: &str) -> Vec<ParameterType> {
        self.method(class, method)
            .map(|m| {
                m.parameters
                    .iter()
                    .map(|p| match p {
                        ManifestParam::Single(name) => parse_type(name),
                        ManifestParam::Union(names) => {
                            ParameterType::Union(names.iter().map(|n| parse_type(n)).collect())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_subclass_of(&self, class: &str, parent: &str) -> bool {
        let target = normalize_class(parent);
        let mut current = normalize_class(class);
        if current == target {
            return false;
        }
        let mut seen = HashSet::new();
        while let Some(next) = self
            .classes
            .get(current)
            .and_then(|c| c.parent.as_deref())
            .map(normalize_class)
        {
            if next == target {
                return true;
            }
            if !seen.insert(next) {
                return false;
            }
            current = next;
        }
        false
    }
}

impl RuleProvider for Manifest {
    fn rules(&self, class: &str, method: &Method) -> anyhow::Result<RuleSet> {
        let entry = self
            .classes
            .get(normalize_class(class))
            .ok_or_else(|| anyhow!("class {class} is not declared in the manifest"))?;
        if let Some(message) = &entry.rules_error {
            anyhow::bail!("{class}::rules() failed: {message}");
        }
        let by_method = entry.method_rules.get(&method.as_str().to_ascii_uppercase());
        match by_method.or(entry.rules.as_ref()) {
            Some(map) => rule_set_from_map(map),
            None => Ok(Vec::new()),
        }
    }
}
