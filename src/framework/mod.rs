//! # Framework Module
//!
//! Contracts for the web framework being introspected. The generator never
//! talks to a live framework directly; it reads everything through these
//! traits so the pipeline can run against a route manifest export or an
//! in-memory fake.
//!
//! ## Collaborators
//!
//! - [`RouteTable`] - enumerates registered routes
//! - [`Reflector`] - class/method existence, endpoint annotations, doc
//!   comments and handler parameter types
//! - [`RuleProvider`] - the field-to-rules mapping of a validation request class
//!
//! [`Framework`] bundles all three and is implemented automatically for any
//! type that implements them.
//!
//! The bundled implementation is [`manifest::Manifest`], loaded from a YAML
//! or JSON export with [`manifest::load_manifest`].

pub mod manifest;

use http::Method;

/// A route exactly as the framework registered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRoute {
    /// Verbs bound to the route, primary verb first (e.g. `GET, HEAD`)
    pub methods: Vec<Method>,
    /// URI template without leading slash, e.g. `api/orders/{order}`
    pub uri: String,
    /// Handler action as `Class@method`, `None` for closure routes
    pub action: Option<String>,
    /// Gathered middleware labels, group middleware included
    pub middleware: Vec<String>,
    /// Declared route name, e.g. `orders.show`
    pub name: Option<String>,
    /// Path parameter names in URI order
    pub parameter_names: Vec<String>,
}

impl RawRoute {
    /// The verb the route is reported under.
    pub fn primary_method(&self) -> Option<&Method> {
        self.methods.first()
    }
}

/// Per-endpoint metadata, either declared on the handler or parsed from its
/// doc comment. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointMeta {
    pub name: String,
    pub description: String,
    pub folder: String,
}

impl EndpointMeta {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description.is_empty() && self.folder.is_empty()
    }
}

/// Declared type of a handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// Language primitive (`int`, `string`, `array`, ...)
    Builtin(String),
    /// A class or interface name
    Class(String),
    /// `A|B` union
    Union(Vec<ParameterType>),
}

/// Field rules as declared: either a `|` separated string or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSpec {
    Piped(String),
    List(Vec<String>),
}

impl RuleSpec {
    /// Split into individual tokens, each trimmed.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            RuleSpec::Piped(s) => s.split('|').map(|t| t.trim().to_string()).collect(),
            RuleSpec::List(items) => items.iter().map(|t| t.trim().to_string()).collect(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(s: &str) -> Self {
        RuleSpec::Piped(s.to_string())
    }
}

/// Ordered field-to-rules mapping returned by a validation request class.
pub type RuleSet = Vec<(String, RuleSpec)>;

/// Enumerates the framework's registered routes.
pub trait RouteTable {
    fn routes(&self) -> Vec<RawRoute>;
}

/// Reflection over handler and request classes.
pub trait Reflector {
    fn class_exists(&self, class: &str) -> bool;

    fn method_exists(&self, class: &str, method: &str) -> bool;

    /// Declarative endpoint annotation on `class::method`, if any.
    fn endpoint_attribute(&self, class: &str, method: &str) -> Option<EndpointMeta>;

    /// Raw doc comment on `class::method`, if any.
    fn doc_comment(&self, class: &str, method: &str) -> Option<String>;

    /// Declared parameter types of `class::method`, in order.
    fn parameter_types(&self, class: &str, method: &str) -> Vec<ParameterType>;

    /// `true` when `class` derives from `parent` and is not `parent` itself.
    fn is_subclass_of(&self, class: &str, parent: &str) -> bool;
}

/// Evaluates the rules of a validation request class.
///
/// Implementations must behave as if the request were built fresh for
/// `method` with empty input. Any failure is reported as an error; callers
/// degrade rather than abort.
pub trait RuleProvider {
    fn rules(&self, class: &str, method: &Method) -> anyhow::Result<RuleSet>;
}

/// Everything the pipeline needs from the framework.
pub trait Framework: RouteTable + Reflector + RuleProvider {}

impl<T: RouteTable + Reflector + RuleProvider> Framework for T {}
