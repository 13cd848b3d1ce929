//! # Metadata Module
//!
//! Turns a [`RouteDescriptor`] into an [`EnrichedRoute`]: display name,
//! description, folder, auth classification and the validation request class
//! that supplies its body rules.
//!
//! ## Resolution order
//!
//! Name, description and folder are resolved independently. For each field
//! the first non-empty value wins:
//!
//! 1. [`AttributeProvider`] - the endpoint annotation on the handler
//! 2. [`DocBlockProvider`] - `@postman-name`, `@postman-description` and
//!    `@postman-folder` tags in the handler's doc comment
//! 3. values derived from the route itself
//!
//! Providers are only consulted for routes whose controller and action both
//! resolved.

mod auth;
pub mod inflect;
mod resolver;

pub use auth::{AuthDetector, AuthType};
pub use resolver::{FormRequestResolver, DEFAULT_FORM_REQUEST_BASE};

use crate::framework::{EndpointMeta, Reflector};
use crate::routes::RouteDescriptor;
use inflect::{pluralize, title_case};
use once_cell::sync::Lazy;
use regex::Regex;

/// Folder used when nothing better can be derived.
pub const FALLBACK_FOLDER: &str = "Misc";

static DOC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@postman-(name|description|folder)[ \t]+([^\r\n]+)")
        .expect("doc tag pattern is valid")
});

/// A route with everything needed to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRoute {
    pub route: RouteDescriptor,
    pub name: String,
    pub description: String,
    pub folder: String,
    pub auth: AuthType,
    /// Validation request class supplying the body rules
    pub form_request: Option<String>,
}

impl EnrichedRoute {
    /// `METHOD uri`, e.g. `POST api/users`.
    pub fn id(&self) -> String {
        format!("{} {}", self.route.method.as_str().to_ascii_uppercase(), self.route.uri)
    }
}

/// A source of per-endpoint overrides.
pub trait MetadataProvider {
    fn provide(&self, reflector: &dyn Reflector, class: &str, method: &str) -> EndpointMeta;
}

/// Reads the declarative endpoint annotation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeProvider;

impl MetadataProvider for AttributeProvider {
    fn provide(&self, reflector: &dyn Reflector, class: &str, method: &str) -> EndpointMeta {
        reflector.endpoint_attribute(class, method).unwrap_or_default()
    }
}

/// Reads `@postman-*` tags from the handler doc comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocBlockProvider;

impl DocBlockProvider {
    pub fn parse(doc: &str) -> EndpointMeta {
        let mut meta = EndpointMeta::default();
        for caps in DOC_TAG.captures_iter(doc) {
            let value = caps[2].trim();
            let value = value.strip_suffix("*/").unwrap_or(value).trim_end().to_string();
            let slot = match &caps[1] {
                "name" => &mut meta.name,
                "description" => &mut meta.description,
                _ => &mut meta.folder,
            };
            if slot.is_empty() {
                *slot = value;
            }
        }
        meta
    }
}

impl MetadataProvider for DocBlockProvider {
    fn provide(&self, reflector: &dyn Reflector, class: &str, method: &str) -> EndpointMeta {
        reflector
            .doc_comment(class, method)
            .map(|doc| DocBlockProvider::parse(&doc))
            .unwrap_or_default()
    }
}

/// Enriches scanned routes.
pub struct MetadataExtractor {
    providers: Vec<Box<dyn MetadataProvider>>,
    auth: AuthDetector,
    resolver: FormRequestResolver,
    group_segment: String,
}

impl MetadataExtractor {
    /// `group_segment` is the URI segment after which the folder name is taken.
    pub fn new(group_segment: &str, auth: AuthDetector, resolver: FormRequestResolver) -> Self {
        MetadataExtractor {
            providers: vec![Box::new(AttributeProvider), Box::new(DocBlockProvider)],
            auth,
            resolver,
            group_segment: group_segment.to_string(),
        }
    }

    /// Replace the provider chain. Earlier providers take priority.
    pub fn with_providers(mut self, providers: Vec<Box<dyn MetadataProvider>>) -> Self {
        self.providers = providers;
        self
    }

    pub fn extract(&self, reflector: &dyn Reflector, route: RouteDescriptor) -> EnrichedRoute {
        let mut meta = EndpointMeta::default();
        if let Some((class, method)) = route.handler() {
            for provider in &self.providers {
                let found = provider.provide(reflector, class, method);
                fill_empty(&mut meta.name, found.name);
                fill_empty(&mut meta.description, found.description);
                fill_empty(&mut meta.folder, found.folder);
            }
        }
        if meta.name.is_empty() {
            meta.name = derive_name(&route);
        }
        if meta.folder.is_empty() {
            meta.folder = self.derive_folder(&route);
        }

        let auth = self.auth.detect(&route.middleware);
        let form_request = route
            .handler()
            .and_then(|(class, method)| self.resolver.resolve(reflector, class, method));

        EnrichedRoute {
            name: meta.name,
            description: meta.description,
            folder: meta.folder,
            auth,
            form_request,
            route,
        }
    }

    fn derive_folder(&self, route: &RouteDescriptor) -> String {
        let mut after_group = false;
        for part in route.uri.trim_matches('/').split('/') {
            if after_group {
                return title_case(&pluralize(part));
            }
            if part == self.group_segment {
                after_group = true;
            }
        }

        if let Some(class) = &route.controller {
            let base = class.rsplit('\\').next().unwrap_or(class);
            let base = base.strip_suffix("Controller").unwrap_or(base);
            if !base.is_empty() {
                return title_case(&pluralize(base));
            }
        }

        FALLBACK_FOLDER.to_string()
    }
}

fn fill_empty(slot: &mut String, candidate: String) {
    if slot.is_empty() && !candidate.is_empty() {
        *slot = candidate;
    }
}

fn derive_name(route: &RouteDescriptor) -> String {
    if let Some(name) = &route.name {
        return title_case(&name.replace('.', " "));
    }
    let last = route.uri.rsplit('/').next().unwrap_or_default();
    format!("{} {}", route.method, title_case(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::manifest::Manifest;
    use http::Method;
    use serde_json::json;

    fn manifest() -> Manifest {
        Manifest::from_value(json!({
            "classes": {
                "App\\Http\\Controllers\\OrderController": { "methods": {
                    "index": {},
                    "store": {
                        "attribute": { "name": "Place Order", "description": "", "folder": "" },
                        "doc": "/**\n * @postman-name Ignored Name\n * @postman-description Creates an order\n * @postman-folder Checkout\n */",
                        "parameters": ["App\\Http\\Requests\\StoreOrderRequest"]
                    },
                    "show": { "doc": "/** @postman-name Show One */" }
                }},
                "App\\Http\\Requests\\StoreOrderRequest": {
                    "parent": "Illuminate\\Foundation\\Http\\FormRequest"
                }
            }
        }))
        .unwrap()
    }

    fn route(
        method: Method,
        uri: &str,
        action: Option<&str>,
        name: Option<&str>,
    ) -> RouteDescriptor {
        RouteDescriptor {
            method,
            uri: uri.to_string(),
            controller: action.map(|_| "App\\Http\\Controllers\\OrderController".to_string()),
            action: action.map(str::to_string),
            middleware: vec!["api".to_string(), "auth:sanctum".to_string()],
            name: name.map(str::to_string),
            parameter_names: vec![],
        }
    }

    fn extractor() -> MetadataExtractor {
        MetadataExtractor::new("api", AuthDetector::default(), FormRequestResolver::default())
    }

    #[test]
    fn test_fields_fall_through_providers_independently() {
        let m = manifest();
        let enriched =
            extractor().extract(&m, route(Method::POST, "api/orders", Some("store"), None));
        assert_eq!(enriched.name, "Place Order");
        assert_eq!(enriched.description, "Creates an order");
        assert_eq!(enriched.folder, "Checkout");
        assert_eq!(enriched.auth, AuthType::Bearer);
        assert_eq!(
            enriched.form_request.as_deref(),
            Some("App\\Http\\Requests\\StoreOrderRequest")
        );
        assert_eq!(enriched.id(), "POST api/orders");
    }

    #[test]
    fn test_single_line_doc_block() {
        let m = manifest();
        let enriched =
            extractor().extract(&m, route(Method::GET, "api/orders/{order}", Some("show"), None));
        assert_eq!(enriched.name, "Show One");
        assert_eq!(enriched.folder, "Orders");
        assert_eq!(enriched.form_request, None);
    }

    #[test]
    fn test_derived_name_from_route_name() {
        let m = manifest();
        let enriched = extractor().extract(
            &m,
            route(Method::GET, "api/orders", Some("index"), Some("orders.index")),
        );
        assert_eq!(enriched.name, "Orders Index");
        assert_eq!(enriched.description, "");
    }

    #[test]
    fn test_derived_name_from_uri() {
        let m = manifest();
        let enriched = extractor().extract(&m, route(Method::GET, "api/order-items", None, None));
        assert_eq!(enriched.name, "GET Order-Items");
        assert_eq!(enriched.folder, "Order-Items");
    }

    #[test]
    fn test_folder_falls_back_to_controller_then_misc() {
        let m = manifest();
        let enriched = extractor().extract(&m, route(Method::GET, "v1/list", Some("index"), None));
        assert_eq!(enriched.folder, "Orders");

        let enriched = extractor().extract(&m, route(Method::GET, "v1/list", None, None));
        assert_eq!(enriched.folder, FALLBACK_FOLDER);

        let enriched = extractor().extract(&m, route(Method::GET, "api", None, None));
        assert_eq!(enriched.folder, FALLBACK_FOLDER);
    }

    #[test]
    fn test_doc_block_parse_first_tag_wins() {
        let meta =
            DocBlockProvider::parse("/**\n * @postman-name First\n * @postman-name Second\n */");
        assert_eq!(meta.name, "First");
        assert!(meta.folder.is_empty());
    }

    #[test]
    fn test_custom_provider_chain() {
        struct Fixed;
        impl MetadataProvider for Fixed {
            fn provide(&self, _: &dyn Reflector, _: &str, _: &str) -> EndpointMeta {
                EndpointMeta {
                    name: "Fixed".into(),
                    ..Default::default()
                }
            }
        }
        let m = manifest();
        let extractor =
            extractor().with_providers(vec![Box::new(Fixed), Box::new(AttributeProvider)]);
        let enriched =
            extractor.extract(&m, route(Method::POST, "api/orders", Some("store"), None));
        assert_eq!(enriched.name, "Fixed");
        assert_eq!(enriched.description, "");
    }
}
