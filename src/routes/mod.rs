//! # Routes Module
//!
//! Collects the routes that belong in the collection.
//!
//! [`RouteScanner`] reads the framework's [`RouteTable`](crate::framework::RouteTable),
//! drops routes outside the target middleware group, routes that only carry
//! excluded middleware, and routes whose URI matches an exclusion glob, and
//! resolves each handler through the [`Reflector`](crate::framework::Reflector).
//!
//! ```rust,ignore
//! use postman_gen::routes::RouteScanner;
//!
//! let scanner = RouteScanner::new("api", &["api/internal/*".into()], &[]);
//! let routes = scanner.scan(&manifest, &manifest);
//! ```

mod glob;

pub use glob::UriGlob;

use crate::framework::{RawRoute, Reflector, RouteTable};
use http::Method;
use tracing::{debug, warn};

/// A route selected for the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Primary verb, upper-case
    pub method: Method,
    /// URI template as registered, e.g. `api/orders/{order_id}`
    pub uri: String,
    /// Handler class, only when it exists
    pub controller: Option<String>,
    /// Handler method, only when both class and method exist
    pub action: Option<String>,
    pub middleware: Vec<String>,
    pub name: Option<String>,
    pub parameter_names: Vec<String>,
}

impl RouteDescriptor {
    /// Controller and action, when both resolved.
    pub fn handler(&self) -> Option<(&str, &str)> {
        match (&self.controller, &self.action) {
            (Some(class), Some(method)) => Some((class.as_str(), method.as_str())),
            _ => None,
        }
    }
}

/// Filters and resolves the framework's route table.
#[derive(Debug, Clone)]
pub struct RouteScanner {
    target_group: String,
    exclude_routes: Vec<UriGlob>,
    exclude_middlewares: Vec<String>,
}

impl RouteScanner {
    pub fn new(
        target_group: &str,
        exclude_routes: &[String],
        exclude_middlewares: &[String],
    ) -> Self {
        let exclude_routes = exclude_routes
            .iter()
            .filter_map(|pattern| match UriGlob::new(pattern) {
                Ok(glob) => Some(glob),
                Err(e) => {
                    warn!(
                        pattern = %pattern,
                        error = %e,
                        "ignoring invalid exclude_routes pattern"
                    );
                    None
                }
            })
            .collect();
        RouteScanner {
            target_group: target_group.to_string(),
            exclude_routes,
            exclude_middlewares: exclude_middlewares.to_vec(),
        }
    }

    pub fn scan(&self, table: &dyn RouteTable, reflector: &dyn Reflector) -> Vec<RouteDescriptor> {
        table
            .routes()
            .into_iter()
            .filter(|route| self.should_include(route))
            .filter_map(|route| {
                let method = route.primary_method()?.clone();
                let (controller, action) = resolve_handler(route.action.as_deref(), reflector);
                Some(RouteDescriptor {
                    method,
                    uri: route.uri,
                    controller,
                    action,
                    middleware: route.middleware,
                    name: route.name,
                    parameter_names: route.parameter_names,
                })
            })
            .collect()
    }

    fn should_include(&self, route: &RawRoute) -> bool {
        let Some(method) = route.primary_method() else {
            return false;
        };
        if *method == Method::HEAD || *method == Method::OPTIONS {
            return false;
        }

        if !route.middleware.iter().any(|m| *m == self.target_group) {
            return false;
        }

        if !self.exclude_middlewares.is_empty()
            && route
                .middleware
                .iter()
                .all(|m| self.exclude_middlewares.contains(m))
        {
            debug!(uri = %route.uri, "skipping route with only excluded middleware");
            return false;
        }

        if let Some(glob) = self.exclude_routes.iter().find(|g| g.matches(&route.uri)) {
            debug!(uri = %route.uri, pattern = glob.pattern(), "skipping excluded route");
            return false;
        }

        true
    }
}

/// Split a `Class@method` action and keep only the parts that exist.
fn resolve_handler(
    action: Option<&str>,
    reflector: &dyn Reflector,
) -> (Option<String>, Option<String>) {
    let Some(action) = action else {
        return (None, None);
    };
    let (class, method) = match action.split_once('@') {
        Some((class, method)) => (class, Some(method)),
        None => (action, None),
    };
    if !reflector.class_exists(class) {
        debug!(class, "handler class not found, treating route as closure");
        return (None, None);
    }
    let method = method
        .filter(|m| reflector.method_exists(class, m))
        .map(str::to_string);
    (Some(class.to_string()), method)
}
