use serde::Serialize;
use std::fmt;

/// How a request authenticates in the generated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Bearer,
    NoAuth,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Bearer => write!(f, "bearer"),
            AuthType::NoAuth => write!(f, "noauth"),
        }
    }
}

/// Classifies routes by their middleware labels.
#[derive(Debug, Clone)]
pub struct AuthDetector {
    auth_middlewares: Vec<String>,
}

impl AuthDetector {
    pub fn new(auth_middlewares: &[String]) -> Self {
        AuthDetector {
            auth_middlewares: auth_middlewares.to_vec(),
        }
    }

    /// `Bearer` when any label exactly matches a configured auth middleware.
    pub fn detect(&self, middleware: &[String]) -> AuthType {
        if middleware.iter().any(|m| self.auth_middlewares.contains(m)) {
            AuthType::Bearer
        } else {
            AuthType::NoAuth
        }
    }
}

impl Default for AuthDetector {
    fn default() -> Self {
        AuthDetector::new(&["auth:sanctum".to_string(), "auth:api".to_string()])
    }
}
