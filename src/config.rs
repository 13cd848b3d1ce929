//! Generator configuration
//!
//! Settings come from an optional `postman-generator.toml` that sits next to
//! the route manifest (or is named with `--config`), then a few environment
//! variables override individual keys. Every key is optional.
//!
//! ```toml
//! collection_name = "Shop API"
//! route_groups = "api"
//! exclude_routes = ["api/internal/*"]
//! generate_responses = true
//! capture_base_url = "http://127.0.0.1:8000"
//! ```

use crate::collection::{CaptureSettings, BASE_URL_VAR};
use crate::metadata::DEFAULT_FORM_REQUEST_BASE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up next to the manifest.
pub const CONFIG_FILE_NAME: &str = "postman-generator.toml";

/// Sets the execution environment (`local`, `testing`, `production`, ...)
pub const ENV_APP_ENV: &str = "APP_ENV";
/// Bearer token used for response capture
pub const ENV_TOKEN: &str = "POSTMAN_GENERATOR_TOKEN";
/// Collection base URL
pub const ENV_BASE_URL: &str = "POSTMAN_GENERATOR_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Where the collection is written
    pub output_path: PathBuf,
    /// Middleware group a route must carry to be included
    pub route_groups: String,
    /// URI globs to leave out
    pub exclude_routes: Vec<String>,
    /// Routes whose middleware are all in this list are left out
    pub exclude_middlewares: Vec<String>,
    /// Middleware labels that mark a route as bearer-protected
    pub auth_middlewares: Vec<String>,
    pub collection_name: String,
    pub base_url: String,
    /// Target for live capture; falls back to `base_url` when that is concrete
    pub capture_base_url: Option<String>,
    pub include_tenant_id: bool,
    pub auto_examples: bool,
    pub generate_responses: bool,
    /// Per-call capture timeout in seconds
    pub response_timeout: u64,
    pub response_max_bytes: usize,
    pub token: Option<String>,
    pub environment: String,
    /// Environments in which live capture may run
    pub capture_environments: Vec<String>,
    pub form_request_base: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_path: PathBuf::from("storage/postman/collection.json"),
            route_groups: "api".to_string(),
            exclude_routes: Vec::new(),
            exclude_middlewares: Vec::new(),
            auth_middlewares: vec!["auth:sanctum".to_string(), "auth:api".to_string()],
            collection_name: "Laravel API".to_string(),
            base_url: BASE_URL_VAR.to_string(),
            capture_base_url: None,
            include_tenant_id: false,
            auto_examples: true,
            generate_responses: false,
            response_timeout: 5,
            response_max_bytes: 10240,
            token: None,
            environment: "production".to_string(),
            capture_environments: vec!["local".to_string(), "testing".to_string()],
            form_request_base: DEFAULT_FORM_REQUEST_BASE.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Override keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override keys from `lookup`. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(env) = get(ENV_APP_ENV) {
            self.environment = env;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            self.base_url = base_url;
        }
    }

    /// Capture options derived from this configuration.
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            enabled: self.generate_responses,
            environment: self.environment.clone(),
            capture_environments: self.capture_environments.clone(),
            token: self.token.clone(),
            capture_base_url: self.capture_base_url.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.response_timeout),
            max_bytes: self.response_max_bytes,
        }
    }
}

/// Load configuration from a TOML file
///
/// Returns `Ok(None)` if the file doesn't exist and `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read generator config: {}", config_path.display()))?;

    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse generator config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Look for [`CONFIG_FILE_NAME`] in the manifest's directory.
pub fn auto_detect_config_path(manifest_path: &Path) -> Option<PathBuf> {
    let dir = manifest_path.parent()?;
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}

/// Resolve the effective configuration for a run.
///
/// An explicit path must exist. Without one the file next to the manifest is
/// used when present, otherwise the defaults.
pub fn resolve_config(
    manifest_path: &Path,
    explicit: Option<&Path>,
) -> anyhow::Result<GeneratorConfig> {
    let mut config = match explicit {
        Some(path) => load_config(path)?
            .with_context(|| format!("Config file not found: {}", path.display()))?,
        None => match auto_detect_config_path(manifest_path) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using detected generator config");
                load_config(&path)?.unwrap_or_default()
            }
            None => GeneratorConfig::default(),
        },
    };
    config.apply_env();
    Ok(config)
}
