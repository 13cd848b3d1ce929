//! Live response capture.
//!
//! When enabled, each request is replayed against a running instance of the
//! application and the reply is attached to the item as a saved example.
//! Capture is restricted to safe environments and never fails the run: any
//! transport error just leaves the item without a response.

use super::{Request, RequestItem};
use crate::body::BodySchema;
use crate::metadata::{AuthType, EnrichedRoute};
use anyhow::{anyhow, Context};
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Appended to bodies cut at the byte limit.
pub const TRUNCATION_MARKER: &str = "\n... [truncated]";

const FALLBACK_CAPTURE_URL: &str = "http://localhost";

const REPLAYED_METHODS: [Method; 5] =
    [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

static URI_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\w+\??\}").expect("uri parameter pattern is valid"));

/// One outgoing capture call.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    pub method: Method,
    pub url: url::Url,
    /// JSON payload for non-GET methods
    pub body: Option<Value>,
    pub token: Option<String>,
    pub timeout: Duration,
}

/// What came back.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Header name and all its values joined with `, `
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Performs capture calls.
pub trait HttpTransport {
    fn send(&self, request: &CaptureRequest) -> anyhow::Result<TransportResponse>;
}

/// Blocking `reqwest` transport.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(ReqwestTransport { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &CaptureRequest) -> anyhow::Result<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .timeout(request.timeout)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .keys()
            .map(|name| {
                let values: Vec<String> = response
                    .headers()
                    .get_all(name)
                    .iter()
                    .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                    .collect();
                (name.as_str().to_string(), values.join(", "))
            })
            .collect();
        let body = response.bytes()?.to_vec();

        Ok(TransportResponse { status, headers, body })
    }
}

/// Capture options, resolved from configuration.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    pub enabled: bool,
    /// Current execution environment, e.g. `local`
    pub environment: String,
    pub capture_environments: Vec<String>,
    pub token: Option<String>,
    /// Explicit capture target
    pub capture_base_url: Option<String>,
    /// Collection base URL, used when it is not a `{{template}}`
    pub base_url: String,
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        CaptureSettings {
            enabled: false,
            environment: "production".to_string(),
            capture_environments: vec!["local".to_string(), "testing".to_string()],
            token: None,
            capture_base_url: None,
            base_url: super::BASE_URL_VAR.to_string(),
            timeout: Duration::from_secs(5),
            max_bytes: 10240,
        }
    }
}

impl CaptureSettings {
    /// Capture is on and the environment permits live calls.
    pub fn is_allowed(&self) -> bool {
        self.enabled && self.capture_environments.iter().any(|env| *env == self.environment)
    }

    /// Log why capture is off, if it was requested.
    pub fn announce(&self) {
        if self.enabled && !self.is_allowed() {
            info!(
                environment = %self.environment,
                allowed = ?self.capture_environments,
                "response capture disabled in this environment"
            );
        }
    }
}

/// Response body bytes. Serializes as a string and fails on invalid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody(pub Vec<u8>);

impl Serialize for ResponseBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(&self.0) {
            Ok(text) => serializer.serialize_str(text),
            Err(e) => Err(serde::ser::Error::custom(format!(
                "captured response body is not valid UTF-8: {e}"
            ))),
        }
    }
}

/// A saved example attached to a request item.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseExample {
    pub name: String,
    #[serde(rename = "originalRequest")]
    pub original_request: Request,
    pub status: String,
    pub code: u16,
    #[serde(rename = "_postman_previewlanguage")]
    pub preview_language: String,
    pub header: Vec<ResponseHeader>,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseHeader {
    pub key: String,
    pub value: String,
}

/// Replays requests and attaches their responses.
pub struct ResponseCapture {
    settings: CaptureSettings,
    transport: Box<dyn HttpTransport>,
}

impl ResponseCapture {
    pub fn new(settings: CaptureSettings, transport: Box<dyn HttpTransport>) -> Self {
        ResponseCapture { settings, transport }
    }

    pub fn is_allowed(&self) -> bool {
        self.settings.is_allowed()
    }

    /// Try to attach a captured response to `item`. Returns whether one was attached.
    pub fn attach(&self, item: &mut RequestItem, route: &EnrichedRoute, body: &BodySchema) -> bool {
        if !self.is_allowed() {
            return false;
        }
        let token = self.settings.token.as_deref().filter(|t| !t.is_empty());
        if route.auth == AuthType::Bearer && token.is_none() {
            debug!(route = %route.id(), "skipping capture for protected route without token");
            return false;
        }
        // public routes never see the token
        let token = token.filter(|_| route.auth == AuthType::Bearer);

        match self.capture(route, body, token) {
            Ok(response) => {
                debug!(route = %route.id(), status = response.status, "captured response");
                item.response.push(ResponseExample {
                    name: "Captured Response".to_string(),
                    original_request: item.request.clone(),
                    status: status_text(response.status).to_string(),
                    code: response.status,
                    preview_language: "json".to_string(),
                    header: response
                        .headers
                        .into_iter()
                        .map(|(key, value)| ResponseHeader { key, value })
                        .collect(),
                    body: ResponseBody(truncate_body(response.body, self.settings.max_bytes)),
                });
                true
            }
            Err(e) => {
                debug!(route = %route.id(), error = %e, "response capture failed");
                false
            }
        }
    }

    fn capture(
        &self,
        route: &EnrichedRoute,
        body: &BodySchema,
        token: Option<&str>,
    ) -> anyhow::Result<TransportResponse> {
        let method = route.route.method.clone();
        if !REPLAYED_METHODS.contains(&method) {
            return Err(anyhow!("method {method} is not replayed"));
        }
        let url = capture_url(&self.base_for_capture(), &route.route.uri)?;
        let payload = (method != Method::GET).then(|| match body {
            BodySchema::Raw(tree) => tree.clone(),
            _ => Value::Array(Vec::new()),
        });

        self.transport.send(&CaptureRequest {
            method,
            url,
            body: payload,
            token: token.map(str::to_string),
            timeout: self.settings.timeout,
        })
    }

    fn base_for_capture(&self) -> String {
        if let Some(base) = self.settings.capture_base_url.as_deref().filter(|b| !b.is_empty()) {
            return base.to_string();
        }
        let base = self.settings.base_url.as_str();
        if base.is_empty() || base.contains("{{") {
            FALLBACK_CAPTURE_URL.to_string()
        } else {
            base.to_string()
        }
    }
}

/// Join base and URI, replacing every path parameter with `1`.
pub fn capture_url(base: &str, uri: &str) -> anyhow::Result<url::Url> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), uri.trim_start_matches('/'));
    let joined = URI_PARAM.replace_all(&joined, "1");
    url::Url::parse(&joined).with_context(|| format!("invalid capture URL '{joined}'"))
}

/// Cut `body` to `max_bytes` and append [`TRUNCATION_MARKER`].
///
/// UTF-8 bodies are cut on a character boundary.
pub fn truncate_body(mut body: Vec<u8>, max_bytes: usize) -> Vec<u8> {
    if body.len() <= max_bytes {
        return body;
    }
    let cut = match std::str::from_utf8(&body) {
        Ok(text) => {
            let mut cut = max_bytes;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            cut
        }
        Err(_) => max_bytes,
    };
    body.truncate(cut);
    body.extend_from_slice(TRUNCATION_MARKER.as_bytes());
    body
}

/// Reason phrase for the handful of codes the collection labels.
pub fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
