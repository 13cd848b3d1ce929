//! # Collection Module
//!
//! The Postman v2.1 document model, the builder that fills it from prepared
//! routes, optional live response capture, and the JSON serializer.
//!
//! ## Layout
//!
//! ```text
//! Collection
//! ├── info      { name, schema }
//! ├── item[]    Folder { name, item[] }
//! │             └── RequestItem { name, description, request, response[] }
//! └── variable[] base_url, token, tenant_id?
//! ```
//!
//! Folders appear in the order their label is first seen; requests keep scan
//! order. Each [`RequestItem`] remembers the index of the route it came from
//! so later stages can correlate without relying on ids.

mod response;
mod serializer;

pub use response::{
    capture_url, status_text, truncate_body, CaptureRequest, CaptureSettings, HttpTransport,
    ReqwestTransport, ResponseBody, ResponseCapture, ResponseExample, TransportResponse,
    TRUNCATION_MARKER,
};
pub use serializer::{serialize_collection, to_pretty_json};

use crate::body::{BodySchema, FieldKind};
use crate::metadata::{AuthType, EnrichedRoute};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;

/// Postman collection format identifier.
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Variable referenced by every request URL.
pub const BASE_URL_VAR: &str = "{{base_url}}";

static PATH_PARAM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{[^{}]*\}\}|\{(\w+)\??\}").expect("path parameter pattern is valid")
});

#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub info: Info,
    pub item: Vec<Folder>,
    pub variable: Vec<Variable>,
}

impl Collection {
    /// All request items, folder by folder.
    pub fn requests(&self) -> impl Iterator<Item = &RequestItem> {
        self.item.iter().flat_map(|f| f.item.iter())
    }

    pub fn requests_mut(&mut self) -> impl Iterator<Item = &mut RequestItem> {
        self.item.iter_mut().flat_map(|f| f.item.iter_mut())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Info {
    pub name: String,
    pub schema: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub name: String,
    pub item: Vec<RequestItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestItem {
    pub name: String,
    pub description: String,
    pub request: Request,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub response: Vec<ResponseExample>,
    /// Position of the source route in the builder input
    #[serde(skip)]
    pub route_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub header: Vec<Header>,
    pub url: RequestUrl,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Header {
    fn text(key: &str, value: &str) -> Self {
        Header {
            key: key.to_string(),
            value: value.to_string(),
            kind: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestUrl {
    pub raw: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
    pub variable: Vec<PathVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathVariable {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Auth {
    #[serde(rename = "type")]
    pub kind: AuthType,
    pub bearer: Vec<AuthParam>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthParam {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode")]
pub enum Body {
    #[serde(rename = "raw")]
    Raw { raw: String, options: RawOptions },
    #[serde(rename = "formdata")]
    FormData { formdata: Vec<FormParam> },
}

#[derive(Debug, Clone, Serialize)]
pub struct RawOptions {
    pub raw: RawLanguage,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawLanguage {
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormParam {
    pub key: String,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Variable {
    fn string(key: &str, value: &str) -> Self {
        Variable {
            key: key.to_string(),
            value: value.to_string(),
            kind: "string".to_string(),
        }
    }
}

/// An enriched route and its generated body.
#[derive(Debug, Clone)]
pub struct PreparedRoute {
    pub route: EnrichedRoute,
    pub body: BodySchema,
}

/// Assembles a [`Collection`] from prepared routes.
#[derive(Debug, Clone)]
pub struct CollectionBuilder {
    collection_name: String,
    base_url: String,
    include_tenant_id: bool,
}

impl CollectionBuilder {
    pub fn new(collection_name: &str, base_url: &str, include_tenant_id: bool) -> Self {
        CollectionBuilder {
            collection_name: collection_name.to_string(),
            base_url: base_url.to_string(),
            include_tenant_id,
        }
    }

    pub fn build(&self, routes: &[PreparedRoute]) -> Collection {
        let mut folders: Vec<Folder> = Vec::new();
        let mut folder_index: HashMap<&str, usize> = HashMap::new();
        let mut seen_names: HashMap<(&str, &str), usize> = HashMap::new();

        for (index, prepared) in routes.iter().enumerate() {
            let folder_name = prepared.route.folder.as_str();
            let count = seen_names
                .entry((folder_name, prepared.route.name.as_str()))
                .and_modify(|n| *n += 1)
                .or_insert(1);
            let name = if *count == 1 {
                prepared.route.name.clone()
            } else {
                format!("{} ({})", prepared.route.name, count)
            };

            let item = RequestItem {
                name,
                description: prepared.route.description.clone(),
                request: build_request(prepared),
                response: Vec::new(),
                route_index: index,
            };

            let slot = *folder_index.entry(folder_name).or_insert_with(|| {
                folders.push(Folder {
                    name: folder_name.to_string(),
                    item: Vec::new(),
                });
                folders.len() - 1
            });
            folders[slot].item.push(item);
        }

        let mut variable = vec![
            Variable::string("base_url", &self.base_url),
            Variable::string("token", ""),
        ];
        if self.include_tenant_id {
            variable.push(Variable::string("tenant_id", ""));
        }

        Collection {
            info: Info {
                name: self.collection_name.clone(),
                schema: SCHEMA_URL.to_string(),
            },
            item: folders,
            variable,
        }
    }
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        CollectionBuilder::new("Laravel API", BASE_URL_VAR, false)
    }
}

/// `{id}` and `{id?}` become `:id`; `{{vars}}` are left alone.
pub fn to_postman_path(uri: &str) -> String {
    PATH_PARAM
        .replace_all(uri, |caps: &Captures| match caps.get(1) {
            Some(name) => format!(":{}", name.as_str()),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn build_request(prepared: &PreparedRoute) -> Request {
    let route = &prepared.route;
    let path = to_postman_path(&route.route.uri);

    let mut header = vec![Header::text("Accept", "application/json")];
    if !matches!(prepared.body, BodySchema::FormData(_)) {
        header.push(Header::text("Content-Type", "application/json"));
    }

    let auth = (route.auth == AuthType::Bearer).then(|| Auth {
        kind: AuthType::Bearer,
        bearer: vec![AuthParam {
            key: "token".to_string(),
            value: "{{token}}".to_string(),
            kind: "string".to_string(),
        }],
    });

    Request {
        header,
        url: RequestUrl {
            raw: format!("{}/{}", BASE_URL_VAR, path.trim_start_matches('/')),
            host: vec![BASE_URL_VAR.to_string()],
            path: path.trim_matches('/').split('/').map(str::to_string).collect(),
            variable: route
                .route
                .parameter_names
                .iter()
                .map(|p| PathVariable {
                    key: p.clone(),
                    value: String::new(),
                })
                .collect(),
        },
        method: route.route.method.as_str().to_ascii_uppercase(),
        auth,
        body: build_body(&prepared.body),
    }
}

fn build_body(body: &BodySchema) -> Option<Body> {
    match body {
        BodySchema::None | BodySchema::Empty => None,
        BodySchema::Raw(tree) => Some(Body::Raw {
            raw: to_pretty_json(tree).unwrap_or_else(|_| tree.to_string()),
            options: RawOptions {
                raw: RawLanguage {
                    language: "json".to_string(),
                },
            },
        }),
        BodySchema::FormData(fields) => Some(Body::FormData {
            formdata: fields
                .iter()
                .map(|f| FormParam {
                    key: f.key.clone(),
                    value: f.value.clone(),
                    kind: f.kind,
                })
                .collect(),
        }),
    }
}
