//! # Generator Module
//!
//! Runs the four stages in order: scan the route table, enrich each route,
//! generate its example body, then assemble the collection and optionally
//! capture live responses.
//!
//! Routes, bodies and request items stay correlated by position. Each request
//! item carries the index of its [`PreparedRoute`], so two routes that share
//! a URI or id never overwrite each other's body.

use crate::body::BodyExampleGenerator;
use crate::collection::{
    serialize_collection, CaptureSettings, Collection, CollectionBuilder, HttpTransport,
    PreparedRoute, ReqwestTransport, ResponseCapture,
};
use crate::config::GeneratorConfig;
use crate::framework::Framework;
use crate::metadata::{AuthDetector, FormRequestResolver, MetadataExtractor};
use crate::routes::RouteScanner;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, debug_span, info};

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_routes: usize,
    pub with_body: usize,
    pub captured: usize,
}

impl Summary {
    pub fn without_body(&self) -> usize {
        self.total_routes - self.with_body
    }

    /// Metric label and count, in display order.
    pub fn rows(&self) -> [(&'static str, usize); 3] {
        [
            ("Total Routes Scanned", self.total_routes),
            ("Endpoints with Body Examples", self.with_body),
            ("Endpoints without Body", self.without_body()),
        ]
    }
}

/// The result of a run that found routes.
#[derive(Debug)]
pub struct Generation {
    pub collection: Collection,
    pub routes: Vec<PreparedRoute>,
    pub summary: Summary,
}

/// Configured pipeline.
pub struct Generator {
    scanner: RouteScanner,
    extractor: MetadataExtractor,
    bodies: BodyExampleGenerator,
    builder: CollectionBuilder,
    capture_settings: CaptureSettings,
    capture: Option<ResponseCapture>,
}

impl Generator {
    /// Build the pipeline. The HTTP client is only created when capture is
    /// allowed to run.
    pub fn from_config(config: &GeneratorConfig) -> anyhow::Result<Self> {
        let mut generator = Self::without_transport(config);
        generator.capture_settings.announce();
        if generator.capture_settings.is_allowed() {
            generator = generator.with_transport(Box::new(ReqwestTransport::new()?));
        }
        Ok(generator)
    }

    /// Pipeline without live capture.
    pub fn without_transport(config: &GeneratorConfig) -> Self {
        Generator {
            scanner: RouteScanner::new(
                &config.route_groups,
                &config.exclude_routes,
                &config.exclude_middlewares,
            ),
            extractor: MetadataExtractor::new(
                &config.route_groups,
                AuthDetector::new(&config.auth_middlewares),
                FormRequestResolver::new(&config.form_request_base),
            ),
            bodies: BodyExampleGenerator::new(config.auto_examples),
            builder: CollectionBuilder::new(
                &config.collection_name,
                &config.base_url,
                config.include_tenant_id,
            ),
            capture_settings: config.capture_settings(),
            capture: None,
        }
    }

    /// Capture responses through `transport`. Environment and token guards
    /// from the configuration still apply.
    pub fn with_transport(mut self, transport: Box<dyn HttpTransport>) -> Self {
        self.capture = Some(ResponseCapture::new(self.capture_settings.clone(), transport));
        self
    }

    /// Scan, enrich and generate bodies.
    pub fn prepare<F: Framework>(&self, framework: &F) -> Vec<PreparedRoute> {
        self.scanner
            .scan(framework, framework)
            .into_iter()
            .map(|descriptor| {
                let route = self.extractor.extract(framework, descriptor);
                let _span = debug_span!("route", id = %route.id()).entered();
                let body = self.bodies.generate(&route, framework);
                debug!(
                    name = %route.name,
                    folder = %route.folder,
                    auth = %route.auth,
                    "prepared route"
                );
                PreparedRoute { route, body }
            })
            .collect()
    }

    /// Run every stage. `None` when no route matched the configuration.
    pub fn generate<F: Framework>(&self, framework: &F) -> Option<Generation> {
        info!("Scanning routes...");
        let routes = self.prepare(framework);
        if routes.is_empty() {
            return None;
        }

        info!(count = routes.len(), "Building collection...");
        let mut collection = self.builder.build(&routes);

        let mut captured = 0;
        if let Some(capture) = &self.capture {
            for item in collection.requests_mut() {
                let prepared = &routes[item.route_index];
                if capture.attach(item, &prepared.route, &prepared.body) {
                    captured += 1;
                }
            }
        }

        let summary = Summary {
            total_routes: routes.len(),
            with_body: routes.iter().filter(|r| r.body.has_example()).count(),
            captured,
        };
        Some(Generation {
            collection,
            routes,
            summary,
        })
    }
}

/// Serialize and write the collection, creating parent directories.
///
/// Serialization happens first so a failure leaves no file behind.
pub fn write_collection(path: &Path, collection: &Collection) -> anyhow::Result<()> {
    let json = serialize_collection(collection)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, json)
        .with_context(|| format!("Failed to write collection: {}", path.display()))?;
    Ok(())
}
