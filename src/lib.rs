//! # postman-gen
//!
//! **postman-gen** builds an importable [Postman v2.1](https://schema.getpostman.com/json/collection/v2.1.0/collection.json)
//! collection from an application's registered HTTP routes and the validation
//! rules attached to its request classes, so the collection never has to be
//! maintained by hand.
//!
//! ## Architecture
//!
//! - **[`framework`]** - Collaborator traits for the route table, reflection and
//!   rule evaluation, plus the YAML/JSON route [`framework::manifest`]
//! - **[`routes`]** - Route collection and filtering
//! - **[`metadata`]** - Display name, description, folder, auth and rule source per route
//! - **[`body`]** - Example request bodies from validation rules
//! - **[`collection`]** - Document model, assembly, live response capture and serialization
//! - **[`generator`]** - Runs the stages in order and writes the result
//! - **[`config`]** - `postman-generator.toml` and environment overrides
//! - **[`cli`]** - The `postman-gen` command
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(postman-gen)
//!     participant Manifest as framework::manifest
//!     participant Scanner as routes::RouteScanner
//!     participant Meta as metadata::MetadataExtractor
//!     participant Body as body::BodyExampleGenerator
//!     participant Builder as collection::CollectionBuilder
//!     participant Capture as collection::ResponseCapture
//!     participant FS as File System
//!
//!     CLI->>Manifest: load_manifest("routes.yaml")
//!     CLI->>Scanner: scan(route table)
//!     Scanner-->>CLI: Vec<RouteDescriptor>
//!     loop every route
//!         CLI->>Meta: extract(route)
//!         Meta-->>CLI: EnrichedRoute
//!         CLI->>Body: generate(enriched)
//!         Body-->>CLI: BodySchema
//!     end
//!     CLI->>Builder: build(prepared routes)
//!     opt generate_responses in local/testing
//!         CLI->>Capture: attach(item, route, body)
//!     end
//!     CLI->>FS: serialize_collection + write
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use postman_gen::config::GeneratorConfig;
//! use postman_gen::framework::manifest::load_manifest;
//! use postman_gen::generator::{write_collection, Generator};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let manifest = load_manifest(Path::new("routes.yaml"))?;
//! let config = GeneratorConfig::default();
//! if let Some(generation) = Generator::from_config(&config)?.generate(&manifest) {
//!     write_collection(&config.output_path, &generation.collection)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod framework;
pub mod generator;
pub mod logging;
pub mod metadata;
pub mod routes;

pub use error::SerializeError;
