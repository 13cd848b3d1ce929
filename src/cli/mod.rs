//! # CLI Module
//!
//! Command-line entry point for the collection generator.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! ```bash
//! postman-gen generate --manifest routes.yaml --output storage/postman/collection.json
//! ```
//!
//! Options:
//! - `--manifest <FILE>` - Route manifest exported from the application (required)
//! - `--output <PATH>` - Override `output_path` from the config
//! - `--config <FILE>` - Generator config; defaults to `postman-generator.toml` next to the manifest
//! - `--env <ENV>` - Execution environment (also read from `APP_ENV`)
//!
//! A run that matches no routes prints a warning, writes nothing and still
//! exits successfully. Otherwise a summary table is printed:
//!
//! ```text
//! +------------------------------+-------+
//! | Metric                       | Count |
//! +------------------------------+-------+
//! | Total Routes Scanned         | 12    |
//! | Endpoints with Body Examples | 5     |
//! | Endpoints without Body       | 7     |
//! +------------------------------+-------+
//! ```

mod commands;


pub use commands::{format_summary, run, run_cli, Cli, Commands};
