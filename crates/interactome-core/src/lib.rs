//! interactome-core: Shared types, payload schema, and configuration for
//! interaction network construction.
//!
//! - Nodes, edges, databases and node collections of the curated graph
//! - `NetworkRequest`, its construction mode, status, log and selection
//! - Seed and literal-edge descriptors carried in request payloads
//! - Layered configuration (file + environment)

pub mod config;
pub mod error;
pub mod payload;
pub mod types;

pub use error::CoreError;
pub use types::*;
