//! interactome-graph — read access to the curated interaction graph and the
//! write seam for finished networks.
//!
//! Network construction never touches a store directly: it reads through
//! [`GraphSource`] and persists through [`ResultWriter`]. This crate provides
//! an in-memory snapshot implementation (tests, CLI) and a Neo4j one.

pub mod client;
pub mod mutations;
pub mod queries;
pub mod snapshot;
pub mod source;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use snapshot::{GraphSnapshot, MemoryWriter};
pub use source::{GraphSource, NodeFilter, ResultWriter, WriteError};
