//! Error taxonomy for network construction.
//!
//! Every variant is terminal for its request: the engine turns it into an
//! `Error` status plus one log line and never retries.

use std::fmt;

use interactome_core::CoreError;
use interactome_graph::{GraphError, WriteError};
use thiserror::Error;

/// Which empty intermediate result stopped the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    NoDatabaseTypes,
    NoSeedNodes,
    NoEdges,
    NoEdgesAfterConstruction,
}

impl fmt::Display for EmptyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EmptyKind::NoDatabaseTypes => "NoDatabaseTypes",
            EmptyKind::NoSeedNodes => "NoSeedNodes",
            EmptyKind::NoEdges => "NoEdges",
            EmptyKind::NoEdgesAfterConstruction => "NoEdgesAfterConstruction",
        })
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    #[error("Data retrieval failed: {0}")]
    DataRetrieval(#[from] GraphError),

    #[error("Empty result: {0}")]
    EmptyResult(EmptyKind),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] WriteError),
}

impl BuildError {
    /// Taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::Parameter(_) => "ParameterError",
            BuildError::DataRetrieval(_) => "DataRetrievalError",
            BuildError::EmptyResult(_) => "EmptyResultError",
            BuildError::Schema(_) => "SchemaError",
            BuildError::Persistence(_) => "PersistenceError",
        }
    }
}

impl From<CoreError> for BuildError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Schema(msg) => BuildError::Schema(msg),
            other => BuildError::Schema(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
