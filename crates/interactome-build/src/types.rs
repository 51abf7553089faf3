//! Outcome and statistics types for network construction.

use std::fmt;

use serde::{Deserialize, Serialize};

use interactome_core::{ConstructionMode, DatabaseType, RequestId};

use crate::error::BuildError;

/// Pipeline stage; cancellation is checked between stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Validation,
    Fetch,
    SeedResolution,
    Layering,
    Pruning,
    Persistence,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Validation => "validation",
            Phase::Fetch => "fetch",
            Phase::SeedResolution => "seed_resolution",
            Phase::Layering => "layering",
            Phase::Pruning => "pruning",
            Phase::Persistence => "persistence",
        })
    }
}

/// Edge counts for one Gap-mode layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerStats {
    pub hop: usize,
    /// Edges found by the forward pass.
    pub discovered: usize,
    /// Edges left after backward pruning.
    pub retained: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildStats {
    pub available_nodes: usize,
    pub available_edges: usize,
    pub seed_count: usize,
    /// Gap mode only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerStats>,
    /// None mode: duplicate literal pairs folded into an earlier edge.
    pub merged_pairs: usize,
    /// None mode: literal descriptors missing a Source or Target.
    pub dropped_pairs: usize,
    pub selected_nodes: usize,
    pub selected_edges: usize,
    pub computation_ms: u64,
    /// BLAKE3 fingerprint of the selection.
    pub fingerprint: String,
}

/// Summary of a successful build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildReport {
    pub request_id: RequestId,
    pub mode: ConstructionMode,
    pub database_type: DatabaseType,
    pub stats: BuildStats,
}

/// What happened to a request.
#[derive(Debug)]
pub enum RunOutcome {
    /// Selection set, status `Ready`, writer committed.
    Ready(BuildReport),
    /// Status `Error` with one log line; nothing persisted.
    Failed(BuildError),
    /// Stopped before the given phase; request untouched.
    Cancelled(Phase),
}

impl RunOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, RunOutcome::Ready(_))
    }

    pub fn report(&self) -> Option<&BuildReport> {
        match self {
            RunOutcome::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&BuildError> {
        match self {
            RunOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}
