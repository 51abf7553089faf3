//! interactome-build: seed-anchored network construction.
//!
//! Validates a `NetworkRequest`, resolves its seeds against a `GraphSource`,
//! builds the subnetwork in one of three modes (literal, neighbors, gap) and
//! hands the finished request to a `ResultWriter`. Every failure ends in an
//! `Error` status with exactly one log line; nothing is written unless the
//! whole build succeeds.

pub mod cancel;
pub mod error;
pub mod fetch;
pub mod gap;
pub mod graph;
pub mod literal;
pub mod neighbors;
pub mod seeds;
pub mod types;
pub mod validate;

pub use cancel::CancelToken;
pub use error::{BuildError, EmptyKind};
pub use types::{BuildReport, BuildStats, LayerStats, Phase, RunOutcome};
pub use validate::{Plan, ValidatedRequest};

use std::collections::BTreeSet;
use std::time::Instant;

use interactome_archive::hash::fingerprint;
use interactome_core::config::BuildSettings;
use interactome_core::payload::SeedDescriptor;
use interactome_core::{NetworkRequest, NetworkSelection, RequestStatus};
use interactome_graph::{GraphSource, ResultWriter};

use crate::cancel::Interrupt;
use crate::error::Result;
use crate::graph::IndexedGraph;

/// A selection plus the statistics gathered while building it.
struct Built {
    selection: NetworkSelection,
    stats: BuildStats,
}

/// The network construction engine.
///
/// Holds read-only access to the graph and a writer for finished requests.
/// One engine may serve many requests concurrently.
pub struct NetworkEngine<S, W> {
    source: S,
    writer: W,
    settings: BuildSettings,
}

impl<S: GraphSource, W: ResultWriter> NetworkEngine<S, W> {
    pub fn new(source: S, writer: W) -> Self {
        Self {
            source,
            writer,
            settings: BuildSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: BuildSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Run the validation chain only. The request is not modified.
    pub async fn validate(&self, request: &NetworkRequest) -> Result<ValidatedRequest> {
        validate::validate(&self.source, request, &self.settings).await
    }

    /// Build the network for `request` and persist it.
    ///
    /// On success the request holds the selection with status `Ready` and has
    /// been committed. On failure it holds status `Error`, one new log entry
    /// and no selection. On cancellation it is left as it was.
    #[tracing::instrument(skip_all, fields(request_id = %request.id, mode = %request.mode))]
    pub async fn run(&self, request: &mut NetworkRequest, cancel: &CancelToken) -> RunOutcome {
        let start = Instant::now();

        let executed = self.execute(request, cancel).await;
        let (validated, built) = match executed {
            Ok(done) => done,
            Err(Interrupt::Cancelled(phase)) => return RunOutcome::Cancelled(phase),
            Err(Interrupt::Failed(e)) => return fail(request, e),
        };

        if let Err(Interrupt::Cancelled(phase)) = cancel.checkpoint(Phase::Persistence) {
            return RunOutcome::Cancelled(phase);
        }

        let mut stats = built.stats;
        stats.selected_nodes = built.selection.nodes.len();
        stats.selected_edges = built.selection.edges.len();
        stats.fingerprint = fingerprint(&built.selection);

        let mut finished = request.clone();
        finished.append_log(format!(
            "Constructed {} network: {} nodes, {} edges",
            request.mode, stats.selected_nodes, stats.selected_edges
        ));
        finished.status = RequestStatus::Ready;
        finished.selection = Some(built.selection);

        if let Err(e) = self.writer.commit(&finished).await {
            return fail(request, e.into());
        }
        *request = finished;
        stats.computation_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            nodes = stats.selected_nodes,
            edges = stats.selected_edges,
            fingerprint = %stats.fingerprint,
            computation_ms = stats.computation_ms,
            "Network ready"
        );

        RunOutcome::Ready(BuildReport {
            request_id: request.id,
            mode: request.mode,
            database_type: validated.database_type,
            stats,
        })
    }

    async fn execute(
        &self,
        request: &NetworkRequest,
        cancel: &CancelToken,
    ) -> std::result::Result<(ValidatedRequest, Built), Interrupt> {
        cancel.checkpoint(Phase::Validation)?;
        let validated = self.validate(request).await?;
        tracing::info!(database_type = %validated.database_type, "Validation passed");

        let built = match &validated.plan {
            Plan::Literal(descriptors) => {
                cancel.checkpoint(Phase::Layering)?;
                let network = literal::build_literal(request.id, descriptors)?;
                Built {
                    stats: BuildStats {
                        merged_pairs: network.merged_pairs,
                        dropped_pairs: network.dropped_pairs,
                        ..Default::default()
                    },
                    selection: network.selection,
                }
            }
            Plan::Neighbors(descriptors) => {
                let (graph, seed_set, stats) = self.prepare(request, descriptors, cancel).await?;
                cancel.checkpoint(Phase::Layering)?;
                let selection = neighbors::build_neighbors(&graph, &seed_set)?;
                Built { selection, stats }
            }
            Plan::Gap { gap, seeds: descriptors } => {
                let (graph, seed_set, mut stats) = self.prepare(request, descriptors, cancel).await?;
                cancel.checkpoint(Phase::Layering)?;
                let forward = gap::forward_layers(&graph, &seed_set, *gap);
                cancel.checkpoint(Phase::Pruning)?;
                let network = gap::assemble(&graph, &seed_set, &forward)?;
                stats.layers = network.layers;
                Built {
                    selection: network.selection,
                    stats,
                }
            }
        };

        Ok((validated, built))
    }

    /// Fetch the visible graph and resolve seeds for the curated modes.
    async fn prepare(
        &self,
        request: &NetworkRequest,
        descriptors: &[SeedDescriptor],
        cancel: &CancelToken,
    ) -> std::result::Result<(IndexedGraph, BTreeSet<usize>, BuildStats), Interrupt> {
        cancel.checkpoint(Phase::Fetch)?;
        let nodes = fetch::available_nodes(&self.source, request).await?;
        let edges = fetch::available_edges(&self.source, request).await?;
        tracing::info!(nodes = nodes.len(), edges = edges.len(), "Fetched available graph");

        cancel.checkpoint(Phase::SeedResolution)?;
        let seed_ids = seeds::resolve_seeds(&self.source, &nodes, descriptors).await?;
        if edges.is_empty() {
            return Err(BuildError::EmptyResult(EmptyKind::NoEdges).into());
        }

        let graph = IndexedGraph::from_parts(nodes, edges);
        let seed_set = graph.indices_of(&seed_ids);
        let stats = BuildStats {
            available_nodes: graph.node_count(),
            available_edges: graph.edge_count(),
            seed_count: seed_set.len(),
            ..Default::default()
        };
        Ok((graph, seed_set, stats))
    }
}

/// Terminal failure: one log line, no selection.
fn fail(request: &mut NetworkRequest, error: BuildError) -> RunOutcome {
    tracing::warn!(kind = error.kind(), error = %error, "Network construction failed");
    request.selection = None;
    request.status = RequestStatus::Error;
    request.append_log(error.to_string());
    RunOutcome::Failed(error)
}
