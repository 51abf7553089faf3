//! Seed-anchored chains with bounded forwarding hops.
//!
//! Two passes over the source-indexed edge list:
//!
//! 1. **Forward layering.** `terminal(0)` is the seed set. Layer `h` holds
//!    every edge whose source is in `terminal(h)`, and `terminal(h + 1)` is
//!    the set of targets of layer `h`. This yields `gap + 1` layers.
//! 2. **Backward pruning.** Starting from the last layer with `keep` = seeds,
//!    drop edges whose target is not in `keep`, then set `keep` to the
//!    sources of the surviving edges plus the seeds and move one layer down.
//!
//! An edge survives only if it was forward-reachable from a seed and its
//! target leads back, through surviving edges, to a seed.

use std::collections::BTreeSet;

use interactome_core::NetworkSelection;

use crate::error::{BuildError, EmptyKind, Result};
use crate::graph::IndexedGraph;
use crate::types::LayerStats;

/// Edge indices discovered at one hop distance.
pub type Layer = BTreeSet<usize>;

/// Result of a Gap-mode build.
#[derive(Debug, Clone)]
pub struct GapNetwork {
    pub selection: NetworkSelection,
    pub layers: Vec<LayerStats>,
}

/// Forward pass: `gap + 1` layers, the first rooted at the seeds.
pub fn forward_layers(graph: &IndexedGraph, seeds: &BTreeSet<usize>, gap: usize) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(gap + 1);
    let mut terminal = seeds.clone();

    for hop in 0..=gap {
        let layer: Layer = terminal
            .iter()
            .flat_map(|&n| graph.outgoing[n].iter().copied())
            .collect();
        terminal = layer.iter().map(|&e| graph.edges[e].target).collect();

        tracing::debug!(hop, edges = layer.len(), frontier = terminal.len(), "Forward layer");
        layers.push(layer);
    }

    layers
}

/// Backward pass over the forward layers, last layer first.
///
/// Returns the pruned layers in forward order.
pub fn prune_backward(
    graph: &IndexedGraph,
    layers: &[Layer],
    seeds: &BTreeSet<usize>,
) -> Vec<Layer> {
    let mut pruned = vec![Layer::new(); layers.len()];
    let mut keep = seeds.clone();

    for (hop, layer) in layers.iter().enumerate().rev() {
        let retained: Layer = layer
            .iter()
            .copied()
            .filter(|&e| keep.contains(&graph.edges[e].target))
            .collect();

        keep = retained
            .iter()
            .map(|&e| graph.edges[e].source)
            .chain(seeds.iter().copied())
            .collect();

        tracing::debug!(
            hop,
            discovered = layer.len(),
            retained = retained.len(),
            "Pruned layer"
        );
        pruned[hop] = retained;
    }

    pruned
}

/// Union of all layers.
pub fn flatten(layers: &[Layer]) -> BTreeSet<usize> {
    layers.iter().flatten().copied().collect()
}

pub fn layer_stats(forward: &[Layer], pruned: &[Layer]) -> Vec<LayerStats> {
    forward
        .iter()
        .zip(pruned)
        .enumerate()
        .map(|(hop, (f, p))| LayerStats {
            hop,
            discovered: f.len(),
            retained: p.len(),
        })
        .collect()
}

/// Prune forward layers and materialize the surviving network.
///
/// Fails with `NoEdgesAfterConstruction` when pruning leaves nothing.
pub fn assemble(
    graph: &IndexedGraph,
    seeds: &BTreeSet<usize>,
    forward: &[Layer],
) -> Result<GapNetwork> {
    let pruned = prune_backward(graph, forward, seeds);
    let edges = flatten(&pruned);
    if edges.is_empty() {
        return Err(BuildError::EmptyResult(EmptyKind::NoEdgesAfterConstruction));
    }

    Ok(GapNetwork {
        selection: graph.select(edges, seeds),
        layers: layer_stats(forward, &pruned),
    })
}

/// Full Gap-mode build: forward layering followed by backward pruning.
pub fn build_gap(graph: &IndexedGraph, seeds: &BTreeSet<usize>, gap: usize) -> Result<GapNetwork> {
    let forward = forward_layers(graph, seeds, gap);
    assemble(graph, seeds, &forward)
}
