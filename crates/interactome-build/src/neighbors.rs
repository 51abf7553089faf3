//! One-hop ego network around the seeds.

use std::collections::BTreeSet;

use interactome_core::NetworkSelection;

use crate::error::{BuildError, EmptyKind, Result};
use crate::graph::IndexedGraph;

/// Keep every edge with a seed at either end.
///
/// Fails with `NoEdgesAfterConstruction` when no edge touches a seed.
pub fn build_neighbors(graph: &IndexedGraph, seeds: &BTreeSet<usize>) -> Result<NetworkSelection> {
    let edges: BTreeSet<usize> = seeds
        .iter()
        .flat_map(|&s| graph.outgoing[s].iter().chain(&graph.incoming[s]))
        .copied()
        .collect();

    if edges.is_empty() {
        return Err(BuildError::EmptyResult(EmptyKind::NoEdgesAfterConstruction));
    }

    tracing::debug!(seeds = seeds.len(), edges = edges.len(), "Collected seed neighborhood");
    Ok(graph.select(edges, seeds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::graph;
    use interactome_core::{NodeId, NodeRole};

    #[test]
    fn test_minimal_neighborhood() {
        let g = graph(&[("a", "b"), ("c", "d")], &[]);
        let seeds = g.indices_of([&NodeId::from("a")]);

        let selection = build_neighbors(&g, &seeds).unwrap();

        assert_eq!(selection.edges.len(), 1);
        assert_eq!(selection.edges[0].source, NodeId::from("a"));
        assert_eq!(selection.edges[0].target, NodeId::from("b"));
        assert_eq!(selection.nodes.len(), 2);
        assert_eq!(selection.role_of(&NodeId::from("a")), Some(NodeRole::Seed));
        assert_eq!(selection.role_of(&NodeId::from("b")), Some(NodeRole::None));
        assert_eq!(selection.role_of(&NodeId::from("c")), None);
    }

    #[test]
    fn test_seed_as_target_is_matched() {
        let g = graph(&[("x", "a"), ("a", "y"), ("x", "y")], &[]);
        let seeds = g.indices_of([&NodeId::from("a")]);

        let selection = build_neighbors(&g, &seeds).unwrap();
        let ids: Vec<_> = selection.edges.iter().map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a->y", "x->a"]);
    }

    #[test]
    fn test_edge_between_seeds_kept_once() {
        let g = graph(&[("a", "b")], &[]);
        let seeds = g.indices_of([&NodeId::from("a"), &NodeId::from("b")]);

        let selection = build_neighbors(&g, &seeds).unwrap();
        assert_eq!(selection.edges.len(), 1);
        assert!(selection.nodes.iter().all(|n| n.role == NodeRole::Seed));
    }

    #[test]
    fn test_isolated_seed_is_empty_result() {
        let g = graph(&[("c", "d")], &["a"]);
        let seeds = g.indices_of([&NodeId::from("a")]);

        let err = build_neighbors(&g, &seeds).unwrap_err();
        assert!(matches!(
            err,
            BuildError::EmptyResult(EmptyKind::NoEdgesAfterConstruction)
        ));
    }
}
