//! Literal networks supplied by the user (None mode).
//!
//! There is no curated graph to look up: every distinct name in the payload
//! becomes a fresh node and every usable pair becomes an edge. Ids are UUIDv5
//! values derived from the request id, so rebuilding the same request mints
//! the same ids.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use uuid::Uuid;

use interactome_core::payload::EdgeDescriptor;
use interactome_core::{
    EdgeId, EndpointRole, NetworkSelection, NodeId, NodeRole, RequestId, SelectedEdge,
    SelectedNode,
};

use crate::error::{BuildError, EmptyKind, Result};

#[derive(Debug, Clone)]
pub struct LiteralNetwork {
    pub selection: NetworkSelection,
    /// Pairs repeating an earlier (source, target) pair.
    pub merged_pairs: usize,
    /// Descriptors without both a Source and a Target endpoint.
    pub dropped_pairs: usize,
}

fn node_id(request: RequestId, name: &str) -> NodeId {
    NodeId(Uuid::new_v5(&request.0, name.as_bytes()).to_string())
}

fn edge_id(request: RequestId, source: &str, target: &str) -> EdgeId {
    // Length prefix keeps ("ab", "c") and ("a", "bc") apart.
    let key = format!("{}:{source}{target}", source.len());
    EdgeId(Uuid::new_v5(&request.0, key.as_bytes()).to_string())
}

/// Mint nodes and edges for a literal edge list.
///
/// Duplicate (source, target) pairs are merged into the first occurrence,
/// which also supplies the edge's fields. All nodes are tagged `None`.
pub fn build_literal(request: RequestId, descriptors: &[EdgeDescriptor]) -> Result<LiteralNetwork> {
    if descriptors.is_empty() {
        return Err(BuildError::EmptyResult(EmptyKind::NoEdges));
    }

    let names: BTreeSet<&str> = descriptors.iter().flat_map(|d| d.names()).collect();
    let minted: HashMap<&str, NodeId> = names
        .iter()
        .map(|&name| (name, node_id(request, name)))
        .collect();

    let mut pairs: BTreeMap<(&str, &str), &BTreeMap<String, String>> = BTreeMap::new();
    let mut merged_pairs = 0;
    let mut dropped_pairs = 0;

    for descriptor in descriptors {
        let (Some(source), Some(target)) = (
            descriptor.endpoint(EndpointRole::Source),
            descriptor.endpoint(EndpointRole::Target),
        ) else {
            tracing::warn!(
                names = ?descriptor.names().collect::<Vec<_>>(),
                "Dropping literal edge without both endpoints"
            );
            dropped_pairs += 1;
            continue;
        };

        if pairs.contains_key(&(source, target)) {
            tracing::debug!(source, target, "Merging duplicate literal edge");
            merged_pairs += 1;
        } else {
            pairs.insert((source, target), &descriptor.edge.fields);
        }
    }

    if pairs.is_empty() {
        return Err(BuildError::EmptyResult(EmptyKind::NoEdgesAfterConstruction));
    }

    let nodes = names
        .iter()
        .map(|&name| SelectedNode {
            id: minted[name].clone(),
            name: name.to_string(),
            role: NodeRole::None,
        })
        .collect();

    let edges = pairs
        .into_iter()
        .map(|((source, target), fields)| SelectedEdge {
            id: edge_id(request, source, target),
            source: minted[source].clone(),
            target: minted[target].clone(),
            fields: fields.clone(),
        })
        .collect();

    Ok(LiteralNetwork {
        selection: NetworkSelection::new(nodes, edges),
        merged_pairs,
        dropped_pairs,
    })
}
