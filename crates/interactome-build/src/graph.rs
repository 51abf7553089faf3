//! In-memory graph representation for network construction.
//!
//! Nodes and edges fetched from a `GraphSource` are copied into dense
//! vectors once. Edges are indexed by source and by target node so that the
//! layering and pruning passes never rescan the full edge list.

use std::collections::{BTreeSet, HashMap};

use interactome_core::{
    Edge, EdgeId, NetworkSelection, Node, NodeId, NodeRole, SelectedEdge, SelectedNode,
};

/// Compact node metadata.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: NodeId,
    pub name: String,
}

/// Compact edge metadata. Endpoints are dense node indices.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: usize,
    pub target: usize,
}

pub struct IndexedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Map from node ID to dense index.
    pub node_index: HashMap<NodeId, usize>,
    /// `outgoing[i]` = indices of edges whose source is node `i`.
    pub outgoing: Vec<Vec<usize>>,
    /// `incoming[i]` = indices of edges whose target is node `i`.
    pub incoming: Vec<Vec<usize>>,
}

impl IndexedGraph {
    /// Build from fetched nodes and edges.
    ///
    /// Edges with an endpoint outside `nodes` are skipped, as are repeated
    /// node or edge ids after their first occurrence.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut node_index = HashMap::with_capacity(nodes.len());
        let mut graph_nodes = Vec::with_capacity(nodes.len());

        for node in nodes {
            if node_index.contains_key(&node.id) {
                continue;
            }
            node_index.insert(node.id.clone(), graph_nodes.len());
            graph_nodes.push(GraphNode {
                id: node.id,
                name: node.name,
            });
        }

        let mut outgoing = vec![Vec::new(); graph_nodes.len()];
        let mut incoming = vec![Vec::new(); graph_nodes.len()];
        let mut graph_edges = Vec::with_capacity(edges.len());
        let mut seen_edges = BTreeSet::new();

        for edge in edges {
            let (Some(&source), Some(&target)) =
                (node_index.get(&edge.source), node_index.get(&edge.target))
            else {
                tracing::debug!(edge_id = %edge.id, "Skipping edge with unknown endpoint");
                continue;
            };
            if !seen_edges.insert(edge.id.clone()) {
                continue;
            }
            let index = graph_edges.len();
            outgoing[source].push(index);
            incoming[target].push(index);
            graph_edges.push(GraphEdge {
                id: edge.id,
                source,
                target,
            });
        }

        Self {
            nodes: graph_nodes,
            edges: graph_edges,
            node_index,
            outgoing,
            incoming,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    /// Dense indices of the given ids; unknown ids are ignored.
    pub fn indices_of<'a>(&self, ids: impl IntoIterator<Item = &'a NodeId>) -> BTreeSet<usize> {
        ids.into_iter().filter_map(|id| self.index_of(id)).collect()
    }

    /// Materialize a selection from edge indices.
    ///
    /// Nodes are the endpoints of the given edges. A node in `seeds` is tagged
    /// `Seed` even when it also appears as an ordinary endpoint.
    pub fn select(
        &self,
        edges: impl IntoIterator<Item = usize>,
        seeds: &BTreeSet<usize>,
    ) -> NetworkSelection {
        let edges: BTreeSet<usize> = edges.into_iter().collect();
        let endpoints: BTreeSet<usize> = edges
            .iter()
            .flat_map(|&e| [self.edges[e].source, self.edges[e].target])
            .collect();

        let nodes = endpoints
            .into_iter()
            .map(|i| SelectedNode {
                id: self.nodes[i].id.clone(),
                name: self.nodes[i].name.clone(),
                role: if seeds.contains(&i) {
                    NodeRole::Seed
                } else {
                    NodeRole::None
                },
            })
            .collect();

        let edges = edges
            .into_iter()
            .map(|e| {
                let edge = &self.edges[e];
                SelectedEdge {
                    id: edge.id.clone(),
                    source: self.nodes[edge.source].id.clone(),
                    target: self.nodes[edge.target].id.clone(),
                    fields: Default::default(),
                }
            })
            .collect();

        NetworkSelection::new(nodes, edges)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    pub(crate) fn node(id: &str) -> Node {
        Node {
            id: NodeId::from(id),
            name: id.to_uppercase(),
            databases: BTreeSet::new(),
            fields: vec![],
        }
    }

    pub(crate) fn edge(source: &str, target: &str) -> Edge {
        Edge {
            id: EdgeId(format!("{source}->{target}")),
            source: NodeId::from(source),
            target: NodeId::from(target),
            databases: BTreeSet::new(),
        }
    }

    /// Graph over the given edges; nodes are every endpoint plus `extra`.
    pub(crate) fn graph(edges: &[(&str, &str)], extra: &[&str]) -> IndexedGraph {
        let mut names: BTreeSet<&str> = extra.iter().copied().collect();
        for &(s, t) in edges {
            names.insert(s);
            names.insert(t);
        }
        IndexedGraph::from_parts(
            names.into_iter().map(node).collect(),
            edges.iter().map(|&(s, t)| edge(s, t)).collect(),
        )
    }

    #[test]
    fn test_from_parts_indexes_both_directions() {
        let g = graph(&[("a", "b"), ("b", "c"), ("a", "c")], &[]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);

        let a = g.index_of(&NodeId::from("a")).unwrap();
        let c = g.index_of(&NodeId::from("c")).unwrap();
        assert_eq!(g.outgoing[a].len(), 2);
        assert_eq!(g.incoming[c].len(), 2);
    }

    #[test]
    fn test_dangling_and_duplicate_edges_skipped() {
        let g = IndexedGraph::from_parts(
            vec![node("a"), node("b"), node("a")],
            vec![edge("a", "b"), edge("a", "b"), edge("a", "missing")],
        );
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_select_seed_role_takes_precedence() {
        let g = graph(&[("a", "b"), ("b", "a")], &[]);
        let seeds = g.indices_of([&NodeId::from("a")]);
        let selection = g.select(0..g.edge_count(), &seeds);

        assert_eq!(selection.nodes.len(), 2);
        assert_eq!(selection.edges.len(), 2);
        assert_eq!(selection.role_of(&NodeId::from("a")), Some(NodeRole::Seed));
        assert_eq!(selection.role_of(&NodeId::from("b")), Some(NodeRole::None));
        assert_eq!(selection.nodes[0].name, "A");
    }

    #[test]
    fn test_select_omits_isolated_seeds() {
        let g = graph(&[("a", "b")], &["z"]);
        let seeds = g.indices_of([&NodeId::from("z"), &NodeId::from("unknown")]);
        assert_eq!(seeds.len(), 1);

        let selection = g.select(std::iter::empty(), &seeds);
        assert!(selection.is_empty());
    }
}
