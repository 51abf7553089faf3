//! In-memory graph source and result writer.
//!
//! A `GraphSnapshot` is a self-contained JSON document of databases, nodes,
//! edges and collections. It applies the same visibility rules as the Neo4j
//! queries and is what the CLI `--snapshot` flag and the tests run against.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use interactome_core::{
    CollectionId, Database, DatabaseId, Edge, NetworkRequest, Node, NodeCollection, NodeId,
};

use crate::client::GraphError;
use crate::source::{GraphSource, NodeFilter, ResultWriter, WriteError};

/// Serializable point-in-time copy of a curated graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub databases: Vec<Database>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub collections: Vec<NodeCollection>,
    #[serde(skip)]
    node_index: HashMap<NodeId, usize>,
}

impl GraphSnapshot {
    pub fn new(
        databases: Vec<Database>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        collections: Vec<NodeCollection>,
    ) -> Self {
        let mut snapshot = Self {
            databases,
            nodes,
            edges,
            collections,
            node_index: HashMap::new(),
        };
        snapshot.reindex();
        snapshot
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut snapshot: Self = serde_json::from_str(&json)
            .map_err(|e| GraphError::Snapshot(format!("{}: {e}", path.display())))?;
        snapshot.reindex();

        tracing::info!(
            path = %path.display(),
            databases = snapshot.databases.len(),
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Loaded graph snapshot"
        );
        Ok(snapshot)
    }

    fn reindex(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }
}

#[async_trait]
impl GraphSource for GraphSnapshot {
    async fn databases(&self, ids: &BTreeSet<DatabaseId>) -> Result<Vec<Database>, GraphError> {
        ids.iter()
            .map(|id| {
                self.databases
                    .iter()
                    .find(|d| &d.id == id)
                    .cloned()
                    .ok_or_else(|| GraphError::NotFound {
                        kind: "Database",
                        id: id.0.clone(),
                    })
            })
            .collect()
    }

    async fn available_nodes(
        &self,
        node_databases: &BTreeSet<DatabaseId>,
    ) -> Result<Vec<Node>, GraphError> {
        Ok(self
            .nodes
            .iter()
            .filter(|n| n.in_any(node_databases))
            .cloned()
            .collect())
    }

    async fn available_edges(
        &self,
        edge_databases: &BTreeSet<DatabaseId>,
        filter: &NodeFilter,
    ) -> Result<Vec<Edge>, GraphError> {
        let visible = |id: &NodeId| self.node(id).is_some_and(|n| filter.admits(n));

        Ok(self
            .edges
            .iter()
            .filter(|e| e.in_any(edge_databases))
            .filter(|e| visible(&e.source) && visible(&e.target))
            .cloned()
            .collect())
    }

    async fn collection_members(
        &self,
        collection: &CollectionId,
    ) -> Result<Vec<NodeId>, GraphError> {
        self.collections
            .iter()
            .find(|c| &c.id == collection)
            .map(|c| c.members.iter().cloned().collect())
            .ok_or_else(|| GraphError::NotFound {
                kind: "NodeCollection",
                id: collection.0.clone(),
            })
    }
}

/// Writer that keeps committed requests in memory.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    committed: Mutex<Vec<NetworkRequest>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request committed so far, oldest first.
    pub async fn committed(&self) -> Vec<NetworkRequest> {
        self.committed.lock().await.clone()
    }
}

#[async_trait]
impl ResultWriter for MemoryWriter {
    async fn commit(&self, request: &NetworkRequest) -> Result<(), WriteError> {
        self.committed.lock().await.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interactome_core::{DatabaseType, EdgeId, Visibility};

    fn db(id: &str, db_type: &str) -> Database {
        Database {
            id: DatabaseId::from(id),
            name: id.to_uppercase(),
            db_type: DatabaseType(db_type.to_string()),
            visibility: Visibility::Public,
        }
    }

    fn node(id: &str, dbs: &[&str]) -> Node {
        Node {
            id: NodeId::from(id),
            name: id.to_string(),
            databases: dbs.iter().map(|d| DatabaseId::from(*d)).collect(),
            fields: vec![],
        }
    }

    fn edge(id: &str, source: &str, target: &str, dbs: &[&str]) -> Edge {
        Edge {
            id: EdgeId::from(id),
            source: NodeId::from(source),
            target: NodeId::from(target),
            databases: dbs.iter().map(|d| DatabaseId::from(*d)).collect(),
        }
    }

    fn ids(items: &[&str]) -> BTreeSet<DatabaseId> {
        items.iter().map(|d| DatabaseId::from(*d)).collect()
    }

    fn sample() -> GraphSnapshot {
        GraphSnapshot::new(
            vec![db("uniprot", "Protein"), db("string", "Protein")],
            vec![
                node("a", &["uniprot"]),
                node("b", &["uniprot"]),
                node("c", &["other"]),
            ],
            vec![
                edge("ab", "a", "b", &["string"]),
                edge("ac", "a", "c", &["string"]),
                edge("ba", "b", "a", &["other"]),
                edge("ax", "a", "missing", &["string"]),
            ],
            vec![NodeCollection {
                id: CollectionId::from("kinases"),
                name: "Kinases".to_string(),
                members: [NodeId::from("a"), NodeId::from("c")].into_iter().collect(),
            }],
        )
    }

    #[tokio::test]
    async fn test_available_nodes_by_database() {
        let snapshot = sample();
        let nodes = snapshot.available_nodes(&ids(&["uniprot"])).await.unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[tokio::test]
    async fn test_available_edges_require_visible_endpoints() {
        let snapshot = sample();
        let filter = NodeFilter::new(ids(&["uniprot"]));
        let edges = snapshot
            .available_edges(&ids(&["string"]), &filter)
            .await
            .unwrap();

        // ac has an invisible target, ba is in the wrong database, ax dangles.
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].id, EdgeId::from("ab"));
    }

    #[tokio::test]
    async fn test_unknown_database_is_not_found() {
        let snapshot = sample();
        let err = snapshot
            .databases(&ids(&["uniprot", "nope"]))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::NotFound { kind: "Database", .. }));
    }

    #[tokio::test]
    async fn test_collection_members() {
        let snapshot = sample();
        let members = snapshot
            .collection_members(&CollectionId::from("kinases"))
            .await
            .unwrap();
        assert_eq!(members, vec![NodeId::from("a"), NodeId::from("c")]);

        assert!(snapshot
            .collection_members(&CollectionId::from("phosphatases"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();

        let loaded = GraphSnapshot::from_path(&path).unwrap();
        assert_eq!(loaded.nodes.len(), 3);
        // Index is rebuilt after deserialization.
        let filter = NodeFilter::new(ids(&["uniprot"]));
        let edges = loaded.available_edges(&ids(&["string"]), &filter).await.unwrap();
        assert_eq!(edges.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_snapshot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        std::fs::write(&path, "{\"nodes\": 5}").unwrap();
        assert!(matches!(
            GraphSnapshot::from_path(&path),
            Err(GraphError::Snapshot(_))
        ));
    }
}
