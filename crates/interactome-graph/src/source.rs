//! Collaborator traits consumed by the network builder.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use interactome_core::{CollectionId, Database, DatabaseId, Edge, NetworkRequest, Node, NodeId};

use crate::client::GraphError;

/// Restricts edges to those whose endpoints are both visible.
///
/// A node is visible when it belongs to at least one of the request's node
/// databases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFilter {
    pub databases: BTreeSet<DatabaseId>,
}

impl NodeFilter {
    pub fn new(databases: BTreeSet<DatabaseId>) -> Self {
        Self { databases }
    }

    pub fn admits(&self, node: &Node) -> bool {
        node.in_any(&self.databases)
    }
}

/// Read-only view of the curated graph.
///
/// Implementations must not mutate anything; several requests may read the
/// same source concurrently.
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Metadata for the given databases. Unknown ids are an error.
    async fn databases(&self, ids: &BTreeSet<DatabaseId>) -> Result<Vec<Database>, GraphError>;

    /// Nodes belonging to any of the given databases.
    async fn available_nodes(
        &self,
        node_databases: &BTreeSet<DatabaseId>,
    ) -> Result<Vec<Node>, GraphError>;

    /// Edges belonging to any of `edge_databases` whose endpoints both pass `filter`.
    async fn available_edges(
        &self,
        edge_databases: &BTreeSet<DatabaseId>,
        filter: &NodeFilter,
    ) -> Result<Vec<Edge>, GraphError>;

    /// Member node ids of a collection. Unknown collections are an error.
    async fn collection_members(&self, collection: &CollectionId)
        -> Result<Vec<NodeId>, GraphError>;
}

/// A failed persistence attempt.
#[derive(Debug, thiserror::Error)]
#[error("{backend} write failed: {message}")]
pub struct WriteError {
    pub backend: &'static str,
    pub message: String,
}

impl WriteError {
    pub fn new(backend: &'static str, message: impl Into<String>) -> Self {
        Self {
            backend,
            message: message.into(),
        }
    }
}

/// Persists a finished request in one all-or-nothing write.
#[async_trait]
pub trait ResultWriter: Send + Sync {
    /// Store the request's status, log and selection together.
    async fn commit(&self, request: &NetworkRequest) -> Result<(), WriteError>;
}

#[async_trait]
impl<T: GraphSource + ?Sized> GraphSource for Arc<T> {
    async fn databases(&self, ids: &BTreeSet<DatabaseId>) -> Result<Vec<Database>, GraphError> {
        (**self).databases(ids).await
    }

    async fn available_nodes(
        &self,
        node_databases: &BTreeSet<DatabaseId>,
    ) -> Result<Vec<Node>, GraphError> {
        (**self).available_nodes(node_databases).await
    }

    async fn available_edges(
        &self,
        edge_databases: &BTreeSet<DatabaseId>,
        filter: &NodeFilter,
    ) -> Result<Vec<Edge>, GraphError> {
        (**self).available_edges(edge_databases, filter).await
    }

    async fn collection_members(
        &self,
        collection: &CollectionId,
    ) -> Result<Vec<NodeId>, GraphError> {
        (**self).collection_members(collection).await
    }
}

#[async_trait]
impl<T: ResultWriter + ?Sized> ResultWriter for Arc<T> {
    async fn commit(&self, request: &NetworkRequest) -> Result<(), WriteError> {
        (**self).commit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_admits_by_membership() {
        let filter = NodeFilter::new([DatabaseId::from("string")].into_iter().collect());
        let visible = Node {
            id: NodeId::from("a"),
            name: "A".to_string(),
            databases: [DatabaseId::from("string"), DatabaseId::from("biogrid")]
                .into_iter()
                .collect(),
            fields: vec![],
        };
        let hidden = Node {
            id: NodeId::from("b"),
            name: "B".to_string(),
            databases: [DatabaseId::from("biogrid")].into_iter().collect(),
            fields: vec![],
        };

        assert!(filter.admits(&visible));
        assert!(!filter.admits(&hidden));
    }
}
