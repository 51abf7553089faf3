//! Graph fetching through the `GraphSource` collaborator.

use interactome_core::{Edge, NetworkRequest, Node};
use interactome_graph::{GraphSource, NodeFilter};

use crate::error::Result;

/// Nodes visible under the request's node databases.
pub async fn available_nodes<S: GraphSource + ?Sized>(
    source: &S,
    request: &NetworkRequest,
) -> Result<Vec<Node>> {
    let nodes = source.available_nodes(&request.node_databases).await?;
    Ok(nodes)
}

/// Edges in the request's edge databases whose endpoints are both visible.
pub async fn available_edges<S: GraphSource + ?Sized>(
    source: &S,
    request: &NetworkRequest,
) -> Result<Vec<Edge>> {
    let filter = NodeFilter::new(request.node_databases.clone());
    let edges = source
        .available_edges(&request.edge_databases, &filter)
        .await?;
    Ok(edges)
}
