//! Persisting finished network requests to Neo4j.
//!
//! A request is written as `(:NetworkRequest)` with `(:SelectedNode)` and
//! `(:SelectedEdge)` children in a single transaction. The curated graph
//! (`:Node`, `:Edge`, `:Database`) is never modified.

use async_trait::async_trait;
use neo4rs::query;

use interactome_core::{NetworkRequest, NodeRole, RequestStatus};

use crate::client::{GraphClient, GraphError};
use crate::source::{ResultWriter, WriteError};

impl GraphClient {
    /// Replace the stored status, log and selection of a request.
    pub async fn store_request(&self, request: &NetworkRequest) -> Result<(), GraphError> {
        let request_id = request.id.to_string();
        let log: Vec<String> = request
            .log
            .iter()
            .map(|entry| format!("{} {}", entry.at.to_rfc3339(), entry.message))
            .collect();

        let mut txn = self.start_txn().await?;

        txn.run(
            query(
                "MERGE (r:NetworkRequest {id: $id})
                 SET r.status = $status, r.mode = $mode, r.log = $log
                 WITH r
                 OPTIONAL MATCH (r)-[:SELECTS]->(old)
                 DETACH DELETE old",
            )
            .param("id", request_id.clone())
            .param("status", status_str(request.status))
            .param("mode", request.mode.to_string())
            .param("log", log),
        )
        .await?;

        if let Some(selection) = &request.selection {
            let ids: Vec<String> = selection.nodes.iter().map(|n| n.id.0.clone()).collect();
            let names: Vec<String> = selection.nodes.iter().map(|n| n.name.clone()).collect();
            let roles: Vec<String> = selection
                .nodes
                .iter()
                .map(|n| role_str(n.role).to_string())
                .collect();

            txn.run(
                query(
                    "MATCH (r:NetworkRequest {id: $id})
                     UNWIND range(0, size($ids) - 1) AS i
                     CREATE (r)-[:SELECTS]->(:SelectedNode {
                       node_id: $ids[i], name: $names[i], role: $roles[i]
                     })",
                )
                .param("id", request_id.clone())
                .param("ids", ids)
                .param("names", names)
                .param("roles", roles),
            )
            .await?;

            let edge_ids: Vec<String> = selection.edges.iter().map(|e| e.id.0.clone()).collect();
            let sources: Vec<String> = selection.edges.iter().map(|e| e.source.0.clone()).collect();
            let targets: Vec<String> = selection.edges.iter().map(|e| e.target.0.clone()).collect();
            let fields: Vec<String> = selection
                .edges
                .iter()
                .map(|e| serde_json::to_string(&e.fields))
                .collect::<Result<_, _>>()
                .map_err(|e| GraphError::Serialization(e.to_string()))?;

            txn.run(
                query(
                    "MATCH (r:NetworkRequest {id: $id})
                     UNWIND range(0, size($ids) - 1) AS i
                     CREATE (r)-[:SELECTS]->(:SelectedEdge {
                       edge_id: $ids[i], source: $sources[i], target: $targets[i],
                       fields: $fields[i]
                     })",
                )
                .param("id", request_id.clone())
                .param("ids", edge_ids)
                .param("sources", sources)
                .param("targets", targets)
                .param("fields", fields),
            )
            .await?;
        }

        txn.commit().await?;

        tracing::info!(request_id = %request_id, status = ?request.status, "Request stored");
        Ok(())
    }
}

#[async_trait]
impl ResultWriter for GraphClient {
    async fn commit(&self, request: &NetworkRequest) -> Result<(), WriteError> {
        self.store_request(request)
            .await
            .map_err(|e| WriteError::new("neo4j", e.to_string()))
    }
}

fn status_str(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "pending",
        RequestStatus::Ready => "ready",
        RequestStatus::Error => "error",
    }
}

fn role_str(role: NodeRole) -> &'static str {
    match role {
        NodeRole::Seed => "Seed",
        NodeRole::None => "None",
    }
}
