//! Read operations against the Neo4j-backed interaction graph.
//!
//! Schema:
//! ```text
//! (:Node {id, name})-[:IN_DATABASE]->(:Database {id, name, type, public})
//! (:Node)-[:HAS_FIELD]->(:Field {name, value, searchable})
//! (:Edge {id})-[:SOURCE]->(:Node), (:Edge)-[:TARGET]->(:Node)
//! (:Edge)-[:IN_DATABASE]->(:Database)
//! (:NodeCollection {id, name})-[:CONTAINS]->(:Node)
//! ```

use std::collections::BTreeSet;

use async_trait::async_trait;
use neo4rs::query;

use interactome_core::{
    CollectionId, Database, DatabaseId, DatabaseType, Edge, EdgeId, FieldValue, Node, NodeId,
    Visibility,
};

use crate::client::{GraphClient, GraphError};
use crate::source::{GraphSource, NodeFilter};

#[async_trait]
impl GraphSource for GraphClient {
    async fn databases(&self, ids: &BTreeSet<DatabaseId>) -> Result<Vec<Database>, GraphError> {
        let q = query(
            "MATCH (d:Database) WHERE d.id IN $ids
             RETURN d.id AS id, d.name AS name, d.type AS type,
                    coalesce(d.public, true) AS public
             ORDER BY id",
        )
        .param("ids", id_strings(ids));

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = get(&row, "id")?;
            let public: bool = row.get("public").unwrap_or(true);
            results.push(Database {
                id: DatabaseId(id),
                name: row.get("name").unwrap_or_default(),
                db_type: DatabaseType(get(&row, "type")?),
                visibility: if public {
                    Visibility::Public
                } else {
                    Visibility::Private
                },
            });
        }

        if let Some(missing) = ids
            .iter()
            .find(|id| !results.iter().any(|d| &d.id == *id))
        {
            return Err(GraphError::NotFound {
                kind: "Database",
                id: missing.0.clone(),
            });
        }
        Ok(results)
    }

    async fn available_nodes(
        &self,
        node_databases: &BTreeSet<DatabaseId>,
    ) -> Result<Vec<Node>, GraphError> {
        let q = query(
            "MATCH (n:Node)-[:IN_DATABASE]->(d:Database)
             WHERE d.id IN $dbs
             WITH n, collect(DISTINCT d.id) AS dbs
             OPTIONAL MATCH (n)-[:HAS_FIELD]->(f:Field)
             WITH n, dbs, collect(f) AS fs
             RETURN n.id AS id, n.name AS name, dbs,
                    [x IN fs | x.name] AS field_names,
                    [x IN fs | x.value] AS field_values,
                    [x IN fs | coalesce(x.searchable, false)] AS field_searchable",
        )
        .param("dbs", id_strings(node_databases));

        let rows = self.query_rows(q).await?;
        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            let names: Vec<String> = row.get("field_names").unwrap_or_default();
            let values: Vec<String> = row.get("field_values").unwrap_or_default();
            let searchable: Vec<bool> = row.get("field_searchable").unwrap_or_default();
            let dbs: Vec<String> = row.get("dbs").unwrap_or_default();

            let fields = names
                .into_iter()
                .zip(values)
                .zip(searchable)
                .map(|((field, value), searchable)| FieldValue {
                    field,
                    value,
                    searchable,
                })
                .collect();

            nodes.push(Node {
                id: NodeId(get(&row, "id")?),
                name: row.get("name").unwrap_or_default(),
                databases: dbs.into_iter().map(DatabaseId).collect(),
                fields,
            });
        }

        tracing::debug!(count = nodes.len(), "Fetched available nodes");
        Ok(nodes)
    }

    async fn available_edges(
        &self,
        edge_databases: &BTreeSet<DatabaseId>,
        filter: &NodeFilter,
    ) -> Result<Vec<Edge>, GraphError> {
        let q = query(
            "MATCH (s:Node)<-[:SOURCE]-(e:Edge)-[:TARGET]->(t:Node)
             MATCH (e)-[:IN_DATABASE]->(ed:Database)
             WHERE ed.id IN $edge_dbs
               AND EXISTS { (s)-[:IN_DATABASE]->(sd:Database) WHERE sd.id IN $node_dbs }
               AND EXISTS { (t)-[:IN_DATABASE]->(td:Database) WHERE td.id IN $node_dbs }
             RETURN e.id AS id, s.id AS source, t.id AS target,
                    collect(DISTINCT ed.id) AS dbs",
        )
        .param("edge_dbs", id_strings(edge_databases))
        .param("node_dbs", id_strings(&filter.databases));

        let rows = self.query_rows(q).await?;
        let mut edges = Vec::with_capacity(rows.len());
        for row in rows {
            let dbs: Vec<String> = row.get("dbs").unwrap_or_default();
            edges.push(Edge {
                id: EdgeId(get(&row, "id")?),
                source: NodeId(get(&row, "source")?),
                target: NodeId(get(&row, "target")?),
                databases: dbs.into_iter().map(DatabaseId).collect(),
            });
        }

        tracing::debug!(count = edges.len(), "Fetched available edges");
        Ok(edges)
    }

    async fn collection_members(
        &self,
        collection: &CollectionId,
    ) -> Result<Vec<NodeId>, GraphError> {
        let q = query(
            "MATCH (c:NodeCollection {id: $id})
             OPTIONAL MATCH (c)-[:CONTAINS]->(n:Node)
             RETURN c.id AS collection, collect(n.id) AS members",
        )
        .param("id", collection.0.clone());

        let rows = self.query_rows(q).await?;
        let Some(row) = rows.into_iter().next() else {
            return Err(GraphError::NotFound {
                kind: "NodeCollection",
                id: collection.0.clone(),
            });
        };

        let members: Vec<String> = row.get("members").unwrap_or_default();
        Ok(members.into_iter().map(NodeId).collect())
    }
}

fn id_strings(ids: &BTreeSet<DatabaseId>) -> Vec<String> {
    ids.iter().map(|d| d.0.clone()).collect()
}

/// Read a required string column.
fn get(row: &neo4rs::Row, key: &str) -> Result<String, GraphError> {
    row.get::<String>(key)
        .map_err(|e| GraphError::Serialization(format!("Failed to read column {key}: {e}")))
}
