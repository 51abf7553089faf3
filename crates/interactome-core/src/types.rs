//! Core domain types for interaction networks.
//!
//! Nodes and edges come from curated interaction databases; a
//! `NetworkRequest` names a subset of those databases, a seed payload, and
//! a construction mode, and eventually carries the selected subnetwork.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Identifiers ───────────────────────────────────────────────────

/// Identifier of a node in the interaction graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

/// Identifier of an edge in the interaction graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub String);

/// Identifier of a curated interaction database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatabaseId(pub String);

/// Identifier of a curated node collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(pub String);

/// Identifier of a network construction request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! display_newtype {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

display_newtype!(NodeId, EdgeId, DatabaseId, CollectionId, RequestId);

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for DatabaseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&str> for CollectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ── Databases ─────────────────────────────────────────────────────

/// Categorical type of a database. Decides which construction mode applies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatabaseType(pub String);

impl DatabaseType {
    /// The type of user-supplied literal networks.
    pub const GENERIC: &'static str = "Generic";

    pub fn generic() -> Self {
        Self(Self::GENERIC.to_string())
    }

    pub fn is_generic(&self) -> bool {
        self.0 == Self::GENERIC
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A curated interaction database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Database {
    pub id: DatabaseId,
    pub name: String,
    #[serde(rename = "type")]
    pub db_type: DatabaseType,
    #[serde(default)]
    pub visibility: Visibility,
}

// ── Graph Elements ────────────────────────────────────────────────

/// A single annotation on a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldValue {
    pub field: String,
    pub value: String,
    /// Whether seed descriptors may match this value.
    #[serde(default)]
    pub searchable: bool,
}

/// A node (gene, protein, compound, ...) in the interaction graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub databases: BTreeSet<DatabaseId>,
    #[serde(default)]
    pub fields: Vec<FieldValue>,
}

impl Node {
    pub fn in_any(&self, databases: &BTreeSet<DatabaseId>) -> bool {
        self.databases.iter().any(|d| databases.contains(d))
    }

    /// Values of all searchable fields.
    pub fn searchable_values(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.value.as_str())
    }
}

/// Direction tag of a node's participation in an edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EndpointRole {
    Source,
    Target,
}

/// A directed interaction between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub databases: BTreeSet<DatabaseId>,
}

impl Edge {
    pub fn endpoint(&self, role: EndpointRole) -> &NodeId {
        match role {
            EndpointRole::Source => &self.source,
            EndpointRole::Target => &self.target,
        }
    }

    pub fn in_any(&self, databases: &BTreeSet<DatabaseId>) -> bool {
        self.databases.iter().any(|d| databases.contains(d))
    }
}

/// A named curated set of nodes, usable as a seed source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeCollection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub members: BTreeSet<NodeId>,
}

// ── Requests ──────────────────────────────────────────────────────

/// How the subnetwork is derived from the seeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum ConstructionMode {
    /// Literal user-supplied network; only valid for Generic databases.
    None,
    /// One-hop ego network around the seeds.
    Neighbors,
    /// Seed-anchored chains with up to `gap` forwarding hops.
    Gap { gap: i64 },
}

impl ConstructionMode {
    /// Whether the mode applies to databases of the given type.
    pub fn accepts(&self, db_type: &DatabaseType) -> bool {
        match self {
            ConstructionMode::None => db_type.is_generic(),
            ConstructionMode::Neighbors | ConstructionMode::Gap { .. } => !db_type.is_generic(),
        }
    }
}

impl fmt::Display for ConstructionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionMode::None => f.write_str("none"),
            ConstructionMode::Neighbors => f.write_str("neighbors"),
            ConstructionMode::Gap { gap } => write!(f, "gap({gap})"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Ready,
    Error,
}

/// One line of a request's log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Membership tag of a node within a constructed network.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeRole {
    Seed,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedNode {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectedEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// The constructed subnetwork.
///
/// Always canonical: nodes and edges sorted by id, no duplicates. Equal
/// selections therefore serialize to identical bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkSelection {
    pub nodes: Vec<SelectedNode>,
    pub edges: Vec<SelectedEdge>,
}

impl NetworkSelection {
    /// Build a canonical selection. Later duplicates of an id are dropped.
    pub fn new(mut nodes: Vec<SelectedNode>, mut edges: Vec<SelectedEdge>) -> Self {
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes.dedup_by(|a, b| a.id == b.id);
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges.dedup_by(|a, b| a.id == b.id);
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn role_of(&self, id: &NodeId) -> Option<NodeRole> {
        self.nodes
            .binary_search_by(|n| n.id.cmp(id))
            .ok()
            .map(|i| self.nodes[i].role)
    }

    pub fn edge_ids(&self) -> BTreeSet<EdgeId> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }
}

/// A network construction request and, once built, its result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkRequest {
    #[serde(default)]
    pub id: RequestId,
    pub node_databases: BTreeSet<DatabaseId>,
    pub edge_databases: BTreeSet<DatabaseId>,
    pub mode: ConstructionMode,
    /// Seed descriptors (Neighbors/Gap) or edge descriptors (None), unparsed.
    pub payload: serde_json::Value,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<NetworkSelection>,
}

impl NetworkRequest {
    pub fn new(
        node_databases: impl IntoIterator<Item = DatabaseId>,
        edge_databases: impl IntoIterator<Item = DatabaseId>,
        mode: ConstructionMode,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: RequestId::new(),
            node_databases: node_databases.into_iter().collect(),
            edge_databases: edge_databases.into_iter().collect(),
            mode,
            payload,
            status: RequestStatus::Pending,
            log: Vec::new(),
            selection: None,
        }
    }

    /// Every database the request refers to, node and edge side combined.
    pub fn referenced_databases(&self) -> BTreeSet<DatabaseId> {
        self.node_databases
            .union(&self.edge_databases)
            .cloned()
            .collect()
    }

    pub fn append_log(&mut self, message: impl Into<String>) {
        self.log.push(LogEntry {
            at: Utc::now(),
            message: message.into(),
        });
    }
}
