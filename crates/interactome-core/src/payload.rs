//! Request payload schema.
//!
//! Neighbors/Gap requests carry a list of seed descriptors; None requests
//! carry a list of literal edge descriptors. Both are stored unparsed on the
//! request and parsed during validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::EndpointRole;

/// Tag carried by every seed descriptor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeedKind {
    Seed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRef {
    /// Node identifier or the value of a searchable field.
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionRef {
    pub id: String,
}

/// What a seed descriptor points at.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeedTarget {
    Node(NodeRef),
    Collection(CollectionRef),
}

/// `{"kind": "Seed", "node": {"id": ...}}` or `{"kind": "Seed", "collection": {"id": ...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedDescriptor {
    pub kind: SeedKind,
    #[serde(flatten)]
    pub target: SeedTarget,
}

impl SeedDescriptor {
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            kind: SeedKind::Seed,
            target: SeedTarget::Node(NodeRef { id: id.into() }),
        }
    }

    pub fn collection(id: impl Into<String>) -> Self {
        Self {
            kind: SeedKind::Seed,
            target: SeedTarget::Collection(CollectionRef { id: id.into() }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Node name; literal networks identify nodes by name only.
    pub id: String,
    pub role: EndpointRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LiteralEdge {
    pub nodes: Vec<EndpointDescriptor>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

/// `{"edge": {"nodes": [{"id": "X", "role": "Source"}, {"id": "Y", "role": "Target"}]}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeDescriptor {
    pub edge: LiteralEdge,
}

impl EdgeDescriptor {
    pub fn pair(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            edge: LiteralEdge {
                nodes: vec![
                    EndpointDescriptor {
                        id: source.into(),
                        role: EndpointRole::Source,
                    },
                    EndpointDescriptor {
                        id: target.into(),
                        role: EndpointRole::Target,
                    },
                ],
                fields: BTreeMap::new(),
            },
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.edge.fields.insert(field.into(), value.into());
        self
    }

    /// Name bound to the first endpoint with the given role.
    pub fn endpoint(&self, role: EndpointRole) -> Option<&str> {
        self.edge
            .nodes
            .iter()
            .find(|n| n.role == role)
            .map(|n| n.id.as_str())
    }

    /// Every name mentioned by this descriptor, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.edge.nodes.iter().map(|n| n.id.as_str())
    }
}

/// Parse a seed payload. Anything but a JSON array of seed descriptors is rejected.
pub fn parse_seeds(payload: &serde_json::Value) -> Result<Vec<SeedDescriptor>> {
    serde_json::from_value(payload.clone())
        .map_err(|e| CoreError::Schema(format!("seed payload: {e}")))
}

/// Parse a literal edge payload.
pub fn parse_edges(payload: &serde_json::Value) -> Result<Vec<EdgeDescriptor>> {
    serde_json::from_value(payload.clone())
        .map_err(|e| CoreError::Schema(format!("edge payload: {e}")))
}
