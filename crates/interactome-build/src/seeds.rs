//! Seed resolution.
//!
//! A seed descriptor names a node by identifier or by the value of one of its
//! searchable fields, or names a node collection. Only nodes visible under the
//! request's node databases can become seeds.

use std::collections::{BTreeSet, HashMap, HashSet};

use interactome_core::payload::{SeedDescriptor, SeedTarget};
use interactome_core::{CollectionId, Node, NodeId};
use interactome_graph::GraphSource;

use crate::error::{BuildError, EmptyKind, Result};

/// Lookup table from identifiers and searchable values to visible nodes.
pub struct SeedIndex<'a> {
    keys: HashMap<&'a str, Vec<&'a NodeId>>,
    visible: HashSet<&'a NodeId>,
}

impl<'a> SeedIndex<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut keys: HashMap<&'a str, Vec<&'a NodeId>> = HashMap::new();
        for node in nodes {
            keys.entry(node.id.0.as_str()).or_default().push(&node.id);
            for value in node.searchable_values() {
                keys.entry(value).or_default().push(&node.id);
            }
        }

        Self {
            keys,
            visible: nodes.iter().map(|n| &n.id).collect(),
        }
    }

    /// Nodes whose id or searchable field value equals `key`.
    pub fn lookup(&self, key: &str) -> impl Iterator<Item = &'a NodeId> + '_ {
        self.keys.get(key).into_iter().flatten().copied()
    }

    pub fn is_visible(&self, id: &NodeId) -> bool {
        self.visible.contains(id)
    }

    /// Resolve descriptors against this index and pre-fetched collection
    /// members. Invisible collection members are ignored.
    pub fn resolve(
        &self,
        descriptors: &[SeedDescriptor],
        collections: &HashMap<CollectionId, Vec<NodeId>>,
    ) -> BTreeSet<NodeId> {
        let mut seeds = BTreeSet::new();

        for descriptor in descriptors {
            match &descriptor.target {
                SeedTarget::Node(node) => {
                    let before = seeds.len();
                    seeds.extend(self.lookup(&node.id).cloned());
                    if seeds.len() == before {
                        tracing::debug!(key = %node.id, "Seed matched no visible node");
                    }
                }
                SeedTarget::Collection(collection) => {
                    let members = collections
                        .get(&CollectionId(collection.id.clone()))
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    seeds.extend(members.iter().filter(|m| self.is_visible(m)).cloned());
                }
            }
        }

        seeds
    }
}

/// Distinct collections referenced by the descriptors.
pub fn collection_refs(descriptors: &[SeedDescriptor]) -> BTreeSet<CollectionId> {
    descriptors
        .iter()
        .filter_map(|d| match &d.target {
            SeedTarget::Collection(c) => Some(CollectionId(c.id.clone())),
            SeedTarget::Node(_) => None,
        })
        .collect()
}

/// Resolve seed descriptors to visible node ids.
///
/// Fetches the members of every referenced collection once. Fails with
/// `NoSeedNodes` when nothing matches.
pub async fn resolve_seeds<S: GraphSource + ?Sized>(
    source: &S,
    visible: &[Node],
    descriptors: &[SeedDescriptor],
) -> Result<BTreeSet<NodeId>> {
    let mut collections = HashMap::new();
    for id in collection_refs(descriptors) {
        let members = source.collection_members(&id).await?;
        collections.insert(id, members);
    }

    let seeds = SeedIndex::new(visible).resolve(descriptors, &collections);
    if seeds.is_empty() {
        return Err(BuildError::EmptyResult(EmptyKind::NoSeedNodes));
    }

    tracing::info!(
        descriptors = descriptors.len(),
        collections = collections.len(),
        seeds = seeds.len(),
        "Resolved seed nodes"
    );
    Ok(seeds)
}
