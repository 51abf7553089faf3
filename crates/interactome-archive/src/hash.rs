//! BLAKE3 fingerprints of network selections.
//!
//! Selections are canonical (sorted, deduplicated), so serializing one to
//! JSON is deterministic and equal selections share a fingerprint no matter
//! in what order they were built.

use interactome_core::NetworkSelection;

/// Hex-encoded BLAKE3 hash of the selection's canonical JSON.
pub fn fingerprint(selection: &NetworkSelection) -> String {
    let json = serde_json::to_vec(selection).unwrap_or_default();
    blake3::hash(&json).to_hex().to_string()
}
