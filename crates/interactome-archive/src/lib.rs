//! interactome-archive — tamper-evident storage of constructed networks.
//!
//! Each committed request is archived as a JSON document carrying its
//! status, log and selection plus a BLAKE3 fingerprint of the selection.
//! Reading an archived network back verifies the fingerprint.

pub mod hash;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use interactome_core::{
    ConstructionMode, LogEntry, NetworkRequest, NetworkSelection, RequestId, RequestStatus,
};

pub use store::{ArchiveError, ArchiveQuery, FileArchive};

/// A finished request as stored in the archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchivedNetwork {
    pub request_id: RequestId,
    pub mode: ConstructionMode,
    pub status: RequestStatus,
    pub log: Vec<LogEntry>,
    pub selection: NetworkSelection,
    /// BLAKE3 fingerprint (hex) of `selection`.
    pub fingerprint: String,
    pub archived_at: DateTime<Utc>,
}

impl ArchivedNetwork {
    /// Snapshot a ready request. Returns `None` when it has no selection.
    pub fn from_request(request: &NetworkRequest) -> Option<Self> {
        let selection = request.selection.clone()?;
        Some(Self {
            request_id: request.id,
            mode: request.mode,
            status: request.status,
            log: request.log.clone(),
            fingerprint: hash::fingerprint(&selection),
            selection,
            archived_at: Utc::now(),
        })
    }

    /// Whether the stored fingerprint still matches the selection.
    pub fn verify_integrity(&self) -> bool {
        self.fingerprint == hash::fingerprint(&self.selection)
    }
}
