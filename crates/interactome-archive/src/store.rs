//! File-system archive of constructed networks.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use interactome_core::{NetworkRequest, RequestId, RequestStatus};
use interactome_graph::{ResultWriter, WriteError};

use crate::ArchivedNetwork;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Archived network not found: {0}")]
    NotFound(RequestId),

    #[error("Integrity check failed for request {0}: fingerprint does not match selection")]
    IntegrityViolation(RequestId),

    #[error("Request {0} is not ready: only finished networks are archived")]
    NotReady(RequestId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Filters for [`FileArchive::list`].
#[derive(Debug, Default)]
pub struct ArchiveQuery {
    pub status: Option<RequestStatus>,
    /// Only include networks archived at or after this time.
    pub from: Option<DateTime<Utc>>,
    /// Only include networks archived at or before this time.
    pub to: Option<DateTime<Utc>>,
}

/// Stores archived networks as JSON files:
/// ```text
/// {root}/
///   2026/
///     10/
///       16/
///         {request_id}.json
/// ```
pub struct FileArchive {
    root: PathBuf,
}

impl FileArchive {
    /// Create an archive rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn network_path(&self, network: &ArchivedNetwork) -> PathBuf {
        let date = network.archived_at.format("%Y/%m/%d");
        self.root
            .join(format!("{}/{}.json", date, network.request_id))
    }

    fn find_path(&self, id: RequestId) -> Result<PathBuf, ArchiveError> {
        let filename = format!("{id}.json");
        find_file_recursive(&self.root, &filename).ok_or(ArchiveError::NotFound(id))
    }

    /// Archive a ready request.
    ///
    /// The document is written to a temporary file beside its final location
    /// and renamed into place, so readers never observe a partial write.
    pub fn save(&self, request: &NetworkRequest) -> Result<ArchivedNetwork, ArchiveError> {
        if request.status != RequestStatus::Ready {
            return Err(ArchiveError::NotReady(request.id));
        }
        let network =
            ArchivedNetwork::from_request(request).ok_or(ArchiveError::NotReady(request.id))?;

        let path = self.network_path(&network);
        let previous = self.find_path(request.id).ok();
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;

        let tmp = dir.join(format!(".{}.json.tmp", network.request_id));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(&network)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        // A copy archived on an earlier day is replaced, not duplicated.
        if let Some(previous) = previous.filter(|p| p != &path) {
            fs::remove_file(previous)?;
        }

        tracing::debug!(
            request_id = %network.request_id,
            fingerprint = %network.fingerprint,
            path = %path.display(),
            "Network archived"
        );
        Ok(network)
    }

    /// Load an archived network, verifying its fingerprint.
    pub fn get(&self, id: RequestId) -> Result<ArchivedNetwork, ArchiveError> {
        let path = self.find_path(id)?;
        let network: ArchivedNetwork = serde_json::from_str(&fs::read_to_string(&path)?)?;

        if !network.verify_integrity() {
            return Err(ArchiveError::IntegrityViolation(id));
        }
        Ok(network)
    }

    /// Archived networks matching `query`, newest first.
    pub fn list(&self, query: &ArchiveQuery) -> Result<Vec<ArchivedNetwork>, ArchiveError> {
        let mut results = Vec::new();
        collect_recursive(&self.root, query, &mut results)?;
        results.sort_by(|a, b| b.archived_at.cmp(&a.archived_at));
        Ok(results)
    }
}

#[async_trait]
impl ResultWriter for FileArchive {
    async fn commit(&self, request: &NetworkRequest) -> Result<(), WriteError> {
        self.save(request)
            .map(|_| ())
            .map_err(|e| WriteError::new("archive", e.to_string()))
    }
}

fn find_file_recursive(dir: &Path, filename: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    for entry in fs::read_dir(dir).ok()?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_file_recursive(&path, filename) {
                return Some(found);
            }
        } else if path.file_name().and_then(|n| n.to_str()) == Some(filename) {
            return Some(path);
        }
    }

    None
}

fn collect_recursive(
    dir: &Path,
    query: &ArchiveQuery,
    results: &mut Vec<ArchivedNetwork>,
) -> Result<(), ArchiveError> {
    if !dir.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_recursive(&path, query, results)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            let network: ArchivedNetwork = serde_json::from_str(&fs::read_to_string(&path)?)?;
            if matches_query(&network, query) {
                results.push(network);
            }
        }
    }

    Ok(())
}

fn matches_query(network: &ArchivedNetwork, query: &ArchiveQuery) -> bool {
    if query.status.is_some_and(|s| s != network.status) {
        return false;
    }
    if query.from.is_some_and(|from| network.archived_at < from) {
        return false;
    }
    if query.to.is_some_and(|to| network.archived_at > to) {
        return false;
    }
    true
}
