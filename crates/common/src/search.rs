//! Search the tracker's index and kick off downloads.
//!
//! Search is advisory: any failure yields an empty result set. Download
//! initiation is guarded so that only one initiation request is ever in
//! flight from this coordinator.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::v0::{DownloadRequest, SearchRequest};
use crate::api::{ApiClient, NormalizedError};

/// One network-reachable holder of a file. Never dialed from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerEndpoint {
    #[serde(rename = "ip_address", alias = "ip")]
    pub ip: String,
    pub port: u16,
    /// Whatever else the tracker reported for this peer, passed back
    /// untouched when initiating a download
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file known to the tracker, keyed by its content hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_hash: String,
    pub file_name: String,
    #[serde(rename = "file_size")]
    pub file_size_bytes: u64,
    #[serde(default)]
    pub peers: Vec<PeerEndpoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadStarted {
    pub file_hash: String,
    pub file_name: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DownloadError {
    /// Rejected locally: another initiation has not resolved yet
    #[error("a download is already starting ({in_flight}), try again once it resolves")]
    InProgress { requested: String, in_flight: String },
    #[error(transparent)]
    Failed(#[from] NormalizedError),
}

/// The in-flight download intent, if any.
///
/// Holds at most one file hash at a time. A slot is taken with
/// [`DownloadIntents::try_acquire`] and given back when the returned guard
/// drops. The guard owns its handle on the slot so it can travel with the
/// request that resolves it.
#[derive(Debug, Default)]
pub struct DownloadIntents {
    in_flight: Mutex<Option<String>>,
}

impl DownloadIntents {
    /// Claim the slot for `file_hash`, or return the hash that holds it
    pub fn try_acquire(self: &Arc<Self>, file_hash: &str) -> Result<IntentGuard, String> {
        let mut in_flight = self.in_flight.lock();
        if let Some(current) = in_flight.as_ref() {
            return Err(current.clone());
        }
        *in_flight = Some(file_hash.to_string());
        Ok(IntentGuard {
            intents: Arc::clone(self),
        })
    }

    pub fn in_flight(&self) -> Option<String> {
        self.in_flight.lock().clone()
    }
}

#[derive(Debug)]
pub struct IntentGuard {
    intents: Arc<DownloadIntents>,
}

impl Drop for IntentGuard {
    fn drop(&mut self) {
        self.intents.in_flight.lock().take();
    }
}

/// Turns queries into file records and download clicks into initiation
/// requests
#[derive(Debug)]
pub struct SearchDownloadCoordinator {
    client: ApiClient,
    results: RwLock<Vec<FileRecord>>,
    intents: Arc<DownloadIntents>,
}

impl SearchDownloadCoordinator {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            results: RwLock::new(Vec::new()),
            intents: Arc::new(DownloadIntents::default()),
        }
    }

    /// Run a search and return the new result set.
    ///
    /// A blank query sends nothing and returns the current results. A
    /// failed search replaces the results with an empty set.
    pub async fn search(&self, query: &str) -> Vec<FileRecord> {
        let query = query.trim();
        if query.is_empty() {
            return self.results();
        }

        let results = match self
            .client
            .call(SearchRequest {
                q: query.to_string(),
            })
            .await
        {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(query, kind = ?e.kind, "search failed: {}", e);
                Vec::new()
            }
        };
        tracing::debug!(query, count = results.len(), "search complete");

        *self.results.write() = results.clone();
        results
    }

    /// The result set from the most recent search
    pub fn results(&self) -> Vec<FileRecord> {
        self.results.read().clone()
    }

    /// Look up a record in the current results by its hash
    pub fn find(&self, file_hash: &str) -> Option<FileRecord> {
        self.results
            .read()
            .iter()
            .find(|record| record.file_hash == file_hash)
            .cloned()
    }

    /// Hash of the file whose initiation is outstanding, if any
    pub fn in_flight(&self) -> Option<String> {
        self.intents.in_flight()
    }

    /// Ask the backend to start downloading `file`.
    ///
    /// Rejected locally, without a request, while any other initiation is
    /// outstanding. The request runs on its own task, which holds the
    /// intent until the backend answers. A caller that stops waiting does
    /// not free the slot early.
    pub async fn initiate_download(
        &self,
        file: &FileRecord,
    ) -> Result<DownloadStarted, DownloadError> {
        let intent = self.intents.try_acquire(&file.file_hash).map_err(|in_flight| {
            tracing::debug!(
                requested = %file.file_hash,
                %in_flight,
                "download initiation rejected, another is in flight"
            );
            DownloadError::InProgress {
                requested: file.file_hash.clone(),
                in_flight,
            }
        })?;

        tracing::info!(file_hash = %file.file_hash, file_name = %file.file_name, peers = file.peers.len(), "initiating download");
        let client = self.client.clone();
        let request = DownloadRequest(file.clone());
        let handle = tokio::spawn(async move {
            let response = client.call(request).await;
            drop(intent);
            response
        });

        let response = handle
            .await
            .map_err(|e| {
                tracing::warn!(file_hash = %file.file_hash, "download initiation task failed: {}", e);
                NormalizedError::unknown()
            })?
            .inspect_err(|e| {
                tracing::warn!(file_hash = %file.file_hash, kind = ?e.kind, "download initiation failed: {}", e)
            })?
            .unwrap_or_default();

        Ok(DownloadStarted {
            file_hash: file.file_hash.clone(),
            file_name: response.file.unwrap_or_else(|| file.file_name.clone()),
            status: response
                .status
                .unwrap_or_else(|| "Download started".to_string()),
        })
    }
}
