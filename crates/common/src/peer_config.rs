//! Synchronizes the local peer node's configuration with the client API.
//!
//! The configuration is owned by the backend. We read it whole, let the
//! caller edit it, and write the whole snapshot back in one request.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::v0::{GetConfigRequest, SaveConfigRequest};
use crate::api::{ApiClient, NormalizedError};

/// Shown for any failed save, whatever the cause
pub const SAVE_FAILED: &str = "Failed to save";
const SAVED: &str = "Settings saved!";

/// The peer node's configuration as the backend reports it.
///
/// Fields are opaque strings here; validating them is the backend's job.
/// `peer_port` in particular is sent exactly as the user typed it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    #[serde(rename = "tracker_server_url", default, deserialize_with = "de_string")]
    pub tracker_url: String,
    #[serde(rename = "port", default, deserialize_with = "de_string")]
    pub peer_port: String,
    #[serde(rename = "shared_folder", default, deserialize_with = "de_string")]
    pub shared_folder_path: String,
    #[serde(rename = "download_folder", default, deserialize_with = "de_string")]
    pub download_folder_path: String,
    /// Whether the backend already holds a tunnel token. The token itself
    /// is never read back.
    #[serde(
        rename = "ngrok_configured",
        default,
        deserialize_with = "de_configured",
        skip_serializing
    )]
    pub tunnel_token_configured: bool,
    /// A new tunnel token to hand to the backend on save
    #[serde(
        rename = "ngrok_authtoken",
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub tunnel_token: Option<String>,
}

impl std::fmt::Debug for PeerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerConfig")
            .field("tracker_url", &self.tracker_url)
            .field("peer_port", &self.peer_port)
            .field("shared_folder_path", &self.shared_folder_path)
            .field("download_folder_path", &self.download_folder_path)
            .field("tunnel_token_configured", &self.tunnel_token_configured)
            .field(
                "tunnel_token",
                &self.tunnel_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(crate::api::v0::de_opt_string_or_number(deserializer)?.unwrap_or_default())
}

// the backend reports either a flag or the raw token here
fn de_configured<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend applied the snapshot
    Updated(String),
    /// The snapshot matched what the backend already had
    Unchanged(String),
}

impl std::fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveOutcome::Updated(message) | SaveOutcome::Unchanged(message) => {
                write!(f, "{}", message)
            }
        }
    }
}

/// Reads and writes [`PeerConfig`] in single round trips.
///
/// Overlapping saves are not deduplicated; a caller that cares should not
/// issue a second save before the first resolves.
#[derive(Debug, Clone)]
pub struct ConfigSynchronizer {
    client: ApiClient,
}

impl ConfigSynchronizer {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the full configuration
    pub async fn load(&self) -> Result<PeerConfig, NormalizedError> {
        let config = self.client.call(GetConfigRequest).await?;
        tracing::debug!(?config, "loaded peer config");
        Ok(config)
    }

    /// Write `config` back as one complete snapshot.
    ///
    /// Any failure collapses into a single generic notice; the cause is
    /// only logged.
    pub async fn save(&self, config: &PeerConfig) -> Result<SaveOutcome, NormalizedError> {
        match self.client.call(SaveConfigRequest(config.clone())).await {
            Ok(response) => {
                let response = response.unwrap_or_default();
                let message = response.message.unwrap_or_else(|| SAVED.to_string());
                if response.status.as_deref() == Some("ignored") {
                    tracing::info!("peer config unchanged: {}", message);
                    Ok(SaveOutcome::Unchanged(message))
                } else {
                    tracing::info!("peer config saved: {}", message);
                    Ok(SaveOutcome::Updated(message))
                }
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind, "failed to save peer config: {}", e);
                Err(NormalizedError::generic(SAVE_FAILED))
            }
        }
    }
}
