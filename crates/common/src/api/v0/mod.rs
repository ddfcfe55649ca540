pub mod auth;
pub mod config;
pub mod download;
pub mod search;

pub use auth::{LoginRequest, LoginResponse, LogoutRequest, SignupRequest, StatusRequest, StatusResponse};
pub use config::{GetConfigRequest, SaveConfigRequest, SaveConfigResponse};
pub use download::{DownloadRequest, DownloadResponse};
pub use search::SearchRequest;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a JSON string or number and keep it as the string form.
/// `null` and a missing key both become `None`.
pub(crate) fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
