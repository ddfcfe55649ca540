use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ApiRequest;
use crate::search::FileRecord;

/// Ask the peer engine to start fetching a file. The body is the full
/// record as it came back from search.
#[derive(Debug, Clone)]
pub struct DownloadRequest(pub FileRecord);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ApiRequest for DownloadRequest {
    type Response = Option<DownloadResponse>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/download")?;
        Ok(client.post(full_url).json(&self.0))
    }
}
