use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::ApiRequest;
use crate::peer_config::PeerConfig;

#[derive(Debug, Clone, Default)]
pub struct GetConfigRequest;

impl ApiRequest for GetConfigRequest {
    type Response = PeerConfig;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/config")?;
        Ok(client.get(full_url))
    }
}

/// Write back a complete configuration snapshot
#[derive(Debug, Clone)]
pub struct SaveConfigRequest(pub PeerConfig);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveConfigResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiRequest for SaveConfigRequest {
    type Response = Option<SaveConfigResponse>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/config")?;
        Ok(client.post(full_url).json(&self.0))
    }
}
