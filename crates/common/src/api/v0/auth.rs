use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::api::ApiRequest;

/// Probe whether the client API is up and whether we are signed in
#[derive(Debug, Clone, Default)]
pub struct StatusRequest;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "super::de_opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_ip: Option<String>,
}

impl StatusResponse {
    /// Reachable and signed in. A backend that only reports `online`
    /// is signed in whenever it is online.
    pub fn is_authenticated(&self) -> bool {
        self.online && self.authenticated.unwrap_or(true)
    }
}

impl ApiRequest for StatusRequest {
    type Response = StatusResponse;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/status")?;
        Ok(client.get(full_url))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login answers with either `{ "status": "success" }` or `{ "ok": true }`.
/// Anything else is a soft failure carrying an optional `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

impl LoginResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success") || self.ok == Some(true)
    }
}

impl ApiRequest for LoginRequest {
    // a 200 with an empty body is a soft failure, not a decoding error
    type Response = Option<LoginResponse>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/auth/login")?;
        Ok(client.post(full_url).json(&self))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

impl ApiRequest for SignupRequest {
    type Response = Value;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/signup")?;
        Ok(client.post(full_url).json(&self))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = Value;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/auth/logout")?;
        Ok(client.post(full_url))
    }
}
