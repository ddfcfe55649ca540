#[allow(clippy::module_inception)]
mod client;
pub mod error;
pub mod v0;

pub use client::ApiClient;
pub use error::{ErrorKind, FieldError, NormalizedError};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

/// A request against the client API that knows its own route and
/// response type
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client)
        -> Result<RequestBuilder, url::ParseError>;
}
