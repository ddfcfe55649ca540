use reqwest::{Client, RequestBuilder};
use url::Url;

use crate::api::ApiRequest;
use crate::search::FileRecord;

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub q: String,
}

impl ApiRequest for SearchRequest {
    // the backend answers `null` when the tracker has nothing
    type Response = Option<Vec<FileRecord>>;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/search")?;
        Ok(client.get(full_url).query(&[("q", self.q)]))
    }
}
