//! Remote collection service: the trait the tools call through, and its HTTP client.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, eyre::WrapErr, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::config::GestellConfig;
use crate::error::GestellError;
use crate::gestell::request::{PromptRequest, SearchRequest, SearchResponse};

/// The two operations the tools consume. Implementations are shared read-only
/// across concurrent calls.
#[async_trait]
pub trait CollectionService: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;

    /// Returns the raw answer; a JSON string when the service answers in plain text.
    async fn prompt(&self, request: &PromptRequest) -> Result<Value>;
}

/// HTTP client for the Gestell collection API.
#[derive(Clone)]
pub struct HttpCollectionService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpCollectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCollectionService").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl HttpCollectionService {
    pub fn new(config: &GestellConfig) -> Result<Self, GestellError> {
        let mut builder = Client::builder().user_agent(concat!("gestell_tools/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, base_url: config.base_url.clone(), api_key: config.api_key.clone() })
    }

    /// The path segment uses the hyphenated UUID form; braced and urn ids are rewritten.
    /// Ids that do not parse are used as given.
    fn endpoint(&self, collection_id: &str, operation: &str) -> String {
        let segment = Uuid::parse_str(collection_id)
            .map(|u| u.hyphenated().to_string())
            .unwrap_or_else(|_| collection_id.to_string());
        format!("{}/api/collection/{}/{}", self.base_url, segment, operation)
    }

    /// POST the envelope (minus `collectionId`, which lives in the path) and return the body text.
    async fn post(&self, collection_id: &str, operation: &str, mut envelope: Value) -> Result<String> {
        if let Some(map) = envelope.as_object_mut() {
            map.remove("collectionId");
        }
        let resp = self
            .client
            .post(self.endpoint(collection_id, operation))
            .bearer_auth(&self.api_key)
            .json(&envelope)
            .send()
            .await
            .wrap_err_with(|| format!("sending gestell {operation} request"))?;

        let status = resp.status();
        let text = resp.text().await.wrap_err("reading gestell response body")?;
        debug!(target: "gestell", operation, status = %status, len = text.len(), "gestell_response_raw");

        if !status.is_success() {
            return Err(eyre!("status {}: {}", status.as_u16(), text));
        }
        Ok(text)
    }
}

#[async_trait]
impl CollectionService for HttpCollectionService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let text = self.post(&request.collection_id, "search", request.to_envelope()).await?;
        serde_json::from_str(&text).wrap_err("parsing gestell search response")
    }

    async fn prompt(&self, request: &PromptRequest) -> Result<Value> {
        let text = self.post(&request.collection_id, "prompt", request.to_envelope()).await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> HttpCollectionService {
        let config = GestellConfig::new(Some("k".into()), Some("c".into()))
            .unwrap()
            .with_base_url("http://gestell.test");
        HttpCollectionService::new(&config).unwrap()
    }

    #[test]
    fn endpoint_normalizes_uuid_forms() {
        let s = service();
        let want = "http://gestell.test/api/collection/67e55044-10b1-426f-9247-bb680e5fe0c8/search";
        for id in [
            "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
            "67E55044-10B1-426F-9247-BB680E5FE0C8",
            "67e5504410b1426f9247bb680e5fe0c8",
        ] {
            assert_eq!(s.endpoint(id, "search"), want, "id {id}");
        }
    }

    #[test]
    fn endpoint_keeps_non_uuid_default() {
        assert_eq!(service().endpoint("my-collection", "prompt"), "http://gestell.test/api/collection/my-collection/prompt");
    }
}
