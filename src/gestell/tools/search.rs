//! `gestell_search`: ranked content fragments from a collection.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{block_on, parse_args, with_common_parameters, ToolDefinition, ToolParametersBuilder};
use crate::config::GestellConfig;
use crate::error::{GestellError, Operation, Result};
use crate::gestell::collection::resolve_collection_id;
use crate::gestell::request::{envelope_keys, SearchParams, SearchRequest};
use crate::gestell::service::{CollectionService, HttpCollectionService};

#[derive(Clone)]
pub struct GestellSearchTool {
    service: Arc<dyn CollectionService>,
    collection_id: String,
}

impl std::fmt::Debug for GestellSearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestellSearchTool").field("collection_id", &self.collection_id).finish_non_exhaustive()
    }
}

impl GestellSearchTool {
    pub const NAME: &'static str = "gestell_search";
    pub const DESCRIPTION: &'static str = "Search the Gestell data collection for relevant content by query.";

    /// Explicit arguments win over `GESTELL_API_KEY` / `GESTELL_COLLECTION_ID`.
    pub fn new(api_key: Option<String>, collection_id: Option<String>) -> Result<Self> {
        Self::from_config(&GestellConfig::new(api_key, collection_id)?)
    }

    pub fn from_config(config: &GestellConfig) -> Result<Self> {
        let service = HttpCollectionService::new(config)?;
        Ok(Self::with_service(Arc::new(service), config.collection_id.clone()))
    }

    /// Use a caller-provided service (alternate transport, test stub).
    pub fn with_service(service: Arc<dyn CollectionService>, collection_id: impl Into<String>) -> Self {
        Self { service, collection_id: collection_id.into() }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// Validate the params and map them onto the remote envelope. No I/O.
    pub fn build_request(&self, params: &SearchParams) -> Result<SearchRequest> {
        if params.query_text.trim().is_empty() {
            return Err(GestellError::EmptyQuery);
        }
        let collection_id = resolve_collection_id(&self.collection_id, params.collection_id_override.as_deref());
        Ok(SearchRequest::new(collection_id, params))
    }

    #[instrument(name = "gestell_search", skip(self, params), fields(query_len = params.query_text.len()))]
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Value>> {
        let request = self.build_request(params)?;
        debug!(
            target: "gestell",
            collection_id = %request.collection_id,
            keys = ?envelope_keys(&request.to_envelope()),
            "search_request"
        );

        match self.service.search(&request).await {
            Ok(response) => {
                info!(target: "gestell", results = response.result.len(), "search_done");
                Ok(response.result)
            }
            Err(e) => {
                warn!(target: "gestell", error = %e, "search_failed");
                Err(GestellError::invocation(Operation::Search, &e))
            }
        }
    }

    /// Blocking variant of [`search`](Self::search).
    pub fn search_blocking(&self, params: &SearchParams) -> Result<Vec<Value>> {
        block_on(self.search(params))?
    }

    /// Tool definition for the host framework. The handler returns a JSON array of records.
    pub fn definition(&self) -> ToolDefinition {
        let parameters = with_common_parameters(
            ToolParametersBuilder::new_object(),
            "Search query to find relevant information in the Gestell collection",
        )
        .add_boolean("include_content", Some("Include the content of each result"))
        .add_boolean("include_edges", Some("Include graph edges of each result"))
        .additional_properties(false)
        .build();

        let tool = self.clone();
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            parameters,
            Arc::new(move |args: &Value| -> color_eyre::Result<Value> {
                let params: SearchParams = parse_args(args)?;
                Ok(Value::Array(tool.search_blocking(&params)?))
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gestell::request::{PromptRequest, SearchResponse};
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl CollectionService for Unreachable {
        async fn search(&self, _: &SearchRequest) -> color_eyre::Result<SearchResponse> {
            unreachable!("no remote call expected")
        }
        async fn prompt(&self, _: &PromptRequest) -> color_eyre::Result<Value> {
            unreachable!("no remote call expected")
        }
    }

    fn tool() -> GestellSearchTool {
        GestellSearchTool::with_service(Arc::new(Unreachable), "11111111-1111-1111-1111-111111111111")
    }

    #[test]
    fn schema_contains_query() {
        let def = tool().definition();
        assert_eq!(def.name, "gestell_search");
        let v = def.parameters.as_value();
        assert!(v["properties"].get("query_text").is_some());
        assert!(v["properties"].get("include_edges").is_some());
        assert!(v["properties"].get("cot").is_none());
    }

    #[test]
    fn blank_query_rejected_before_remote_call() {
        let err = tool().search_blocking(&SearchParams::new("   ")).unwrap_err();
        assert!(matches!(err, GestellError::EmptyQuery));
    }

    #[test]
    fn malformed_override_uses_default() {
        let mut params = SearchParams::new("q");
        params.collection_id_override = Some("not-a-uuid".into());
        let req = tool().build_request(&params).unwrap();
        assert_eq!(req.collection_id, "11111111-1111-1111-1111-111111111111");
    }

    #[test]
    fn handler_rejects_bad_arguments() {
        let def = tool().definition();
        let err = def.execute(&serde_json::json!({"max_results": 3})).unwrap_err();
        assert!(err.to_string().contains("invalid tool arguments"));
    }
}
