//! Per-call request parameters and the envelopes sent to the collection service.
//!
//! `*Params` types are what the host framework hands us (snake_case keys).
//! `*Request` types are what goes over the wire (camelCase keys, unset fields omitted).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How hard the service works to retrieve context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMethod {
    Fast,
    Normal,
    Precise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Keywords,
    Phrase,
    Summary,
}

/// One entry of prior conversation passed to the prompt operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self { role: role.into(), content: content.into() }
    }
}

/// Optional tuning fields shared by search and prompt. Passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct RetrievalTuning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<RetrievalMethod>,
    #[serde(default, rename(serialize = "type"), skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_depth: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// Arguments of one `gestell_search` call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchParams {
    #[serde(alias = "query", alias = "prompt")]
    pub query_text: String,
    #[serde(default, alias = "collection_id")]
    pub collection_id_override: Option<String>,
    #[serde(flatten)]
    pub tuning: RetrievalTuning,
    #[serde(default)]
    pub include_content: Option<bool>,
    #[serde(default)]
    pub include_edges: Option<bool>,
}

impl SearchParams {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self { query_text: query_text.into(), ..Default::default() }
    }
}

/// Arguments of one `gestell_prompt` call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PromptParams {
    #[serde(alias = "prompt", alias = "query")]
    pub query_text: String,
    #[serde(default, alias = "collection_id")]
    pub collection_id_override: Option<String>,
    #[serde(flatten)]
    pub tuning: RetrievalTuning,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub cot: Option<bool>,
    #[serde(default)]
    pub messages: Option<Vec<PromptMessage>>,
}

impl PromptParams {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self { query_text: query_text.into(), ..Default::default() }
    }
}

/// Body of the remote search operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub collection_id: String,
    pub prompt: String,
    #[serde(flatten)]
    pub tuning: RetrievalTuning,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_edges: Option<bool>,
}

impl SearchRequest {
    pub fn new(collection_id: impl Into<String>, params: &SearchParams) -> Self {
        Self {
            collection_id: collection_id.into(),
            prompt: params.query_text.clone(),
            tuning: params.tuning.clone(),
            include_content: params.include_content,
            include_edges: params.include_edges,
        }
    }

    /// The key/value mapping the service receives.
    pub fn to_envelope(&self) -> Value {
        json!(self)
    }
}

/// Body of the remote prompt operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub collection_id: String,
    pub prompt: String,
    #[serde(flatten)]
    pub tuning: RetrievalTuning,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<PromptMessage>>,
}

impl PromptRequest {
    pub fn new(collection_id: impl Into<String>, params: &PromptParams) -> Self {
        Self {
            collection_id: collection_id.into(),
            prompt: params.query_text.clone(),
            tuning: params.tuning.clone(),
            template: params.template.clone(),
            cot: params.cot,
            messages: params.messages.clone(),
        }
    }

    pub fn to_envelope(&self) -> Value {
        json!(self)
    }
}

/// Envelope returned by the search operation. Only `result` is read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    pub result: Vec<Value>,
}

/// Sorted keys of an envelope, for logging without values.
pub(crate) fn envelope_keys(envelope: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = envelope
        .as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default();
    keys.sort_unstable();
    keys
}
