//! Gestell collection integration: identifier resolution, request marshaling,
//! the remote service client, and the tools built on top of them.

pub mod call;
pub mod collection;
pub mod request;
pub mod service;
pub mod tools;

pub use call::{resolve_and_execute_tool_call, resolve_tool_calls, ToolCallDecision, ToolResolution};
pub use collection::{is_valid_collection_id, resolve_collection_id};
pub use request::{
    PromptMessage, PromptParams, PromptRequest, RetrievalMethod, RetrievalTuning, SearchParams,
    SearchRequest, SearchResponse, SearchType,
};
pub use service::{CollectionService, HttpCollectionService};
pub use tools::{
    build_gestell_tools, GestellPromptTool, GestellSearchTool, ToolDefinition, ToolHandler,
    ToolParameters, ToolParametersBuilder,
};
