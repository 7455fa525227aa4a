//! Tools exposed to the host agent framework.

mod definition;
mod prompt;
mod search;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tokio::task;

use crate::config::GestellConfig;
use crate::error::{GestellError, Result};

pub use definition::{ToolDefinition, ToolHandler, ToolParameters, ToolParametersBuilder};
pub use prompt::GestellPromptTool;
pub use search::GestellSearchTool;

/// Build the search and prompt tools from one configuration.
pub fn build_gestell_tools(config: &GestellConfig) -> Result<Vec<ToolDefinition>> {
    Ok(vec![
        GestellSearchTool::from_config(config)?.definition(),
        GestellPromptTool::from_config(config)?.definition(),
    ])
}

/// Run an async entry point to completion on the calling thread.
/// - no runtime: a fresh one is built for the call
/// - multi-thread runtime: the worker is handed off with `block_in_place`
/// - current-thread runtime: refused, the caller must await the async entry point
fn block_on<F: Future>(fut: F) -> Result<F::Output> {
    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::MultiThread => Ok(task::block_in_place(|| handle.block_on(fut))),
            _ => Err(GestellError::BlockingInAsyncContext),
        },
        Err(_) => {
            let rt = Runtime::new()?;
            Ok(rt.block_on(fut))
        }
    }
}

fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T> {
    serde_json::from_value(args.clone()).map_err(|e| GestellError::InvalidArguments(e.to_string()))
}

/// 検索・プロンプト両ツール共通のスキーマ項目
fn with_common_parameters(builder: ToolParametersBuilder, query_description: &str) -> ToolParametersBuilder {
    builder
        .add_string("query_text", Some(query_description))
        .add_string(
            "collection_id_override",
            Some("Optional collection UUID to use instead of the default collection"),
        )
        .add_string("category_id", Some("Restrict retrieval to this category"))
        .add_string_enum("method", Some("Retrieval effort"), &["fast", "normal", "precise"])
        .add_string_enum("search_type", Some("Search strategy"), &["keywords", "phrase", "summary"])
        .add_integer("vector_depth", Some("Depth of vector retrieval"), Some(0), None)
        .add_integer("node_depth", Some("Depth of node retrieval"), Some(0), None)
        .add_integer("max_queries", Some("Maximum number of sub-queries"), Some(0), None)
        .add_integer("max_results", Some("Maximum number of results"), Some(0), None)
        .required("query_text")
}
