//! `gestell_prompt`: a synthesized answer grounded in a collection.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::{block_on, parse_args, with_common_parameters, ToolDefinition, ToolParametersBuilder};
use crate::config::GestellConfig;
use crate::error::{GestellError, Operation, Result};
use crate::gestell::collection::resolve_collection_id;
use crate::gestell::request::{envelope_keys, PromptParams, PromptRequest};
use crate::gestell::service::{CollectionService, HttpCollectionService};

/// String form of a prompt response: plain strings as-is, anything else as JSON text.
fn stringify_response(response: Value) -> String {
    match response {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct GestellPromptTool {
    service: Arc<dyn CollectionService>,
    collection_id: String,
}

impl std::fmt::Debug for GestellPromptTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestellPromptTool").field("collection_id", &self.collection_id).finish_non_exhaustive()
    }
}

impl GestellPromptTool {
    pub const NAME: &'static str = "gestell_prompt";
    pub const DESCRIPTION: &'static str =
        "Use the Gestell collection to answer a question or fulfill an instruction.";

    pub fn new(api_key: Option<String>, collection_id: Option<String>) -> Result<Self> {
        Self::from_config(&GestellConfig::new(api_key, collection_id)?)
    }

    pub fn from_config(config: &GestellConfig) -> Result<Self> {
        let service = HttpCollectionService::new(config)?;
        Ok(Self::with_service(Arc::new(service), config.collection_id.clone()))
    }

    pub fn with_service(service: Arc<dyn CollectionService>, collection_id: impl Into<String>) -> Self {
        Self { service, collection_id: collection_id.into() }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn build_request(&self, params: &PromptParams) -> Result<PromptRequest> {
        if params.query_text.trim().is_empty() {
            return Err(GestellError::EmptyQuery);
        }
        let collection_id = resolve_collection_id(&self.collection_id, params.collection_id_override.as_deref());
        Ok(PromptRequest::new(collection_id, params))
    }

    #[instrument(
        name = "gestell_prompt",
        skip(self, params),
        fields(prompt_len = params.query_text.len(), history_len = params.messages.as_ref().map_or(0, Vec::len))
    )]
    pub async fn prompt(&self, params: &PromptParams) -> Result<String> {
        let request = self.build_request(params)?;
        debug!(
            target: "gestell",
            collection_id = %request.collection_id,
            keys = ?envelope_keys(&request.to_envelope()),
            "prompt_request"
        );

        match self.service.prompt(&request).await {
            Ok(response) => {
                let answer = stringify_response(response);
                info!(target: "gestell", answer_len = answer.len(), "prompt_done");
                Ok(answer)
            }
            Err(e) => {
                warn!(target: "gestell", error = %e, "prompt_failed");
                Err(GestellError::invocation(Operation::Prompt, &e))
            }
        }
    }

    /// Blocking variant of [`prompt`](Self::prompt).
    pub fn prompt_blocking(&self, params: &PromptParams) -> Result<String> {
        block_on(self.prompt(params))?
    }

    /// Tool definition for the host framework. The handler returns a JSON string.
    pub fn definition(&self) -> ToolDefinition {
        let parameters = with_common_parameters(
            ToolParametersBuilder::new_object(),
            "Question or instruction to be answered using the Gestell collection",
        )
        .add_string("template", Some("Optional prompt template"))
        .add_boolean("cot", Some("Enable chain-of-thought reasoning"))
        .add_array(
            "messages",
            Some("Prior conversation, oldest first"),
            json!({
                "type": "object",
                "properties": {
                    "role": {"type": "string"},
                    "content": {"type": "string"}
                },
                "required": ["role", "content"]
            }),
        )
        .additional_properties(false)
        .build();

        let tool = self.clone();
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            parameters,
            Arc::new(move |args: &Value| -> color_eyre::Result<Value> {
                let params: PromptParams = parse_args(args)?;
                Ok(Value::String(tool.prompt_blocking(&params)?))
            }),
        )
    }
}
