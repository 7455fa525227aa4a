use async_openai::types::ChatCompletionMessageToolCall;
use serde_json::Value;
use std::fmt::{self, Display};

/// ホストモデルの応答: テキストかツール呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallDecision {
    Text(String),
    /// `arguments` is the raw JSON text of the named-argument mapping.
    ToolCall { name: String, arguments: String },
}

impl From<&ChatCompletionMessageToolCall> for ToolCallDecision {
    fn from(call: &ChatCompletionMessageToolCall) -> Self {
        ToolCallDecision::ToolCall {
            name: call.function.name.clone(),
            arguments: call.function.arguments.clone(),
        }
    }
}

/// ツール呼び出しの解決結果。失敗もパニックせずバリアントで返す
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResolution {
    ModelText(String),
    Executed { name: String, result: Value },
    ToolNotFound { requested: String },
    ArgumentsParseError { name: String, raw: String, error: String },
    ExecutionError { name: String, error: String },
}

impl ToolResolution {
    /// ホストに失敗として返すべき結果かどうか
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ToolResolution::ToolNotFound { .. }
                | ToolResolution::ArgumentsParseError { .. }
                | ToolResolution::ExecutionError { .. }
        )
    }

    /// Text to feed back to the host model as the tool message.
    pub fn to_tool_message(&self) -> String {
        match self {
            ToolResolution::ModelText(t) => t.clone(),
            ToolResolution::Executed { result: Value::String(s), .. } => s.clone(),
            ToolResolution::Executed { result, .. } => result.to_string(),
            ToolResolution::ToolNotFound { requested } => format!("tool {requested} does not exist"),
            ToolResolution::ArgumentsParseError { name, error, .. } => {
                format!("tool {name}: could not parse arguments: {error}")
            }
            ToolResolution::ExecutionError { error, .. } => error.clone(),
        }
    }
}

// ログ用の一行表現。引数や結果の本文は長さだけ出す
impl Display for ToolCallDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolCallDecision::Text(t) => write!(f, "text[{}B]", t.len()),
            ToolCallDecision::ToolCall { name, arguments } => write!(f, "{name}(args {}B)", arguments.len()),
        }
    }
}

impl Display for ToolResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolResolution::ModelText(t) => write!(f, "model text[{}B]", t.len()),
            ToolResolution::Executed { name, result } => match result {
                Value::Array(items) => write!(f, "{name}: ok, {} records", items.len()),
                Value::String(s) => write!(f, "{name}: ok, answer[{}B]", s.len()),
                _ => write!(f, "{name}: ok"),
            },
            ToolResolution::ToolNotFound { requested } => write!(f, "{requested}: unknown tool"),
            ToolResolution::ArgumentsParseError { name, error, .. } => write!(f, "{name}: bad arguments ({error})"),
            ToolResolution::ExecutionError { name, error } => write!(f, "{name}: failed ({error})"),
        }
    }
}
