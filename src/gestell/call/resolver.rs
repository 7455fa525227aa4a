use async_openai::types::ChatCompletionMessageToolCall;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::types::{ToolCallDecision, ToolResolution};
use crate::gestell::tools::ToolDefinition;

/// ホストの判断をツール一覧に照らして解決し、該当ツールを実行する
/// - `Text` はそのまま `ModelText`
/// - `ToolCall` は名前で検索し、引数オブジェクトを解釈してハンドラを呼ぶ
pub fn resolve_and_execute_tool_call(decision: ToolCallDecision, tools: &[ToolDefinition]) -> ToolResolution {
    let summary = decision.to_string();
    let resolution = match decision {
        ToolCallDecision::Text(t) => ToolResolution::ModelText(t),
        ToolCallDecision::ToolCall { name, arguments } => dispatch(name, arguments, tools),
    };
    if resolution.is_failure() {
        warn!(target: "gestell", call = %summary, %resolution, "tool_call_failed");
    } else {
        debug!(target: "gestell", call = %summary, %resolution, "tool_call_resolved");
    }
    resolution
}

/// 1ターン分のツール呼び出しを順に実行し、呼び出しIDと結果の組で返す
pub fn resolve_tool_calls(
    calls: &[ChatCompletionMessageToolCall],
    tools: &[ToolDefinition],
) -> Vec<(String, ToolResolution)> {
    calls
        .iter()
        .map(|call| (call.id.clone(), resolve_and_execute_tool_call(call.into(), tools)))
        .collect()
}

fn dispatch(name: String, arguments: String, tools: &[ToolDefinition]) -> ToolResolution {
    let Some(tool) = tools.iter().find(|t| t.name == name) else {
        return ToolResolution::ToolNotFound { requested: name };
    };
    let args = match parse_arguments(&arguments) {
        Ok(v) => v,
        Err(error) => return ToolResolution::ArgumentsParseError { name, raw: arguments, error },
    };
    match tool.execute(&args) {
        Ok(result) => ToolResolution::Executed { name, result },
        Err(e) => ToolResolution::ExecutionError { name, error: e.to_string() },
    }
}

/// 空文字は引数なし。それ以外は JSON オブジェクトでなければならない
fn parse_arguments(raw: &str) -> Result<Value, String> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ Value::Object(_)) => Ok(v),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(e.to_string()),
    }
}
