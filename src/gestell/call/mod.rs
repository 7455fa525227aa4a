// ホストからのツール呼び出しを名前でツール定義へ振り分ける

pub mod types;
pub mod resolver;

pub use types::{ToolCallDecision, ToolResolution};
pub use resolver::{resolve_and_execute_tool_call, resolve_tool_calls};
