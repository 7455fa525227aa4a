use std::sync::Arc;

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use color_eyre::Result;
use serde_json::{json, Map, Value};

/// ホストがツールを呼んだときに実行するハンドラ
/// 引数は名前付き引数の JSON オブジェクト、戻り値はツールの出力 JSON
pub type ToolHandler = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync + 'static>;

/// JSON Schema describing a tool's arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParameters(Value);

impl ToolParameters {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// `object` 型スキーマのビルダー
#[derive(Debug, Default)]
pub struct ToolParametersBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
    additional_properties: Option<bool>,
}

impl ToolParametersBuilder {
    pub fn new_object() -> Self {
        Self::default()
    }

    fn add(mut self, name: &str, mut schema: Value, description: Option<&str>) -> Self {
        if let (Some(d), Some(obj)) = (description, schema.as_object_mut()) {
            obj.insert("description".into(), json!(d));
        }
        self.properties.insert(name.to_string(), schema);
        self
    }

    pub fn add_string(self, name: &str, description: Option<&str>) -> Self {
        self.add(name, json!({"type": "string"}), description)
    }

    pub fn add_string_enum(self, name: &str, description: Option<&str>, values: &[&str]) -> Self {
        self.add(name, json!({"type": "string", "enum": values}), description)
    }

    pub fn add_boolean(self, name: &str, description: Option<&str>) -> Self {
        self.add(name, json!({"type": "boolean"}), description)
    }

    /// Integer with optional inclusive bounds.
    pub fn add_integer(self, name: &str, description: Option<&str>, min: Option<i64>, max: Option<i64>) -> Self {
        let mut schema = json!({"type": "integer"});
        if let Some(obj) = schema.as_object_mut() {
            if let Some(min) = min {
                obj.insert("minimum".into(), json!(min));
            }
            if let Some(max) = max {
                obj.insert("maximum".into(), json!(max));
            }
        }
        self.add(name, schema, description)
    }

    /// Array property whose items follow `items` (itself a schema).
    pub fn add_array(self, name: &str, description: Option<&str>, items: Value) -> Self {
        self.add(name, json!({"type": "array", "items": items}), description)
    }

    pub fn required(mut self, name: &str) -> Self {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    pub fn build(self) -> ToolParameters {
        let mut schema = json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        });
        if let (Some(allowed), Some(obj)) = (self.additional_properties, schema.as_object_mut()) {
            obj.insert("additionalProperties".into(), json!(allowed));
        }
        ToolParameters(schema)
    }
}

/// ホストに渡すメタデータと、実際に処理するハンドラ
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: ToolParameters,
    pub strict: bool,
    handler: ToolHandler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("strict", &self.strict)
            .finish()
    }
}

impl ToolDefinition {
    pub fn new(
        name: &'static str,
        description: &'static str,
        parameters: ToolParameters,
        handler: ToolHandler,
    ) -> Self {
        Self { name, description, parameters, strict: false, handler }
    }

    /// OpenAI function-calling metadata.
    pub fn function_object(&self) -> FunctionObject {
        FunctionObject {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            parameters: Some(self.parameters.as_value().clone()),
            strict: Some(self.strict),
        }
    }

    pub fn as_chat_tool(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: self.function_object(),
        }
    }

    pub fn execute(&self, args: &Value) -> Result<Value> {
        (self.handler)(args)
    }
}
