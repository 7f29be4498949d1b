//! Wonder tools — generate a templated question, list the wonder log

use crate::registry::{parse_args, positive_limit, Tool};
use crate::SharedStore;
use memcore_core::{Result, WonderType};
use serde::Deserialize;
use serde_json::{json, Value};

fn type_names() -> Vec<&'static str> {
    WonderType::all().iter().map(|t| t.name()).collect()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerateArgs {
    #[serde(rename = "type", alias = "wonder_type")]
    wonder_type: String,
    context: String,
    intensity: Option<f64>,
}

pub struct GenerateWonderTool {
    store: SharedStore,
}

impl GenerateWonderTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for GenerateWonderTool {
    fn name(&self) -> &str {
        "generate_wonder"
    }

    fn description(&self) -> &str {
        "Generate a question of the given type about a context and append it to the wonder log."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": type_names(),
                },
                "context": {
                    "type": "string",
                    "description": "What the question is about"
                },
                "intensity": {
                    "type": "number",
                    "minimum": 0.0,
                    "maximum": 1.0,
                    "description": "0.0-1.0, default 0.5"
                }
            },
            "required": ["type", "context"]
        })
    }

    fn is_read_only(&self) -> bool {
        false
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: GenerateArgs = parse_args(args)?;
        let wonder = self
            .store
            .read()
            .await
            .generate_wonder(&args.wonder_type, &args.context, args.intensity)?;
        Ok(serde_json::to_value(wonder)?)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ListArgs {
    limit: Option<i64>,
    #[serde(rename = "type", alias = "wonder_type")]
    wonder_type: Option<String>,
}

pub struct ListWondersTool {
    store: SharedStore,
}

impl ListWondersTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for ListWondersTool {
    fn name(&self) -> &str {
        "list_wonders"
    }

    fn description(&self) -> &str {
        "List logged wonders, most recent first, optionally filtered by type."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": { "type": "integer", "minimum": 1 },
                "type": { "type": "string", "enum": type_names() }
            }
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: ListArgs = parse_args(args)?;
        let limit = positive_limit(args.limit)?;
        let wonder_type = args
            .wonder_type
            .as_deref()
            .map(str::parse::<WonderType>)
            .transpose()?;
        let wonders = self.store.read().await.list_wonders(limit, wonder_type)?;
        Ok(json!({ "wonders": wonders }))
    }
}
