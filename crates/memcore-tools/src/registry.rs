//! Tool registry and trait definitions
//!
//! Each tool is a self-contained module implementing the Tool trait.
//! Tools can be added/removed by editing the tools/ directory and
//! the create_default_registry() function in lib.rs.

use memcore_core::{Error, Result, ToolAnnotations, ToolDescriptor};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The Tool trait — implement this to expose a new RPC tool method.
///
/// Each tool is a standalone unit that can be registered with a ToolRegistry.
/// To add a new tool: create a file in tools/, implement this trait, register
/// it in create_default_registry().
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name, also the direct RPC method name (e.g. "search_memories").
    fn name(&self) -> &str;

    /// Human-readable description for `tools/list`.
    fn description(&self) -> &str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> Value;

    /// Whether this tool only reads state (no side effects).
    fn is_read_only(&self) -> bool {
        true
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<Value>;

    /// Convert to the `tools/list` descriptor format.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
            annotations: ToolAnnotations {
                read_only_hint: self.is_read_only(),
            },
        }
    }
}

/// Deserialize tool arguments. `null` counts as an empty object; shape
/// errors become `InvalidArgument`.
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| Error::invalid_argument(e.to_string()))
}

/// Optional positive integer argument, converted to usize.
pub fn positive_limit(limit: Option<i64>) -> Result<Option<usize>> {
    match limit {
        None => Ok(None),
        Some(n) if n >= 1 => usize::try_from(n)
            .map(Some)
            .map_err(|_| Error::invalid_argument(format!("limit too large: {}", n))),
        Some(n) => Err(Error::invalid_argument(format!("limit must be at least 1, got {}", n))),
    }
}

pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: BTreeMap::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value> {
        match self.tools.get(name) {
            Some(tool) => tool.execute(args).await,
            None => Err(Error::MethodNotFound(name.to_string())),
        }
    }

    /// Descriptors for `tools/list`, sorted by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }
}
