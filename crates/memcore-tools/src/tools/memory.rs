//! File-backed load tools — memory log, introspection snapshot, auxiliary JSON
//!
//! All of these read from disk at call time through the store.

use crate::registry::Tool;
use crate::SharedStore;
use memcore_core::Result;
use serde_json::{json, Value};

fn no_params() -> Value {
    json!({ "type": "object", "properties": {} })
}

pub struct LoadMemoryLogTool {
    store: SharedStore,
}

impl LoadMemoryLogTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for LoadMemoryLogTool {
    fn name(&self) -> &str {
        "load_memory_log"
    }

    fn description(&self) -> &str {
        "Return the full text of the narrative memory log."
    }

    fn input_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        let log = self.store.read().await.load_memory_log()?;
        Ok(serde_json::to_value(log)?)
    }
}

pub struct LoadIntrospectionStateTool {
    store: SharedStore,
}

impl LoadIntrospectionStateTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for LoadIntrospectionStateTool {
    fn name(&self) -> &str {
        "load_introspection_state"
    }

    fn description(&self) -> &str {
        "Return the latest introspection snapshot as a JSON object."
    }

    fn input_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        self.store.read().await.load_introspection_state()
    }
}

pub struct LoadParametersTool {
    store: SharedStore,
}

impl LoadParametersTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for LoadParametersTool {
    fn name(&self) -> &str {
        "load_parameters"
    }

    fn description(&self) -> &str {
        "Return the auxiliary parameters file."
    }

    fn input_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        self.store.read().await.load_parameters()
    }
}

pub struct LoadLearningsTool {
    store: SharedStore,
}

impl LoadLearningsTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for LoadLearningsTool {
    fn name(&self) -> &str {
        "load_learnings"
    }

    fn description(&self) -> &str {
        "Return the accumulated learnings file."
    }

    fn input_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        self.store.read().await.load_learnings()
    }
}
