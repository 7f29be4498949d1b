//! Introspection of the server itself — collaborator profile, store status

use crate::registry::Tool;
use crate::SharedStore;
use memcore_core::Result;
use serde_json::{json, Value};

pub struct CollaboratorProfileTool {
    store: SharedStore,
}

impl CollaboratorProfileTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for CollaboratorProfileTool {
    fn name(&self) -> &str {
        "get_collaborator_profile"
    }

    fn description(&self) -> &str {
        "Return the configured collaborator profile, or null."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        let store = self.store.read().await;
        Ok(serde_json::to_value(store.collaborator())?)
    }
}

pub struct MemoryStatusTool {
    store: SharedStore,
}

impl MemoryStatusTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for MemoryStatusTool {
    fn name(&self) -> &str {
        "memory_status"
    }

    fn description(&self) -> &str {
        "Report configured files, their presence on disk, and index size."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        Ok(serde_json::to_value(self.store.read().await.status())?)
    }
}
