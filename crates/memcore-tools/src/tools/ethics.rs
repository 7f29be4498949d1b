//! Ethics tool — screen an action against the configured deny-rules

use crate::registry::{parse_args, Tool};
use crate::SharedStore;
use memcore_core::{Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckArgs {
    action: String,
}

pub struct CheckEthicsTool {
    store: SharedStore,
}

impl CheckEthicsTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for CheckEthicsTool {
    fn name(&self) -> &str {
        "check_ethics"
    }

    fn description(&self) -> &str {
        "Check a proposed action against the configured rules. Reports every matching rule."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "description": "Description of the proposed action"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: CheckArgs = parse_args(args)?;
        if args.action.trim().is_empty() {
            return Err(Error::invalid_argument("action must not be empty"));
        }
        let verdict = self.store.read().await.check_ethics(&args.action);
        if !verdict.allowed {
            info!("check_ethics: {} rule(s) matched", verdict.violations.len());
        }
        Ok(serde_json::to_value(verdict)?)
    }
}
