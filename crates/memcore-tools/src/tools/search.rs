//! Search tools — ranked memory search and explicit reindex

use crate::registry::{parse_args, positive_limit, Tool};
use crate::SharedStore;
use memcore_core::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchArgs {
    #[serde(default)]
    query: String,
    limit: Option<i64>,
}

pub struct SearchMemoriesTool {
    store: SharedStore,
}

impl SearchMemoriesTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for SearchMemoriesTool {
    fn name(&self) -> &str {
        "search_memories"
    }

    fn description(&self) -> &str {
        "Rank memory log entries against a query by TF-IDF cosine similarity. \
         Ties go to the most recent entry."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Free-text query; empty matches everything with score 0"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of results (default 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let args: SearchArgs = parse_args(args)?;
        let limit = positive_limit(args.limit)?;
        debug!("search_memories: query={:?} limit={:?}", args.query, limit);

        let results = self.store.read().await.search(&args.query, limit)?;
        Ok(json!({
            "query": args.query,
            "results": results,
        }))
    }
}

pub struct ReindexTool {
    store: SharedStore,
}

impl ReindexTool {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for ReindexTool {
    fn name(&self) -> &str {
        "reindex"
    }

    fn description(&self) -> &str {
        "Rebuild the search index from the memory log on disk."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn is_read_only(&self) -> bool {
        false
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        let (entries, terms) = self.store.write().await.reindex()?;
        Ok(json!({ "entries": entries, "terms": terms }))
    }
}
