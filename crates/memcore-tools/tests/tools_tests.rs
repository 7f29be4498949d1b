//! Tests for memcore-tools: ToolRegistry, argument parsing, and every builtin tool against a real memory directory

use memcore_core::{Error, MemcoreConfig};
use memcore_memory::MemoryStore;
use memcore_tools::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const LOG: &str = "## 2025-12-01 genesis\nFirst notes on memory persistence.\n\n\
## 2025-12-02 tooling\nWired the tool server to the memory directory.\n";

async fn setup() -> (TempDir, SharedStore, ToolRegistry) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("log.md"), LOG).unwrap();
    let config = MemcoreConfig {
        memory_dir: tmp.path().to_path_buf(),
        ..Default::default()
    };
    let mut store = MemoryStore::new(config).unwrap();
    store.initialize().unwrap();
    let store = shared_store(store);
    let registry = create_default_registry(&store);
    (tmp, store, registry)
}

// ===========================================================================
// ToolRegistry
// ===========================================================================

#[tokio::test]
async fn registry_default_is_empty() {
    let reg = ToolRegistry::new();
    assert!(reg.list().is_empty());
    assert!(reg.descriptors().is_empty());
}

#[tokio::test]
async fn registry_execute_missing_tool() {
    let reg = ToolRegistry::new();
    let err = reg.execute("nonexistent", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::MethodNotFound(_)));
}

#[tokio::test]
async fn create_default_registry_has_all_tools() {
    let (_tmp, _store, reg) = setup().await;
    let names = reg.list();
    for expected in [
        "load_memory_log",
        "load_introspection_state",
        "load_parameters",
        "load_learnings",
        "search_memories",
        "reindex",
        "generate_wonder",
        "list_wonders",
        "check_ethics",
        "get_collaborator_profile",
        "memory_status",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
    assert_eq!(names.len(), 11);
    assert_eq!(reg.descriptors().len(), 11);
}

#[tokio::test]
async fn descriptors_are_sorted_with_object_schemas() {
    let (_tmp, _store, reg) = setup().await;
    let descriptors = reg.descriptors();
    let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(descriptors.iter().all(|d| d.input_schema["type"] == "object"));
}

#[tokio::test]
async fn descriptors_flag_read_only_tools() {
    let (_tmp, _store, reg) = setup().await;
    let read_only = |name: &str| {
        reg.descriptors()
            .into_iter()
            .find(|d| d.name == name)
            .map(|d| d.annotations.read_only_hint)
    };
    assert_eq!(read_only("search_memories"), Some(true));
    assert_eq!(read_only("list_wonders"), Some(true));
    assert_eq!(read_only("generate_wonder"), Some(false));
    assert_eq!(read_only("reindex"), Some(false));

    let wire = serde_json::to_value(reg.descriptors()).unwrap();
    assert!(wire.as_array().unwrap().iter().all(|d| d["annotations"]["readOnlyHint"].is_boolean()));
}

// ===========================================================================
// Argument helpers
// ===========================================================================

#[test]
fn positive_limit_rules() {
    assert_eq!(positive_limit(None).unwrap(), None);
    assert_eq!(positive_limit(Some(3)).unwrap(), Some(3));
    assert!(matches!(positive_limit(Some(0)), Err(Error::InvalidArgument(_))));
    assert!(matches!(positive_limit(Some(-4)), Err(Error::InvalidArgument(_))));
}

// ===========================================================================
// Tools
// ===========================================================================

#[tokio::test]
async fn load_memory_log_tool() {
    let (_tmp, _store, reg) = setup().await;
    let result = reg.execute("load_memory_log", json!(null)).await.unwrap();
    assert_eq!(result["content"], LOG);
    assert_eq!(result["entries"], 2);
}

#[tokio::test]
async fn search_tool_returns_scored_entries() {
    let (_tmp, _store, reg) = setup().await;
    let result = reg
        .execute("search_memories", json!({ "query": "tool server", "limit": 1 }))
        .await
        .unwrap();
    let results = result["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["entry"]["title"], "2025-12-02 tooling");
    assert!(results[0]["score"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn search_tool_rejects_bad_params() {
    let (_tmp, _store, reg) = setup().await;
    let err = reg
        .execute("search_memories", json!({ "query": "x", "limit": -1 }))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));

    let err = reg
        .execute("search_memories", json!({ "query": "x", "bogus": true }))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn generate_wonder_tool() {
    let (tmp, _store, reg) = setup().await;
    let wonder = reg
        .execute(
            "generate_wonder",
            json!({ "type": "temporal", "context": "session continuity", "intensity": 0.8 }),
        )
        .await
        .unwrap();
    assert!(wonder["question"].as_str().unwrap().contains("session continuity"));
    assert_eq!(wonder["intensity"], 0.8);
    assert_eq!(wonder["type"], "temporal");
    assert!(!wonder["id"].as_str().unwrap().is_empty());
    assert!(tmp.path().join("wonders.jsonl").exists());

    let listed = reg.execute("list_wonders", json!({})).await.unwrap();
    assert_eq!(listed["wonders"][0]["id"], wonder["id"]);
}

#[tokio::test]
async fn generate_wonder_tool_invalid_type() {
    let (tmp, _store, reg) = setup().await;
    let err = reg
        .execute("generate_wonder", json!({ "type": "cosmic", "context": "x" }))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(err.to_string().contains("temporal"));
    assert!(!tmp.path().join("wonders.jsonl").exists());

    let err = reg
        .execute("generate_wonder", json!({ "context": "no type" }))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn list_wonders_rejects_unknown_type_filter() {
    let (_tmp, _store, reg) = setup().await;
    let err = reg
        .execute("list_wonders", json!({ "type": "whimsical" }))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn reindex_tool_sees_appended_entries() {
    let (tmp, _store, reg) = setup().await;
    fs::write(
        tmp.path().join("log.md"),
        format!("{}\n## 2025-12-03 third\nNew material.\n", LOG),
    )
    .unwrap();
    let result = reg.execute("reindex", json!({})).await.unwrap();
    assert_eq!(result["entries"], 3);
}

#[tokio::test]
async fn check_ethics_tool_requires_action() {
    let (_tmp, _store, reg) = setup().await;
    let verdict = reg
        .execute("check_ethics", json!({ "action": "summarize the week" }))
        .await
        .unwrap();
    assert_eq!(verdict["allowed"], true);

    let err = reg.execute("check_ethics", json!({ "action": "  " })).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[tokio::test]
async fn profile_and_status_tools() {
    let (_tmp, _store, reg) = setup().await;
    let profile = reg.execute("get_collaborator_profile", json!({})).await.unwrap();
    assert!(profile.is_null());

    let status = reg.execute("memory_status", json!({})).await.unwrap();
    assert_eq!(status["initialized"], true);
    assert_eq!(status["indexed_entries"], 2);
}

#[tokio::test]
async fn introspection_tool_not_found_then_found() {
    let (tmp, _store, reg) = setup().await;
    let err = reg.execute("load_introspection_state", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    fs::create_dir_all(tmp.path().join("introspection")).unwrap();
    fs::write(tmp.path().join("introspection/latest.json"), r#"{"focus":"tests"}"#).unwrap();
    let state = reg.execute("load_introspection_state", json!({})).await.unwrap();
    assert_eq!(state["focus"], "tests");
}
