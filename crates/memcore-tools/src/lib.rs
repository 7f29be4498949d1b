//! memcore tools — one tool per RPC tool method
//!
//! Each tool is a self-contained file in src/tools/ holding a handle to the
//! shared MemoryStore. To add a tool: create the file, implement the Tool
//! trait, register below.

pub mod registry;
pub mod tools;

pub use registry::{parse_args, positive_limit, Tool, ToolRegistry};

use memcore_memory::MemoryStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store handle shared by the server and every tool.
pub type SharedStore = Arc<RwLock<MemoryStore>>;

pub fn shared_store(store: MemoryStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}

/// Create the default tool registry with all builtin tools.
pub fn create_default_registry(store: &SharedStore) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // --- File loads (read-only) ---
    registry.register(tools::memory::LoadMemoryLogTool::new(store.clone()));
    registry.register(tools::memory::LoadIntrospectionStateTool::new(store.clone()));
    registry.register(tools::memory::LoadParametersTool::new(store.clone()));
    registry.register(tools::memory::LoadLearningsTool::new(store.clone()));

    // --- Search ---
    registry.register(tools::search::SearchMemoriesTool::new(store.clone()));
    registry.register(tools::search::ReindexTool::new(store.clone()));

    // --- Wonders ---
    registry.register(tools::wonder::GenerateWonderTool::new(store.clone()));
    registry.register(tools::wonder::ListWondersTool::new(store.clone()));

    // --- Rules and status ---
    registry.register(tools::ethics::CheckEthicsTool::new(store.clone()));
    registry.register(tools::status::CollaboratorProfileTool::new(store.clone()));
    registry.register(tools::status::MemoryStatusTool::new(store.clone()));

    registry
}
