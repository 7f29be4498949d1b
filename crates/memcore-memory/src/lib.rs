//! memcore memory — file-backed memory, search, and wonders
//!
//! - `log`: narrative markdown log, split into dated entries
//! - `files`: JSON snapshot and auxiliary file loading
//! - `index`: TF-IDF index with cosine ranking
//! - `wonder`: templated question generator and its JSONL log
//! - `ethics`: regex deny-rules for action screening
//! - `store`: `MemoryStore`, the owner of all of the above

pub mod ethics;
pub mod files;
pub mod index;
pub mod log;
pub mod store;
pub mod wonder;

pub use ethics::{EthicsChecker, EthicsVerdict, Violation};
pub use index::TfIdfIndex;
pub use store::{FileStatus, LoadReport, MemoryLogContent, MemoryStore, StoreStatus};
pub use wonder::{WonderGenerator, WonderLog};
