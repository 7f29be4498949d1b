//! MemoryStore — everything the tool server knows about the memory directory
//!
//! File contents are read from disk on every `load_*` call, so a file
//! created after startup is visible immediately. Only the search index is
//! cached; it changes only through `initialize` and `reindex`.

use crate::ethics::{EthicsChecker, EthicsVerdict};
use crate::files;
use crate::index::TfIdfIndex;
use crate::log;
use crate::wonder::{WonderGenerator, WonderLog};
use memcore_core::{
    CollaboratorProfile, Error, FileSpec, MemcoreConfig, Result, ScoredEntry, Wonder, WonderType,
};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{error, info, warn};

pub const MEMORY_LOG: &str = "memory_log";
pub const INTROSPECTION: &str = "introspection";
pub const PARAMETERS: &str = "parameters";
pub const LEARNINGS: &str = "learnings";

/// Result of a successful `initialize`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<String>,
    pub entries: usize,
    pub terms: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileStatus {
    pub name: String,
    pub path: PathBuf,
    pub required: bool,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub initialized: bool,
    pub memory_dir: PathBuf,
    pub files: Vec<FileStatus>,
    pub indexed_entries: usize,
    pub indexed_terms: usize,
    pub wonder_log: Option<PathBuf>,
    pub ethics_rules: usize,
}

/// Full text of the narrative log.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryLogContent {
    pub path: PathBuf,
    pub content: String,
    pub entries: usize,
}

pub struct MemoryStore {
    config: MemcoreConfig,
    index: TfIdfIndex,
    generator: WonderGenerator,
    wonder_log: Option<WonderLog>,
    ethics: EthicsChecker,
    initialized: bool,
}

impl MemoryStore {
    pub fn new(config: MemcoreConfig) -> Result<Self> {
        config.validate()?;
        let ethics = EthicsChecker::new(&config.ethics.rules)?;
        let generator = WonderGenerator::new(config.wonder.default_intensity);
        let wonder_log = config.wonder_log_path().map(WonderLog::new);
        Ok(Self {
            config,
            index: TfIdfIndex::default(),
            generator,
            wonder_log,
            ethics,
            initialized: false,
        })
    }

    pub fn config(&self) -> &MemcoreConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn index(&self) -> &TfIdfIndex {
        &self.index
    }

    fn file_specs(&self) -> Vec<(&'static str, FileSpec)> {
        let files = &self.config.files;
        let mut specs = vec![
            (MEMORY_LOG, files.memory_log.clone()),
            (INTROSPECTION, files.introspection.clone()),
        ];
        if let Some(spec) = &files.parameters {
            specs.push((PARAMETERS, spec.clone()));
        }
        if let Some(spec) = &files.learnings {
            specs.push((LEARNINGS, spec.clone()));
        }
        specs
    }

    /// Read every configured file and rebuild the index. A missing or
    /// unreadable required file fails the whole load; optional ones are
    /// skipped with a warning.
    pub fn initialize(&mut self) -> Result<LoadReport> {
        self.initialized = false;
        let mut report = LoadReport::default();

        for (name, spec) in self.file_specs() {
            let path = self.config.resolve(&spec.path);
            let outcome = match name {
                MEMORY_LOG => log::read_log(&path).map(|_| ()),
                INTROSPECTION => files::load_json_object(&path, name).map(|_| ()),
                _ => files::load_json(&path, name).map(|_| ()),
            };
            match outcome {
                Ok(()) => {
                    info!("Loaded {} from {}", name, path.display());
                    report.loaded.push(name.to_string());
                }
                Err(e) if spec.required => {
                    error!("Required {} unavailable: {}", name, e);
                    return Err(Error::InitFailed(format!("required {} unavailable: {}", name, e)));
                }
                Err(e) => {
                    warn!("Skipping optional {}: {}", name, e);
                    report.skipped.push(name.to_string());
                }
            }
        }

        let (entries, terms) = self.reindex()?;
        report.entries = entries;
        report.terms = terms;
        self.initialized = true;
        info!(
            "Memory initialized: {} loaded, {} skipped, {} entries indexed",
            report.loaded.len(),
            report.skipped.len(),
            entries
        );
        Ok(report)
    }

    /// Rebuild the search index from the memory log on disk. Returns
    /// (entries, distinct terms). An absent optional log yields an empty index.
    pub fn reindex(&mut self) -> Result<(usize, usize)> {
        let spec = &self.config.files.memory_log;
        let path = self.config.resolve(&spec.path);
        let entries = match log::read_log(&path) {
            Ok(text) => log::parse_entries(&text),
            Err(Error::NotFound(_)) if !spec.required => Vec::new(),
            Err(e) => return Err(e),
        };
        self.index = TfIdfIndex::build(entries);
        info!(
            "Indexed {} entries ({} terms)",
            self.index.len(),
            self.index.vocabulary_size()
        );
        Ok((self.index.len(), self.index.vocabulary_size()))
    }

    pub fn load_memory_log(&self) -> Result<MemoryLogContent> {
        let path = self.config.resolve(&self.config.files.memory_log.path);
        let content = log::read_log(&path)?;
        let entries = log::parse_entries(&content).len();
        Ok(MemoryLogContent { path, content, entries })
    }

    pub fn load_introspection_state(&self) -> Result<Value> {
        let path = self.config.resolve(&self.config.files.introspection.path);
        files::load_json_object(&path, "introspection snapshot")
    }

    pub fn load_parameters(&self) -> Result<Value> {
        self.load_auxiliary(PARAMETERS, self.config.files.parameters.as_ref())
    }

    pub fn load_learnings(&self) -> Result<Value> {
        self.load_auxiliary(LEARNINGS, self.config.files.learnings.as_ref())
    }

    fn load_auxiliary(&self, name: &str, spec: Option<&FileSpec>) -> Result<Value> {
        let spec = spec.ok_or_else(|| Error::not_found(format!("{} file is not configured", name)))?;
        files::load_json(&self.config.resolve(&spec.path), name)
    }

    /// Ranked search over the index. `limit` defaults to the configured
    /// default and must be within 1..=max_limit.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<ScoredEntry>> {
        let limit = limit.unwrap_or(self.config.search.default_limit);
        if limit == 0 || limit > self.config.search.max_limit {
            return Err(Error::invalid_argument(format!(
                "limit must be within 1-{}, got {}",
                self.config.search.max_limit, limit
            )));
        }
        self.index.search(query, limit)
    }

    /// Parse the type, fill its template, and append the result to the
    /// wonder log. Nothing is written when any argument is invalid.
    pub fn generate_wonder(
        &self,
        wonder_type: &str,
        context: &str,
        intensity: Option<f64>,
    ) -> Result<Wonder> {
        let wonder_type: WonderType = wonder_type.parse()?;
        let wonder = self.generator.generate(wonder_type, context, intensity)?;
        if let Some(log) = &self.wonder_log {
            log.append(&wonder)?;
        }
        info!("Generated {} wonder {}", wonder.wonder_type, wonder.id);
        Ok(wonder)
    }

    /// Logged wonders, most recent first.
    pub fn list_wonders(
        &self,
        limit: Option<usize>,
        wonder_type: Option<WonderType>,
    ) -> Result<Vec<Wonder>> {
        let Some(log) = &self.wonder_log else {
            return Ok(Vec::new());
        };
        let wonders = log
            .read_all()?
            .into_iter()
            .rev()
            .filter(|w| wonder_type.map_or(true, |t| w.wonder_type == t))
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(wonders)
    }

    pub fn check_ethics(&self, action: &str) -> EthicsVerdict {
        self.ethics.check(action)
    }

    pub fn collaborator(&self) -> Option<&CollaboratorProfile> {
        self.config.collaborator.as_ref()
    }

    pub fn status(&self) -> StoreStatus {
        let files = self
            .file_specs()
            .into_iter()
            .map(|(name, spec)| {
                let path = self.config.resolve(&spec.path);
                FileStatus {
                    name: name.to_string(),
                    present: path.is_file(),
                    path,
                    required: spec.required,
                }
            })
            .collect();
        StoreStatus {
            initialized: self.initialized,
            memory_dir: memcore_core::expand_tilde(&self.config.memory_dir),
            files,
            indexed_entries: self.index.len(),
            indexed_terms: self.index.vocabulary_size(),
            wonder_log: self.wonder_log.as_ref().map(|l| l.path().to_path_buf()),
            ethics_rules: self.ethics.len(),
        }
    }
}
