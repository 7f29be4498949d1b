//! Core types for memcore

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One session block of the narrative memory log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// 0-based position in the log. Higher is more recent.
    pub index: usize,
    /// Parsed from the heading when it carries a date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub title: String,
    pub content: String,
}

impl MemoryEntry {
    /// Heading and body together, as indexed by search.
    pub fn searchable_text(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }
}

/// Search hit returned by `search_memories`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub entry: MemoryEntry,
    pub score: f64,
}

/// Category of a generated wonder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WonderType {
    Existential,
    Experiential,
    Relational,
    Temporal,
    Practical,
    Aspirational,
    Metacognitive,
}

impl WonderType {
    pub fn all() -> &'static [WonderType] {
        &[
            WonderType::Existential,
            WonderType::Experiential,
            WonderType::Relational,
            WonderType::Temporal,
            WonderType::Practical,
            WonderType::Aspirational,
            WonderType::Metacognitive,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            WonderType::Existential => "existential",
            WonderType::Experiential => "experiential",
            WonderType::Relational => "relational",
            WonderType::Temporal => "temporal",
            WonderType::Practical => "practical",
            WonderType::Aspirational => "aspirational",
            WonderType::Metacognitive => "metacognitive",
        }
    }
}

impl std::fmt::Display for WonderType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for WonderType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WonderType::all()
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let valid: Vec<&str> = WonderType::all().iter().map(|t| t.name()).collect();
                Error::invalid_argument(format!(
                    "unknown wonder type '{}', expected one of: {}",
                    s,
                    valid.join(", ")
                ))
            })
    }
}

/// A generated question. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wonder {
    pub id: String,
    #[serde(rename = "type")]
    pub wonder_type: WonderType,
    pub context: String,
    pub intensity: f64,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

/// Static description of the human collaborator. Display only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollaboratorProfile {
    pub name: String,
    #[serde(default)]
    pub communication_style: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
