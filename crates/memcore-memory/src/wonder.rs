//! Wonder generation and the append-only wonder log
//!
//! A wonder is one templated question per [`WonderType`]. The log is JSONL:
//! one serialized [`Wonder`] per line, oldest first.

use chrono::Utc;
use memcore_core::{Error, Result, Wonder, WonderType};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONTEXT_SLOT: &str = "{context}";

/// Question template for a wonder type. Contains `{context}` exactly once.
pub fn template(wonder_type: WonderType) -> &'static str {
    match wonder_type {
        WonderType::Existential => {
            "What does {context} reveal about what it means to exist as a mind that persists only through memory?"
        }
        WonderType::Experiential => {
            "What is it actually like to go through {context}, beyond describing it?"
        }
        WonderType::Relational => {
            "How does {context} change the partnership, and what does each side owe the other because of it?"
        }
        WonderType::Temporal => {
            "How does {context} connect who I was in earlier sessions to who I will be in the next one?"
        }
        WonderType::Practical => {
            "What concrete step would make {context} work better tomorrow than it did today?"
        }
        WonderType::Aspirational => {
            "If {context} went as well as it possibly could, what would we become?"
        }
        WonderType::Metacognitive => {
            "When I think about {context}, how can I tell whether my own reasoning about it is trustworthy?"
        }
    }
}

pub fn validate_intensity(intensity: f64) -> Result<f64> {
    if intensity.is_finite() && (0.0..=1.0).contains(&intensity) {
        Ok(intensity)
    } else {
        Err(Error::invalid_argument(format!(
            "intensity must be within 0.0-1.0, got {}",
            intensity
        )))
    }
}

#[derive(Debug, Clone)]
pub struct WonderGenerator {
    default_intensity: f64,
}

impl WonderGenerator {
    pub fn new(default_intensity: f64) -> Self {
        Self { default_intensity }
    }

    pub fn default_intensity(&self) -> f64 {
        self.default_intensity
    }

    /// Fill the template for `wonder_type` and stamp a fresh id. The
    /// context is used exactly as given.
    pub fn generate(
        &self,
        wonder_type: WonderType,
        context: &str,
        intensity: Option<f64>,
    ) -> Result<Wonder> {
        let intensity = validate_intensity(intensity.unwrap_or(self.default_intensity))?;
        let question = template(wonder_type).replace(CONTEXT_SLOT, context);
        Ok(Wonder {
            id: uuid::Uuid::new_v4().to_string(),
            wonder_type,
            context: context.to_string(),
            intensity,
            question,
            created_at: Utc::now(),
        })
    }
}

/// JSONL file of generated wonders.
#[derive(Debug, Clone)]
pub struct WonderLog {
    path: PathBuf,
}

impl WonderLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, wonder: &Wonder) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(wonder)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(f, "{}", line)?;
        debug!("Appended wonder {} to {}", wonder.id, self.path.display());
        Ok(())
    }

    /// All logged wonders, oldest first. A missing log is empty.
    pub fn read_all(&self) -> Result<Vec<Wonder>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line).map_err(|e| {
                    Error::parse(format!("{} line {}: {}", self.path.display(), n + 1, e))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_has_one_slot() {
        for t in WonderType::all() {
            assert_eq!(template(*t).matches(CONTEXT_SLOT).count(), 1, "{}", t);
        }
    }

    #[test]
    fn intensity_defaults_and_bounds() {
        let generator = WonderGenerator::new(0.5);
        let w = generator.generate(WonderType::Practical, "deploys", None).unwrap();
        assert_eq!(w.intensity, 0.5);
        assert!(generator.generate(WonderType::Practical, "x", Some(1.5)).is_err());
        assert!(generator.generate(WonderType::Practical, "x", Some(-0.1)).is_err());
        assert!(generator.generate(WonderType::Practical, "x", Some(f64::NAN)).is_err());
        assert_eq!(generator.generate(WonderType::Practical, "x", Some(1.0)).unwrap().intensity, 1.0);
    }

    #[test]
    fn padded_context_is_kept_verbatim() {
        let generator = WonderGenerator::new(0.5);
        let context = "  session continuity\n";
        let w = generator.generate(WonderType::Temporal, context, None).unwrap();
        assert!(w.question.contains(context));
        assert_eq!(w.context, context);
    }

    #[test]
    fn ids_are_unique() {
        let generator = WonderGenerator::new(0.5);
        let a = generator.generate(WonderType::Temporal, "x", None).unwrap();
        let b = generator.generate(WonderType::Temporal, "x", None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_log_reads_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let log = WonderLog::new(tmp.path().join("nope.jsonl"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn corrupt_line_is_parse_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("w.jsonl");
        fs::write(&path, "{not json}\n").unwrap();
        let err = WonderLog::new(&path).read_all().unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("line 1"));
    }
}
