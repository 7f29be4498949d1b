//! JSON snapshot and auxiliary file loading

use memcore_core::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Read and parse a JSON file. Missing is `NotFound`, malformed is `Parse`.
pub fn load_json(path: &Path, what: &str) -> Result<Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::not_found(format!("{} {}", what, path.display())));
        }
        Err(e) => return Err(Error::Io(e)),
    };
    serde_json::from_str(&content)
        .map_err(|e| Error::parse(format!("{} {}: {}", what, path.display(), e)))
}

/// Like [`load_json`], but the document must be a JSON object.
pub fn load_json_object(path: &Path, what: &str) -> Result<Value> {
    let value = load_json(path, what)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(Error::parse(format!(
            "{} {}: expected a JSON object",
            what,
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_malformed_and_wrong_shape() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("missing.json");
        assert!(matches!(load_json(&missing, "snapshot"), Err(Error::NotFound(_))));

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, "{ \"open\": ").unwrap();
        assert!(matches!(load_json(&bad, "snapshot"), Err(Error::Parse(_))));

        let list = tmp.path().join("list.json");
        fs::write(&list, "[1, 2]").unwrap();
        assert!(load_json(&list, "learnings").unwrap().is_array());
        assert!(matches!(load_json_object(&list, "snapshot"), Err(Error::Parse(_))));
    }
}
