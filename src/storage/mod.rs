// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::reports::models::ResultDocument;
use crate::utils::error::StorageError;

pub const DEFAULT_RESULTS_PATH: &str = "public/data.json";

pub struct StorageManager {
    results_path: PathBuf,
}

impl StorageManager {
    pub fn new<P: AsRef<Path>>(results_path: P) -> Self {
        Self { results_path: results_path.as_ref().to_path_buf() }
    }

    pub fn results_path(&self) -> &Path {
        &self.results_path
    }

    /// Writes the result document as pretty-printed JSON, creating the parent directory if needed.
    pub fn save_results(&self, results: &ResultDocument) -> Result<PathBuf, StorageError> {
        if let Some(parent) = self.results_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        let json = serde_json::to_string_pretty(results)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&self.results_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved results to {}", self.results_path.display());
        Ok(self.results_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::PageExtractor;
    use crate::reports::models::RawDocument;

    #[test]
    fn creates_missing_directory_and_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("public").join("data.json");
        let storage = StorageManager::new(&path);

        let mut results = ResultDocument::new("2026-10-14T08:00:00.000000+00:00".into());
        let raw = RawDocument {
            url: "https://example.test/r.html".into(),
            html: "<h1>R</h1>".into(),
        };
        results.data.insert("master".into(), PageExtractor::new().extract_report(&raw));

        let written = storage.save_results(&results).unwrap();
        assert_eq!(written, path);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(concat!(
            "{\n  \"timestamp\": \"2026-10-14T08:00:00.000000+00:00\",\n",
            "  \"data\": {\n    \"master\": {"
        )));

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["data"]["master"]["metadata"]["page_title"], "R");
        assert!(parsed["data"]["master"]["metadata"]["branch_name"].is_null());
        assert_eq!(parsed["data"]["master"]["segments"]["total"], 0);
    }

    #[test]
    fn write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // Target path is an existing directory, so the write must fail.
        let storage = StorageManager::new(dir.path());
        let err = storage.save_results(&ResultDocument::new("t".into())).unwrap_err();
        assert!(matches!(err, StorageError::IoError(_)));
    }
}
