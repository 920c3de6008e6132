// src/config.rs
use std::path::PathBuf;

use crate::reports::models::ReportSource;
use crate::utils::error::AppError;

/// Report pages scraped when no `--source` is given.
pub const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("master", "https://commaai.github.io/model_reports/master/analyse_branch.html"),
    (
        "wmi",
        "https://commaai.github.io/model_reports/a27b3122-733e-4a65-938b-acfebebbe5e8/100/analyse_branch.html",
    ),
];

/// Everything one run needs, passed explicitly into [`crate::pipeline::run`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sources: Vec<ReportSource>,
    /// When set, raw and annotated HTML for each fetched report is written here.
    pub debug_dir: Option<PathBuf>,
}

pub fn default_sources() -> Vec<ReportSource> {
    DEFAULT_SOURCES.iter().map(|(name, url)| ReportSource::new(*name, *url)).collect()
}

/// Parses a `name=url` command-line value.
pub fn parse_source(value: &str) -> Result<ReportSource, AppError> {
    let (name, url) = value
        .split_once('=')
        .ok_or_else(|| {
            AppError::Config(format!("Expected NAME=URL for --source, got '{}'", value))
        })?;
    let (name, url) = (name.trim(), url.trim());
    if name.is_empty() || url.is_empty() {
        return Err(AppError::Config(format!(
            "Report source '{}' needs both a name and a URL",
            value
        )));
    }
    Ok(ReportSource::new(name, url))
}

/// Resolves the source list: explicit `--source` values replace the defaults entirely.
pub fn resolve_sources(values: &[String]) -> Result<Vec<ReportSource>, AppError> {
    if values.is_empty() {
        return Ok(default_sources());
    }
    let mut sources: Vec<ReportSource> = Vec::with_capacity(values.len());
    for value in values {
        let source = parse_source(value)?;
        if sources.iter().any(|s| s.name == source.name) {
            return Err(AppError::Config(format!(
                "Report source '{}' given more than once",
                source.name
            )));
        }
        sources.push(source);
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_master_then_wmi() {
        let names: Vec<String> = default_sources().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["master", "wmi"]);
        assert_eq!(resolve_sources(&[]).unwrap(), default_sources());
    }

    #[test]
    fn parses_name_and_url() {
        let source = parse_source("nightly=https://example.test/a=b.html").unwrap();
        assert_eq!(source, ReportSource::new("nightly", "https://example.test/a=b.html"));
    }

    #[test]
    fn rejects_malformed_sources() {
        for bad in ["no-equals", "=https://x", "name=", " = "] {
            assert!(matches!(parse_source(bad), Err(AppError::Config(_))), "accepted '{bad}'");
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let values = vec!["a=https://x".to_string(), "a=https://y".to_string()];
        assert!(matches!(resolve_sources(&values), Err(AppError::Config(_))));
    }
}
