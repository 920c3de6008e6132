// src/utils/html_debug.rs
use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::utils::error::AppError;

/// What a highlighted range in an annotated page marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Segments,
    Heading,
    Engagement,
    Table,
}

impl Highlight {
    fn name(self) -> &'static str {
        match self {
            Highlight::Segments => "segments",
            Highlight::Heading => "heading",
            Highlight::Engagement => "engagement",
            Highlight::Table => "table",
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            Highlight::Segments => "highlight-segments",
            Highlight::Heading => "highlight-heading",
            Highlight::Engagement => "highlight-engagement",
            Highlight::Table => "highlight-table",
        }
    }
}

/// Label patterns highlighted in annotated debug copies of a report page.
pub const LABEL_PATTERNS: &[(&str, Highlight)] = &[
    (r"Total segments:\s*\d+", Highlight::Segments),
    (r"Chill mode segments:\s*\d+", Highlight::Segments),
    (r"Experimental mode segments:\s*\d+", Highlight::Segments),
    (r"Engagement Rate Analysis \((?:time|distance)\)", Highlight::Heading),
    (r"Overall engagement rate:\s*[\d.]+%", Highlight::Engagement),
    (r"Chill mode:\s*[\d.]+%", Highlight::Engagement),
    (r"Experimental mode:\s*[\d.]+%", Highlight::Engagement),
    (r"(?i)<h2[^>]*>", Highlight::Table),
    (r"(?i)<table[^>]*>", Highlight::Table),
];

/// Wraps each highlighted byte range of `html` in a `<span>` tagged with its kind.
/// At a shared start the longest range wins; ranges overlapping an earlier highlight are dropped.
pub fn annotate_html(html: &str, highlights: &[(usize, usize, Highlight)]) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    out.push_str(".highlight-segments { background-color: #FFFF00; }\n");
    out.push_str(".highlight-heading { background-color: #FFA500; }\n");
    out.push_str(".highlight-engagement { background-color: #90EE90; }\n");
    out.push_str(".highlight-table { background-color: #ADD8E6; }\n");
    out.push_str("</style>\n</head>\n<body>\n");

    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|h| (h.0, Reverse(h.1)));

    let mut last_pos = 0;
    for (start, end, kind) in sorted {
        if start < last_pos || end > html.len() {
            continue;
        }
        out.push_str(&html[last_pos..start]);
        out.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            kind.css_class(),
            start,
            end,
            kind.name()
        ));
        out.push_str(&html[start..end]);
        out.push_str("</span>");
        last_pos = end;
    }
    out.push_str(&html[last_pos..]);
    out.push_str("\n</body>\n</html>");
    out
}

/// Creates a debug copy of a report page with every match of `patterns` highlighted.
pub fn create_debug_html(
    html: &str,
    path: &Path,
    patterns: &[(&str, Highlight)],
) -> Result<(), AppError> {
    let mut highlights = Vec::new();
    for (pattern, kind) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;
        highlights.extend(re.find_iter(html).map(|m| (m.start(), m.end(), *kind)));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, annotate_html(html, &highlights))?;
    tracing::info!("Saved annotated debug HTML to {}", path.display());
    Ok(())
}
