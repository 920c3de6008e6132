// src/extractors/text.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// How far past an "Engagement Rate Analysis" heading the rate fields may appear, in characters.
pub const SECTION_WINDOW_CHARS: usize = 500;

const SECTION_HEADING_PREFIX: &str = "Engagement Rate Analysis";

// --- Regex Patterns (Lazy Static) ---
pub static TOTAL_SEGMENTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Total segments:\s*(\d+)").expect("Failed to compile TOTAL_SEGMENTS_RE")
});

pub static CHILL_SEGMENTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Chill mode segments:\s*(\d+)").expect("Failed to compile CHILL_SEGMENTS_RE")
});

pub static EXPERIMENTAL_SEGMENTS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Experimental mode segments:\s*(\d+)")
        .expect("Failed to compile EXPERIMENTAL_SEGMENTS_RE")
});

static OVERALL_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Overall engagement rate:\s*([\d.]+)%\s*\(([^)]+)\)")
        .expect("Failed to compile OVERALL_RATE_RE")
});

static CHILL_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Chill mode:\s*([\d.]+)%\s*\(([^)]+)\)").expect("Failed to compile CHILL_RATE_RE")
});

static EXPERIMENTAL_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Experimental mode:\s*([\d.]+)%\s*\(([^)]+)\)")
        .expect("Failed to compile EXPERIMENTAL_RATE_RE")
});

// --- Data Structures ---
/// Segment counts for one report. Every field is always present, zero when its label is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentCounts {
    pub total: i64,
    pub chill_mode: i64,
    pub experimental_mode: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementSection {
    pub title: String,
    pub overall: f64,
    pub overall_detail: String,
    pub chill_mode: f64,
    pub chill_mode_detail: String,
    pub experimental_mode: f64,
    pub experimental_mode_detail: String,
}

/// Collapses every whitespace run (spaces, tabs, newlines) into one space and trims both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the first capture group of `pattern` in `text` as an integer, or `default`.
pub fn extract_int(pattern: &Regex, text: &str, default: i64) -> i64 {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(default)
}

pub fn extract_segments(text: &str) -> SegmentCounts {
    SegmentCounts {
        total: extract_int(&TOTAL_SEGMENTS_RE, text, 0),
        chill_mode: extract_int(&CHILL_SEGMENTS_RE, text, 0),
        experimental_mode: extract_int(&EXPERIMENTAL_SEGMENTS_RE, text, 0),
    }
}

/// Parses a `<rate>% (<detail>)` match. A rate that is not a valid float counts as no match.
fn extract_rate(pattern: &Regex, window: &str) -> Option<(f64, String)> {
    let caps = pattern.captures(window)?;
    let rate = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let detail = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some((rate, detail))
}

/// Slice of `text` starting at `start` and spanning at most `max_chars` characters,
/// cut short at the next section heading.
fn section_window(text: &str, start: usize, max_chars: usize) -> &str {
    let rest = &text[start..];
    let char_limit = rest
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());

    let heading_limit = rest[SECTION_HEADING_PREFIX.len()..]
        .find(SECTION_HEADING_PREFIX)
        .map(|idx| idx + SECTION_HEADING_PREFIX.len())
        .unwrap_or(rest.len());

    &rest[..char_limit.min(heading_limit)]
}

/// Extracts the "Engagement Rate Analysis (<section_name>)" block from flattened text.
///
/// Returns `None` when the heading is missing or when no overall rate follows it
/// within the section window. Chill and experimental rates default to `0.0` / `""`.
pub fn extract_engagement_section(section_name: &str, text: &str) -> Option<EngagementSection> {
    let title = format!("{} ({})", SECTION_HEADING_PREFIX, section_name);
    let start = text.find(&title)?;
    let window = section_window(text, start, SECTION_WINDOW_CHARS);

    let Some((overall, overall_detail)) = extract_rate(&OVERALL_RATE_RE, window) else {
        tracing::debug!("Found '{}' but no overall engagement rate inside its window", title);
        return None;
    };
    let (chill_mode, chill_mode_detail) = extract_rate(&CHILL_RATE_RE, window).unwrap_or_default();
    let (experimental_mode, experimental_mode_detail) =
        extract_rate(&EXPERIMENTAL_RATE_RE, window).unwrap_or_default();

    Some(EngagementSection {
        title,
        overall,
        overall_detail,
        chill_mode,
        chill_mode_detail,
        experimental_mode,
        experimental_mode_detail,
    })
}
