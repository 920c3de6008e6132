// src/reports/models.rs
use indexmap::IndexMap;
use serde::Serialize;

use crate::extractors::table::TableRecord;
use crate::extractors::text::{EngagementSection, SegmentCounts};

/// One named report page to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSource {
    pub name: String,
    pub url: String,
}

impl ReportSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

/// Unparsed HTML exactly as fetched; consumed by extraction and never persisted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub page_title: Option<String>,
    pub url: String,
    pub branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub metadata: ReportMetadata,
    pub segments: SegmentCounts,
    pub sections: IndexMap<String, EngagementSection>,
    pub tables: IndexMap<String, TableRecord>,
}

/// Output of one run: every report that was fetched and extracted, keyed by report name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDocument {
    pub timestamp: String,
    pub data: IndexMap<String, ReportRecord>,
}

impl ResultDocument {
    pub fn new(timestamp: String) -> Self {
        Self { timestamp, data: IndexMap::new() }
    }
}
