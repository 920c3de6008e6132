// src/extractors/table.rs

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::extractors::text::clean_text;

// --- CSS Selectors (Lazy Static) ---
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static HEADER_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("Failed to compile HEADER_CELL_SELECTOR"));

static DATA_CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("Failed to compile DATA_CELL_SELECTOR"));

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Failed to compile NON_SLUG_RE"));

/// One row of a table, keyed by header label in header order.
pub type TableRow = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRecord {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Turns a table title into a mapping key: lowercase, non-alphanumeric runs
/// become `_`, no leading or trailing `_`. Falls back to `table_<index>`.
pub fn derive_key(title: &str, index: usize) -> String {
    let lowered = title.to_lowercase();
    let slug = NON_SLUG_RE.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        format!("table_{}", index)
    } else {
        slug.to_string()
    }
}

fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

#[derive(Debug, Default)]
pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self {}
    }

    /// Converts every `<table>` in `document` into a [`TableRecord`], keyed by slug.
    ///
    /// Walks the tree once in document order, remembering the last `<h2>` seen so
    /// each table picks up the nearest preceding heading as its title. Later tables
    /// overwrite earlier ones that derive the same key.
    pub fn extract_tables(&self, document: &Html) -> IndexMap<String, TableRecord> {
        let mut tables = IndexMap::new();
        let mut last_heading: Option<String> = None;
        let mut index = 0;

        for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
            match element.value().name() {
                "h2" => last_heading = Some(element_text(element)),
                "table" => {
                    let title = last_heading
                        .clone()
                        .unwrap_or_else(|| format!("Table {}", index + 1));
                    let key = derive_key(&title, index);

                    match self.extract_table(element, title) {
                        Some(record) => {
                            tracing::debug!(
                                "Table {} -> '{}' ({} headers, {} rows)",
                                index,
                                key,
                                record.headers.len(),
                                record.rows.len()
                            );
                            if tables.insert(key.clone(), record).is_some() {
                                tracing::debug!(
                                    "Table key '{}' seen twice; keeping the later table",
                                    key
                                );
                            }
                        }
                        None => tracing::debug!("Skipping table {} ('{}'): no rows", index, key),
                    }
                    index += 1;
                }
                _ => {}
            }
        }

        tables
    }

    /// Builds a record from one table element. The first row supplies the headers;
    /// returns `None` for a table without rows.
    fn extract_table(&self, table: ElementRef, title: String) -> Option<TableRecord> {
        let mut rows = table.select(&ROW_SELECTOR);
        let header_row = rows.next()?;
        let headers: Vec<String> = header_row
            .select(&HEADER_CELL_SELECTOR)
            .map(element_text)
            .collect();

        let rows = rows
            .filter_map(|row| {
                let cells: Vec<String> =
                    row.select(&DATA_CELL_SELECTOR).map(element_text).collect();
                // zip stops at the shorter of headers and cells
                let mapped: TableRow = headers.iter().cloned().zip(cells).collect();
                (!mapped.is_empty()).then_some(mapped)
            })
            .collect();

        Some(TableRecord { title, headers, rows })
    }
}
