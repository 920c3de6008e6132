// src/extractors/page.rs

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::extractors::table::TableExtractor;
use crate::extractors::text::{clean_text, extract_engagement_section, extract_segments};
use crate::reports::models::{RawDocument, ReportMetadata, ReportRecord};

static PAGE_TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("Failed to compile PAGE_TITLE_SELECTOR"));

// Page titles look like "Report for ['branch-a', 'branch-b']"; the first quoted name wins.
static BRANCH_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\['([^']+)'").expect("Failed to compile BRANCH_NAME_RE"));

/// Output key and section name for each engagement block, in output order.
const ENGAGEMENT_SECTIONS: &[(&str, &str)] = &[
    ("engagement_time", "time"),
    ("engagement_distance", "distance"),
];

/// Parses a report page once and runs both the text and table extractors over it.
#[derive(Debug, Default)]
pub struct PageExtractor {
    tables: TableExtractor,
}

impl PageExtractor {
    pub fn new() -> Self {
        Self { tables: TableExtractor::new() }
    }

    pub fn extract_report(&self, raw: &RawDocument) -> ReportRecord {
        let document = Html::parse_document(&raw.html);
        if !document.errors.is_empty() {
            tracing::debug!(
                "{} recovered HTML parse error(s) in {}",
                document.errors.len(),
                raw.url
            );
        }

        let body_text = clean_text(&document.root_element().text().collect::<String>());

        let page_title = document
            .select(&PAGE_TITLE_SELECTOR)
            .next()
            .map(|h1| clean_text(&h1.text().collect::<String>()));
        let branch_name = page_title
            .as_deref()
            .and_then(|title| BRANCH_NAME_RE.captures(title))
            .map(|caps| caps[1].to_string());

        let mut sections = IndexMap::new();
        for (key, name) in ENGAGEMENT_SECTIONS {
            match extract_engagement_section(name, &body_text) {
                Some(section) => {
                    sections.insert(key.to_string(), section);
                }
                None => tracing::debug!("No '{}' engagement section in {}", name, raw.url),
            }
        }

        let record = ReportRecord {
            metadata: ReportMetadata { page_title, url: raw.url.clone(), branch_name },
            segments: extract_segments(&body_text),
            sections,
            tables: self.tables.extract_tables(&document),
        };
        tracing::debug!(
            "Extracted {}: {} section(s), {} table(s)",
            raw.url,
            record.sections.len(),
            record.tables.len()
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::text::SegmentCounts;

    const REPORT_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>analyse_branch</title><style>body { font: 12px; }</style></head>
<body>
  <h1>Model report
      for ['master', 'release']</h1>
  <ul>
    <li><b>Total segments:</b> 1200</li>
    <li><b>Chill mode segments:</b>
        700</li>
    <li><b>Experimental mode segments:</b> 500</li>
  </ul>
  <h2>Engagement Rate Analysis (time)</h2>
  <p>Overall engagement rate: <b>61.2%</b> (1234.5s / 2017.1s)</p>
  <p>Chill mode: <b>55.0%</b> (600s / 1090s)</p>
  <p>Experimental mode: <b>68.4%</b> (634.5s / 927.1s)</p>
  <h2>Engagement Rate Analysis (distance)</h2>
  <p>Overall engagement rate: <b>70.1%</b> (12.3km / 17.5km)</p>
  <h2>Engagement by Car</h2>
  <table>
    <thead><tr><th>Car</th><th>Segments</th><th>Rate</th></tr></thead>
    <tbody>
      <tr><td>HONDA CIVIC</td><td>300</td><td>58.1%</td></tr>
      <tr><td>TOYOTA RAV4</td><td>250</td></tr>
    </tbody>
  </table>
  <table></table>
</body></html>"#;

    const URL: &str = "https://example.test/master/analyse_branch.html";

    fn raw(html: &str) -> RawDocument {
        RawDocument { url: URL.into(), html: html.into() }
    }

    #[test]
    fn extracts_full_report() {
        let record = PageExtractor::new().extract_report(&raw(REPORT_HTML));

        assert_eq!(
            record.metadata.page_title.as_deref(),
            Some("Model report for ['master', 'release']")
        );
        assert_eq!(record.metadata.branch_name.as_deref(), Some("master"));
        assert_eq!(record.metadata.url, URL);
        assert_eq!(
            record.segments,
            SegmentCounts { total: 1200, chill_mode: 700, experimental_mode: 500 }
        );

        let keys: Vec<&String> = record.sections.keys().collect();
        assert_eq!(keys, vec!["engagement_time", "engagement_distance"]);
        assert_eq!(record.sections["engagement_time"].experimental_mode, 68.4);
        assert_eq!(record.sections["engagement_distance"].overall_detail, "12.3km / 17.5km");
        assert_eq!(record.sections["engagement_distance"].chill_mode, 0.0);

        assert_eq!(record.tables.len(), 1);
        let cars = &record.tables["engagement_by_car"];
        assert_eq!(cars.headers, vec!["Car", "Segments", "Rate"]);
        assert_eq!(cars.rows.len(), 2);
        assert_eq!(cars.rows[1].len(), 2);
        assert_eq!(cars.rows[1]["Car"], "TOYOTA RAV4");
    }

    #[test]
    fn labels_split_across_lines_are_matched() {
        let html = "<ul><li>Total\n      segments: 5</li></ul>\n\
            <h2>Engagement   Rate\n  Analysis (time)</h2>\n\
            <p>Overall engagement\n   rate: <b>1.0%</b>\n (2 / 200)</p>\n\
            <p>Chill\tmode: <b>3.5%</b> (7\n  / 200)</p>";
        let record = PageExtractor::new().extract_report(&raw(html));

        assert_eq!(record.segments.total, 5);
        let time = &record.sections["engagement_time"];
        assert_eq!(time.title, "Engagement Rate Analysis (time)");
        assert_eq!(time.overall, 1.0);
        assert_eq!(time.overall_detail, "2 / 200");
        assert_eq!(time.chill_mode, 3.5);
        assert_eq!(time.chill_mode_detail, "7 / 200");
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let record = PageExtractor::new().extract_report(&raw("<p>Total segments: 1200</p>"));

        assert_eq!(record.metadata.page_title, None);
        assert_eq!(record.metadata.branch_name, None);
        assert_eq!(
            record.segments,
            SegmentCounts { total: 1200, chill_mode: 0, experimental_mode: 0 }
        );
        assert!(record.sections.is_empty());
        assert!(record.tables.is_empty());
    }

    #[test]
    fn title_without_brackets_has_no_branch() {
        let record = PageExtractor::new().extract_report(&raw("<h1>  Plain   title </h1>"));
        assert_eq!(record.metadata.page_title.as_deref(), Some("Plain title"));
        assert_eq!(record.metadata.branch_name, None);
    }

    #[test]
    fn malformed_markup_is_tolerated() {
        let html = concat!(
            "<h1>Broken ['wip'</h1><div><p>Total segments: <i>7</div>",
            "<table><tr><td>A<tr><td>b",
        );
        let record = PageExtractor::new().extract_report(&raw(html));
        assert_eq!(record.metadata.branch_name.as_deref(), Some("wip"));
        assert_eq!(record.segments.total, 7);
        assert_eq!(record.tables["table_1"].rows[0]["A"], "b");
    }

    #[test]
    fn serializes_in_insertion_order() {
        let record = PageExtractor::new().extract_report(&raw(REPORT_HTML));
        let json = serde_json::to_string(&record).unwrap();

        let order = ["\"metadata\"", "\"segments\"", "\"sections\"", "\"tables\""];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
        let time_at = json.find("engagement_time").unwrap();
        assert!(time_at < json.find("engagement_distance").unwrap());
        assert!(json.contains(r#""branch_name":"master""#));
    }
}
