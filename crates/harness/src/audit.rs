//! Locator inventory: export every stable test-identifier the pages expose.
//!
//! Useful when the site under test changes: the dump shows at a glance which
//! test-ids exist per page, what element carries them, and what text they
//! render, without clicking through the UI by hand.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use tekqa_common::QaResult;

use crate::browser::Session;

/// One test-identifier found on a page.
#[derive(Debug, Clone, Serialize)]
pub struct LocatorRecord {
    pub page: String,
    pub test_id: String,
    pub tag: String,
    pub text: String,
}

/// Collect the test-id inventory of the current page, deduplicated by id.
pub async fn collect(session: &Session, page_label: &str) -> QaResult<Vec<LocatorRecord>> {
    let mut seen = std::collections::HashSet::new();
    let mut records = Vec::new();
    for entry in session.collect_test_ids().await? {
        if !entry.test_id.is_empty() && seen.insert(entry.test_id.clone()) {
            records.push(LocatorRecord {
                page: page_label.to_string(),
                test_id: entry.test_id,
                tag: entry.tag,
                text: entry.text,
            });
        }
    }
    info!(page = page_label, count = records.len(), "collected locator inventory");
    Ok(records)
}

/// Write the inventory as CSV: page, test-id, tag, visible text.
pub fn write_csv(records: &[LocatorRecord], path: &Path) -> QaResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = String::from("Page,Data-Test,Tag,Text\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_quote(&r.page),
            csv_quote(&r.test_id),
            csv_quote(&r.tag),
            csv_quote(&r.text)
        ));
    }
    std::fs::write(path, out)?;
    info!(path = %path.display(), count = records.len(), "locator inventory written");
    Ok(())
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\"").replace('\n', " "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_escapes_quotes_and_newlines() {
        assert_eq!(csv_quote("plain"), "\"plain\"");
        assert_eq!(csv_quote(r#"say "hi""#), r#""say ""hi""""#);
        assert_eq!(csv_quote("two\nlines"), "\"two lines\"");
    }

    #[test]
    fn csv_has_header_and_rows() {
        let records = vec![LocatorRecord {
            page: "Login Page".into(),
            test_id: "login-button".into(),
            tag: "input".into(),
            text: "Login".into(),
        }];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locators.csv");
        write_csv(&records, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Page,Data-Test,Tag,Text\n"));
        assert!(written.contains("\"login-button\""));
    }
}
