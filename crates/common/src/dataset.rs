//! Dataset loading for data-driven suites.
//!
//! A dataset is an ordered collection of named scenario records, loaded once
//! at suite-build time. Records are immutable after load; each record fully
//! determines one test's expected outcome, so the expanded cases can be
//! reordered or skipped independently. A missing or malformed file fails
//! suite load with [`QaError::DatasetLoad`] before any scenario runs.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{QaError, QaResult};

/// A scenario record that can name the test case it drives.
pub trait CaseName {
    /// Identifying name used for the expanded test registration.
    fn case_name(&self) -> String;
}

/// Load a dataset file. `T` is usually `Vec<SomeCase>`, but wrapper shapes
/// such as [`QueryDataset`] deserialize the same way.
pub fn load_dataset<T: DeserializeOwned>(path: &Path) -> QaResult<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| QaError::DatasetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let parsed = serde_json::from_str(&raw).map_err(|e| QaError::DatasetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), "loaded dataset");
    Ok(parsed)
}

/// One cart scenario: a name plus the inventory items to add.
#[derive(Debug, Clone, Deserialize)]
pub struct CartCase {
    pub name: String,
    pub items: Vec<String>,
}

impl CaseName for CartCase {
    fn case_name(&self) -> String {
        self.name.clone()
    }
}

/// One repository to cross-check between API and UI.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoCase {
    pub owner: String,
    pub name: String,
}

impl CaseName for RepoCase {
    fn case_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Search queries ship as a wrapper object rather than a bare array.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryDataset {
    pub queries: Vec<String>,
}

impl CaseName for String {
    fn case_name(&self) -> String {
        self.clone()
    }
}

/// One encyclopedia article to snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleCase {
    pub title: String,
}

impl CaseName for ArticleCase {
    fn case_name(&self) -> String {
        self.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn loads_cart_cases() {
        let f = write_temp(r#"[{"name": "two items", "items": ["A", "B"]}]"#);
        let cases: Vec<CartCase> = load_dataset(f.path()).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].case_name(), "two items");
        assert_eq!(cases[0].items, vec!["A", "B"]);
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let f = write_temp("[]");
        let cases: Vec<CartCase> = load_dataset(f.path()).unwrap();
        assert!(cases.is_empty());
    }

    #[test]
    fn malformed_dataset_fails_load() {
        let f = write_temp(r#"[{"name": "missing items field"}]"#);
        let err = load_dataset::<Vec<CartCase>>(f.path()).unwrap_err();
        assert!(matches!(err, QaError::DatasetLoad { .. }));
    }

    #[test]
    fn missing_file_fails_load() {
        let err =
            load_dataset::<Vec<RepoCase>>(Path::new("/nonexistent/repos.json")).unwrap_err();
        assert!(matches!(err, QaError::DatasetLoad { .. }));
    }

    #[test]
    fn repo_case_names_join_owner_and_name() {
        let case = RepoCase {
            owner: "microsoft".into(),
            name: "playwright".into(),
        };
        assert_eq!(case.case_name(), "microsoft/playwright");
    }
}
