//! Suite-build invariants: dataset expansion happens before anything runs,
//! yields one named registration per record, and a bad dataset fails the
//! whole build.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;

use tekqa_common::dataset::{CartCase, CaseName};
use tekqa_common::{QaError, QaResult, SuiteConfig};
use tekqa_harness::runner::{expand, Registration, Requirement, Scenario, ScenarioCtx};
use tekqa_harness::suites;

struct Noop;

#[async_trait]
impl Scenario for Noop {
    async fn run(&self, _ctx: &mut ScenarioCtx) -> QaResult<()> {
        Ok(())
    }
}

fn cart_case(name: &str) -> CartCase {
    serde_json::from_value(serde_json::json!({ "name": name, "items": ["Sauce Labs Onesie"] }))
        .unwrap()
}

#[test]
fn n_records_expand_to_n_named_registrations() {
    let cases = vec![cart_case("alpha"), cart_case("beta"), cart_case("gamma")];
    let regs = expand(cases, |case| {
        Registration::new(
            format!("cart: {}", case.case_name()),
            &["ddt"],
            Requirement::LiveSite,
            Noop,
        )
    });

    assert_eq!(regs.len(), 3);
    let names: HashSet<_> = regs.iter().map(|r| r.name.clone()).collect();
    assert_eq!(names.len(), 3, "registration names must be distinct");
    assert!(names.contains("cart: beta"));
}

#[test]
fn empty_dataset_expands_to_zero_registrations() {
    let regs = expand(Vec::<CartCase>::new(), |case| {
        Registration::new(case.case_name(), &[], Requirement::None, Noop)
    });
    assert!(regs.is_empty());
}

fn write_data_dir(dir: &Path, cart_cases: &str) {
    std::fs::write(dir.join("cart-cases.json"), cart_cases).unwrap();
    std::fs::write(
        dir.join("github-repos.json"),
        r#"[{ "owner": "microsoft", "name": "playwright" }]"#,
    )
    .unwrap();
    std::fs::write(dir.join("queries.json"), r#"{ "queries": ["playwright"] }"#).unwrap();
    std::fs::write(dir.join("wiki-articles.json"), r#"[{ "title": "Playwright" }]"#).unwrap();
}

fn config_with_data_dir(dir: &Path) -> SuiteConfig {
    let dir = dir.to_string_lossy().into_owned();
    SuiteConfig::resolve_from(move |key| match key {
        "TEKQA_DATA_DIR" => Some(dir.clone()),
        _ => None,
    })
}

#[test]
fn suites_build_from_a_valid_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(
        dir.path(),
        r#"[{ "name": "one item", "items": ["Sauce Labs Backpack"] }]"#,
    );

    let regs = suites::all(&config_with_data_dir(dir.path())).unwrap();
    // 6 fixed shop scenarios + 1 cart case + 1 portal + 2 hybrid + 1 search
    // + 1 wiki article.
    assert_eq!(regs.len(), 12);
    assert!(regs.iter().any(|r| r.name == "shop cart: one item"));
    assert!(regs.iter().any(|r| r.name == "repo hybrid: microsoft/playwright"));
}

#[test]
fn malformed_dataset_fails_the_whole_build() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path(), r#"[{ "name": "missing items" }]"#);

    let err = suites::all(&config_with_data_dir(dir.path())).unwrap_err();
    assert!(matches!(err, QaError::DatasetLoad { .. }));
}

#[test]
fn unknown_cart_item_fails_the_build_with_context() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(
        dir.path(),
        r#"[{ "name": "bogus", "items": ["Sauce Labs Jetpack"] }]"#,
    );

    let err = suites::all(&config_with_data_dir(dir.path())).unwrap_err();
    match err {
        QaError::DatasetLoad { reason, .. } => {
            assert!(reason.contains("Sauce Labs Jetpack"), "reason was: {reason}");
            assert!(reason.contains("bogus"));
        }
        other => panic!("expected DatasetLoad, got: {other}"),
    }
}

#[test]
fn missing_data_dir_fails_before_any_scenario() {
    let err = suites::all(&config_with_data_dir(Path::new("/nonexistent/tekqa-data"))).unwrap_err();
    assert!(matches!(err, QaError::DatasetLoad { .. }));
}
