//! Runner behavior that must hold without any browser: requirement gating,
//! skip accounting, filtering, and report writing.

use async_trait::async_trait;

use tekqa_common::{QaResult, SuiteConfig};
use tekqa_harness::runner::{
    filter_registrations, CaseStatus, Registration, Requirement, Runner, RunnerConfig, Scenario,
    ScenarioCtx,
};
use tekqa_harness::visual::VisualConfig;

struct Noop;

#[async_trait]
impl Scenario for Noop {
    async fn run(&self, _ctx: &mut ScenarioCtx) -> QaResult<()> {
        Ok(())
    }
}

fn offline_config() -> SuiteConfig {
    // No TEKQA_LIVE, no portal credentials.
    SuiteConfig::resolve_from(|_| None)
}

fn runner_with(output: &std::path::Path) -> Runner {
    Runner::new(
        offline_config(),
        RunnerConfig {
            visual: VisualConfig {
                baseline_dir: output.join("baselines"),
                actual_dir: output.join("screenshots"),
                diff_dir: output.join("diffs"),
                ..Default::default()
            },
            output_dir: output.to_path_buf(),
            ..Default::default()
        },
    )
}

#[test]
fn live_requirement_is_unmet_without_the_opt_in() {
    let config = offline_config();
    assert!(Requirement::None.unmet_reason(&config).is_none());
    let reason = Requirement::LiveSite.unmet_reason(&config).unwrap();
    assert!(reason.contains("TEKQA_LIVE"));
}

#[test]
fn portal_requirement_reports_the_missing_credentials() {
    let live = SuiteConfig::resolve_from(|key| match key {
        "TEKQA_LIVE" => Some("1".into()),
        _ => None,
    });
    assert!(Requirement::LiveSite.unmet_reason(&live).is_none());
    let reason = Requirement::PortalCredentials.unmet_reason(&live).unwrap();
    assert!(reason.contains("PORTAL_EMAIL"));

    let with_creds = SuiteConfig::resolve_from(|key| match key {
        "TEKQA_LIVE" => Some("1".into()),
        "PORTAL_EMAIL" => Some("ryan@example.com".into()),
        "PORTAL_PASSWORD" => Some("pw".into()),
        _ => None,
    });
    assert!(Requirement::PortalCredentials.unmet_reason(&with_creds).is_none());
}

#[tokio::test]
async fn gated_scenarios_are_skipped_not_failed() {
    let dir = tempfile::tempdir().unwrap();
    let runner = runner_with(dir.path());

    let regs = vec![
        Registration::new("needs live site", &["live"], Requirement::LiveSite, Noop),
        Registration::new(
            "needs portal creds",
            &["portal"],
            Requirement::PortalCredentials,
            Noop,
        ),
    ];

    let result = runner.run_suite(&regs).await;
    assert_eq!(result.total, 2);
    assert_eq!(result.passed, 0);
    assert_eq!(result.failed, 0);
    assert_eq!(result.skipped, 2);
    assert!(result
        .cases
        .iter()
        .all(|c| c.status == CaseStatus::Skipped && c.skip_reason.is_some()));
}

#[tokio::test]
async fn report_is_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let runner = runner_with(dir.path());

    let regs = vec![Registration::new(
        "skipped case",
        &[],
        Requirement::LiveSite,
        Noop,
    )];
    let result = runner.run_suite(&regs).await;
    let path = runner.write_report(&result).unwrap();

    let raw = std::fs::read_to_string(path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["total"], 1);
    assert_eq!(parsed["skipped"], 1);
    assert_eq!(parsed["cases"][0]["status"], "skipped");
}

#[test]
fn filtering_by_tag_and_name() {
    let regs = vec![
        Registration::new("a", &["smoke", "shop"], Requirement::None, Noop),
        Registration::new("b", &["shop"], Requirement::None, Noop),
        Registration::new("c", &["visual"], Requirement::None, Noop),
    ];

    let shop = filter_registrations(regs, Some("shop"), None);
    assert_eq!(shop.len(), 2);

    let only_b = filter_registrations(shop, None, Some("b"));
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].name, "b");
}
