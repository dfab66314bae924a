//! Scenario runner: registrations, execution, and reporting.
//!
//! Each registration is one independent scenario. Execution is strictly
//! sequential inside a scenario (every step suspends until its completion
//! condition holds) and isolated between scenarios: every execution gets a
//! fresh browser session, fresh page objects, and its own checkpoint, so a
//! failure never leaks into a sibling. Two retry layers exist and must not
//! be conflated: the runner may re-execute a whole failed scenario from
//! scratch (`RunnerConfig::retries`), while individual interactions such as
//! the account-menu open perform at most one bounded in-place retry
//! themselves.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, warn};

use tekqa_common::check::{SoftMismatch, SoftSkip};
use tekqa_common::dataset::CaseName;
use tekqa_common::{Checkpoint, QaError, QaResult, SuiteConfig};

use crate::browser::{BrowserConfig, Session};
use crate::visual::{VisualConfig, VisualTester};

/// Everything a scenario body may touch.
pub struct ScenarioCtx {
    pub session: Session,
    pub checkpoint: Checkpoint,
    pub config: Arc<SuiteConfig>,
    pub visual: VisualTester,
}

/// One scenario body. Implementations are small structs carrying whatever
/// case data they were expanded from.
#[async_trait]
pub trait Scenario: Send + Sync {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()>;
}

/// External inputs a scenario cannot run without. Checked before a session
/// is launched; an unmet requirement skips the case with a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    None,
    /// Touches a live public site; gated behind the opt-in flag.
    LiveSite,
    /// Live site plus portal credentials.
    PortalCredentials,
}

impl Requirement {
    pub fn unmet_reason(&self, config: &SuiteConfig) -> Option<String> {
        match self {
            Requirement::None => None,
            Requirement::LiveSite if !config.live => {
                Some("live-site scenarios disabled; set TEKQA_LIVE=1 to enable".into())
            }
            Requirement::LiveSite => None,
            Requirement::PortalCredentials if !config.live => {
                Some("live-site scenarios disabled; set TEKQA_LIVE=1 to enable".into())
            }
            Requirement::PortalCredentials if config.portal.credentials.is_none() => Some(
                "PORTAL_EMAIL/PORTAL_PASSWORD (or PORTAL_USER/PORTAL_PASS) not set".into(),
            ),
            Requirement::PortalCredentials => None,
        }
    }
}

/// One registered scenario.
pub struct Registration {
    pub name: String,
    pub tags: Vec<String>,
    pub requirement: Requirement,
    scenario: Box<dyn Scenario>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("requirement", &self.requirement)
            .finish()
    }
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        tags: &[&str],
        requirement: Requirement,
        scenario: impl Scenario + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            requirement,
            scenario: Box::new(scenario),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Expand an ordered dataset into one registration per record.
///
/// `make` receives the owned record; implementations name the registration
/// by `case_name()` so each case is traceable in reports. Expansion is
/// read-only over the dataset and happens before anything executes, so the
/// resulting cases can be reordered or skipped independently.
pub fn expand<C, F>(cases: Vec<C>, make: F) -> Vec<Registration>
where
    C: CaseName,
    F: Fn(C) -> Registration,
{
    cases.into_iter().map(make).collect()
}

/// Keep registrations matching the optional tag and name filters.
pub fn filter_registrations(
    regs: Vec<Registration>,
    tag: Option<&str>,
    name: Option<&str>,
) -> Vec<Registration> {
    regs.into_iter()
        .filter(|r| tag.map(|t| r.has_tag(t)).unwrap_or(true))
        .filter(|r| name.map(|n| r.name == n).unwrap_or(true))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Passed,
    Failed,
    Skipped,
}

/// Result of one scenario, with enough context to diagnose without
/// re-running.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub status: CaseStatus,
    pub duration_ms: u64,
    pub attempts: u32,
    pub soft_mismatches: Vec<SoftMismatch>,
    pub soft_skips: Vec<SoftSkip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a whole run. Skipped cases never count against pass/fail.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub generated_at: String,
    pub cases: Vec<CaseResult>,
}

/// Configuration for the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub browser: BrowserConfig,
    pub visual: VisualConfig,
    pub output_dir: PathBuf,
    /// Whole-scenario re-executions after a failure (coarse retry layer).
    pub retries: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            visual: VisualConfig::default(),
            output_dir: PathBuf::from("test-results"),
            retries: 0,
        }
    }
}

pub struct Runner {
    suite_config: Arc<SuiteConfig>,
    config: RunnerConfig,
}

impl Runner {
    pub fn new(suite_config: SuiteConfig, config: RunnerConfig) -> Self {
        Self {
            suite_config: Arc::new(suite_config),
            config,
        }
    }

    /// Run every registration, one scenario at a time.
    pub async fn run_suite(&self, regs: &[Registration]) -> SuiteResult {
        let start = Instant::now();
        info!("running {} scenario(s)...", regs.len());

        let mut cases = Vec::with_capacity(regs.len());
        let mut passed = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for reg in regs {
            let case = self.run_case(reg).await;
            match case.status {
                CaseStatus::Passed => {
                    passed += 1;
                    info!("✓ {} ({} ms)", case.name, case.duration_ms);
                }
                CaseStatus::Failed => {
                    failed += 1;
                    error!(
                        "✗ {} - {}",
                        case.name,
                        case.error.as_deref().unwrap_or("unknown error")
                    );
                }
                CaseStatus::Skipped => {
                    skipped += 1;
                    info!(
                        "- {} (skipped: {})",
                        case.name,
                        case.skip_reason.as_deref().unwrap_or("")
                    );
                }
            }
            cases.push(case);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "results: {} passed, {} failed, {} skipped ({} ms)",
            passed, failed, skipped, duration_ms
        );

        SuiteResult {
            total: regs.len(),
            passed,
            failed,
            skipped,
            duration_ms,
            generated_at: chrono::Utc::now().to_rfc3339(),
            cases,
        }
    }

    /// Run one registration, honoring its requirement and the coarse retry
    /// policy. A skip is final; only genuine failures are retried.
    async fn run_case(&self, reg: &Registration) -> CaseResult {
        let start = Instant::now();

        if let Some(reason) = reg.requirement.unmet_reason(&self.suite_config) {
            return CaseResult {
                name: reg.name.clone(),
                status: CaseStatus::Skipped,
                duration_ms: 0,
                attempts: 0,
                soft_mismatches: vec![],
                soft_skips: vec![],
                skip_reason: Some(reason),
                error: None,
            };
        }

        let max_attempts = self.config.retries + 1;
        let mut attempts = 0;
        let mut last: Option<(QaError, Checkpoint)> = None;

        while attempts < max_attempts {
            attempts += 1;
            match self.attempt(reg).await {
                (Ok(()), checkpoint) => {
                    return CaseResult {
                        name: reg.name.clone(),
                        status: CaseStatus::Passed,
                        duration_ms: start.elapsed().as_millis() as u64,
                        attempts,
                        soft_mismatches: checkpoint.soft_mismatches().to_vec(),
                        soft_skips: checkpoint.soft_skips().to_vec(),
                        skip_reason: None,
                        error: None,
                    };
                }
                (Err(err), checkpoint) if err.is_skip() => {
                    return CaseResult {
                        name: reg.name.clone(),
                        status: CaseStatus::Skipped,
                        duration_ms: start.elapsed().as_millis() as u64,
                        attempts,
                        soft_mismatches: checkpoint.soft_mismatches().to_vec(),
                        soft_skips: checkpoint.soft_skips().to_vec(),
                        skip_reason: Some(err.to_string()),
                        error: None,
                    };
                }
                (Err(err), checkpoint) => {
                    if attempts < max_attempts {
                        warn!(
                            scenario = %reg.name,
                            attempt = attempts,
                            error = %err,
                            "scenario failed; re-executing from the start"
                        );
                    }
                    last = Some((err, checkpoint));
                }
            }
        }

        let (err, checkpoint) = last.expect("at least one attempt ran");
        CaseResult {
            name: reg.name.clone(),
            status: CaseStatus::Failed,
            duration_ms: start.elapsed().as_millis() as u64,
            attempts,
            soft_mismatches: checkpoint.soft_mismatches().to_vec(),
            soft_skips: checkpoint.soft_skips().to_vec(),
            skip_reason: None,
            error: Some(err.to_string()),
        }
    }

    /// One isolated execution: fresh session, fresh checkpoint.
    async fn attempt(&self, reg: &Registration) -> (QaResult<()>, Checkpoint) {
        let session = match Session::launch(self.config.browser.clone()).await {
            Ok(session) => session,
            Err(e) => return (Err(e), Checkpoint::new()),
        };
        let visual = match VisualTester::new(self.config.visual.clone()) {
            Ok(visual) => visual,
            Err(e) => return (Err(e), Checkpoint::new()),
        };

        let mut ctx = ScenarioCtx {
            session,
            checkpoint: Checkpoint::new(),
            config: Arc::clone(&self.suite_config),
            visual,
        };

        let result = reg.scenario.run(&mut ctx).await;
        let _ = ctx.session.close().await;
        (result, ctx.checkpoint)
    }

    /// Write the suite result as pretty JSON under the output directory.
    pub fn write_report(&self, result: &SuiteResult) -> QaResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(&path, json)?;
        info!("results written to: {}", path.display());
        Ok(path)
    }
}
