//! Visual snapshot scenarios over a small set of stable encyclopedia
//! articles: the main heading always, the infobox when the article has one.

use async_trait::async_trait;

use tekqa_common::dataset::{load_dataset, ArticleCase, CaseName};
use tekqa_common::{QaError, QaResult, SuiteConfig};

use crate::pages::ArticlePage;
use crate::runner::{expand, Registration, Requirement, Scenario, ScenarioCtx};
use crate::visual::VisualOutcome;

struct ArticleSnapshots {
    case: ArticleCase,
}

impl ArticleSnapshots {
    fn snapshot_name(&self, region: &str) -> String {
        format!("{}-{region}", self.case.title.replace('/', "_"))
    }
}

#[async_trait]
impl Scenario for ArticleSnapshots {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let page = ArticlePage::new(&ctx.session, &ctx.config.wiki_url);
        page.goto(&self.case.title).await?;

        let mut captured = vec![self.snapshot_name("heading")];
        page.screenshot_heading(&ctx.visual.candidate_path(&captured[0]).to_string_lossy())
            .await?;

        if page.has_infobox().await? {
            let name = self.snapshot_name("infobox");
            page.screenshot_infobox(&ctx.visual.candidate_path(&name).to_string_lossy())
                .await?;
            captured.push(name);
        }

        // Compare every captured region; report freshly seeded baselines as
        // one skip so the first run is visibly not a pass.
        let mut created = Vec::new();
        for name in &captured {
            match ctx.visual.check(name, None)? {
                VisualOutcome::Match(_) => {}
                VisualOutcome::BaselineCreated { .. } => created.push(name.clone()),
                VisualOutcome::Mismatch(diff) => {
                    return Err(QaError::HardMismatch {
                        check: format!("{name} pixels"),
                        expected: "diff ratio within threshold".into(),
                        actual: format!("{:.2}% pixels differ", diff.diff_ratio * 100.0),
                    });
                }
            }
        }

        if !created.is_empty() {
            return Err(QaError::Skipped(format!(
                "baseline(s) created: {}; re-run to compare",
                created.join(", ")
            )));
        }
        Ok(())
    }
}

pub fn registrations(config: &SuiteConfig) -> QaResult<Vec<Registration>> {
    let cases: Vec<ArticleCase> = load_dataset(&config.data_dir.join("wiki-articles.json"))?;
    Ok(expand(cases, |case| {
        Registration::new(
            format!("wiki visual: {}", case.case_name()),
            &["wiki", "visual"],
            Requirement::LiveSite,
            ArticleSnapshots { case },
        )
    }))
}
