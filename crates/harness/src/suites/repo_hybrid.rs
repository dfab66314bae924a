//! Hybrid API↔UI scenarios: the same repository observed through the REST
//! API and through the rendered page must agree, within tolerance.
//!
//! The header check is hard (the page fundamentally shows the wrong repo if
//! it fails). The description check is hard but tolerance-absorbing, because
//! the site truncates and reformats meta descriptions. The star count is a
//! soft check with a generous band: a live counter legitimately drifts
//! between the two observations, and its noise must not mask the primary
//! signals.

use async_trait::async_trait;

use tekqa_common::compare::{
    counts_equivalent, normalize, parse_count, text_equivalent, CountTolerance, TextTolerance,
};
use tekqa_common::dataset::{load_dataset, CaseName, RepoCase};
use tekqa_common::{QaResult, SuiteConfig};

use crate::github::GithubClient;
use crate::pages::RepoPage;
use crate::runner::{expand, Registration, Requirement, Scenario, ScenarioCtx};

struct ApiUiAgreement {
    case: RepoCase,
    /// The primary scenario also sanity-checks the API's own shape, so a
    /// drifting API fails loudly here instead of inside a UI assertion.
    sanity_check_api: bool,
}

#[async_trait]
impl Scenario for ApiUiAgreement {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let (owner, name) = (self.case.owner.as_str(), self.case.name.as_str());

        // API side: canonical repo data. Non-2xx is a hard failure.
        let client = GithubClient::new(&ctx.config.github)?;
        let repo = client.repo(owner, name).await?;

        if self.sanity_check_api {
            ctx.checkpoint.hard(
                normalize(&repo.full_name) == format!("{owner}/{name}").to_lowercase(),
                "API full_name",
                format!("{owner}/{name}"),
                &repo.full_name,
            )?;
            ctx.checkpoint.hard(
                normalize(&repo.owner.login) == owner.to_lowercase(),
                "API owner login",
                owner,
                &repo.owner.login,
            )?;
            ctx.checkpoint.hard(
                normalize(&repo.name) == name.to_lowercase(),
                "API repo name",
                name,
                &repo.name,
            )?;
        }

        // UI side: the public repo page.
        let page = RepoPage::new(&ctx.session, &ctx.config.github.web_base);
        page.goto(owner, name).await?;
        page.expect_heading(owner, name).await?;

        // Description: tolerant comparison against the meta description.
        let api_desc = repo.description.clone().unwrap_or_default();
        if normalize(&api_desc).is_empty() {
            ctx.checkpoint.soft_skip("description", "API reports no description");
        } else {
            let ui_desc = page.meta_description().await?;
            ctx.checkpoint.hard(
                !ui_desc.is_empty(),
                "meta description presence",
                "a non-empty meta description",
                "empty",
            )?;

            let verdict = text_equivalent(&api_desc, &ui_desc, &TextTolerance::default());
            ctx.checkpoint.hard(
                verdict.equivalent,
                "description agreement",
                format!("~ {:?}", verdict.reference),
                format!(
                    "{:?} ({}/{} shared tokens of {:?})",
                    verdict.observed, verdict.hits, verdict.needed, verdict.tokens
                ),
            )?;
        }

        // Stars: soft, with the larger of an absolute floor and a relative
        // band. A failed observation skips the check, never fails it.
        if let Some(api_stars) = repo.stargazers_count {
            match page.star_text(owner, name).await? {
                None => ctx.checkpoint.soft_skip("star count", "UI does not show a star count"),
                Some(text) => match parse_count(&text) {
                    None => ctx.checkpoint.soft_skip(
                        "star count",
                        format!("unparseable star text {text:?}"),
                    ),
                    Some(ui_stars) => {
                        let tolerance = CountTolerance::default();
                        ctx.checkpoint.soft(
                            counts_equivalent(api_stars, ui_stars, &tolerance),
                            "star count drift",
                            format!(
                                "API={api_stars}, UI~={ui_stars}, tol=±{}",
                                tolerance.allowed_delta(api_stars)
                            ),
                        );
                    }
                },
            }
        }

        Ok(())
    }
}

pub fn registrations(config: &SuiteConfig) -> QaResult<Vec<Registration>> {
    let mut regs = vec![Registration::new(
        "repo hybrid: microsoft/playwright",
        &["hybrid", "single"],
        Requirement::LiveSite,
        ApiUiAgreement {
            case: RepoCase {
                owner: "microsoft".into(),
                name: "playwright".into(),
            },
            sanity_check_api: true,
        },
    )];

    let cases: Vec<RepoCase> = load_dataset(&config.data_dir.join("github-repos.json"))?;
    regs.extend(expand(cases, |case| {
        Registration::new(
            format!("repo hybrid: {}", case.case_name()),
            &["hybrid", "multi"],
            Requirement::LiveSite,
            ApiUiAgreement {
                case,
                sanity_check_api: false,
            },
        )
    }));

    Ok(regs)
}
