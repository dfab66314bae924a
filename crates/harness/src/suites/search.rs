//! Data-driven search scenarios against the news search site.

use async_trait::async_trait;

use tekqa_common::dataset::{load_dataset, QueryDataset};
use tekqa_common::{QaResult, SuiteConfig};

use crate::pages::SearchPage;
use crate::runner::{expand, Registration, Requirement, Scenario, ScenarioCtx};

struct SearchReflectsQuery {
    query: String,
}

#[async_trait]
impl Scenario for SearchReflectsQuery {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let page = SearchPage::new(&ctx.session, &ctx.config.search_url);

        page.goto().await?;
        page.search(&self.query).await?;

        let param = page.query_param().await?;
        ctx.checkpoint.hard(
            param
                .as_deref()
                .map(|p| p.to_lowercase().contains(&self.query.to_lowercase()))
                .unwrap_or(false),
            "search URL query parameter",
            &self.query,
            param.as_deref().unwrap_or("<absent>"),
        )?;

        page.expect_result_matching(&self.query).await?;
        page.expect_any_result_link().await
    }
}

pub fn registrations(config: &SuiteConfig) -> QaResult<Vec<Registration>> {
    let dataset: QueryDataset = load_dataset(&config.data_dir.join("queries.json"))?;
    Ok(expand(dataset.queries, |query| {
        Registration::new(
            format!("search: results include \"{query}\""),
            &["search", "ddt"],
            Requirement::LiveSite,
            SearchReflectsQuery { query },
        )
    }))
}
