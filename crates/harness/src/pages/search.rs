//! Hacker News search (Algolia) screen.

use url::Url;

use tekqa_common::{Locator, QaError, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct SearchPage<'a> {
    session: &'a Session,
    base_url: String,
}

impl<'a> SearchPage<'a> {
    pub fn new(session: &'a Session, base_url: &str) -> Self {
        Self {
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_box(&self) -> Locator {
        Locator::placeholder("search")
    }

    /// Open the search page and wait for the input.
    pub async fn goto(&self) -> QaResult<()> {
        self.session.goto(&format!("{}/", self.base_url)).await?;
        self.session.wait_visible(&self.search_box()).await
    }

    /// Type the query and submit. Returns once the results URL carries the
    /// query parameter.
    pub async fn search(&self, query: &str) -> QaResult<()> {
        self.session.fill(&self.search_box(), query).await?;
        self.session.press(&self.search_box(), "Enter").await?;
        self.session.wait_for_url(r"\?.*(query|q)=", SETTLE_TIMEOUT_MS).await
    }

    /// The `query` (or legacy `q`) parameter of the current URL.
    pub async fn query_param(&self) -> QaResult<Option<String>> {
        let current = self.session.current_url().await?;
        let parsed = Url::parse(&current).map_err(|e| QaError::Driver(format!(
            "unparseable page URL {current}: {e}"
        )))?;
        Ok(parsed
            .query_pairs()
            .find(|(k, _)| k == "query" || k == "q")
            .map(|(_, v)| v.into_owned()))
    }

    /// Wait until some result text matching the query is visible.
    pub async fn expect_result_matching(&self, query: &str) -> QaResult<()> {
        self.session
            .wait_for(
                &Locator::text(regex::escape(query)).first(),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }

    /// Sanity: the result list contains at least one non-empty link.
    pub async fn expect_any_result_link(&self) -> QaResult<()> {
        self.session
            .wait_for(
                &Locator::css("a").has_text(".+").first(),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }
}
