//! Public repository page of the code-hosting site, for hybrid API↔UI checks.

use tekqa_common::{Locator, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct RepoPage<'a> {
    session: &'a Session,
    web_base: String,
}

impl<'a> RepoPage<'a> {
    pub fn new(session: &'a Session, web_base: &str) -> Self {
        Self {
            session,
            web_base: web_base.trim_end_matches('/').to_string(),
        }
    }

    /// Open the repository page.
    pub async fn goto(&self, owner: &str, name: &str) -> QaResult<()> {
        self.session
            .goto(&format!("{}/{owner}/{name}", self.web_base))
            .await
    }

    /// Wait for the level-1 heading showing `owner / name`. The page has many
    /// headings, so the H1 is narrowed by its text.
    pub async fn expect_heading(&self, owner: &str, name: &str) -> QaResult<()> {
        let pattern = format!(r"{}\s*/\s*{}", regex::escape(owner), regex::escape(name));
        let heading = Locator::heading(1).has_text(pattern).first();
        self.session
            .wait_for(&heading, crate::browser::WaitState::Visible, SETTLE_TIMEOUT_MS)
            .await
    }

    /// The page's meta description, the SEO source of truth. Prefers the
    /// OpenGraph tag, falls back to the plain one; empty when neither exists.
    pub async fn meta_description(&self) -> QaResult<String> {
        for selector in [
            r#"meta[property="og:description"]"#,
            r#"meta[name="description"]"#,
        ] {
            let meta = Locator::css(selector).first();
            if self.session.count(&meta).await? > 0 {
                if let Some(content) = self.session.attribute(&meta, "content").await? {
                    let content = content.trim().to_string();
                    if !content.is_empty() {
                        return Ok(content);
                    }
                }
            }
        }
        Ok(String::new())
    }

    /// Raw text of the stargazers link, which carries the rendered star
    /// count. `None` when the layout hides it.
    pub async fn star_text(&self, owner: &str, name: &str) -> QaResult<Option<String>> {
        let link = Locator::css(format!(r#"a[href="/{owner}/{name}/stargazers"]"#)).first();
        if !self.session.is_visible(&link).await? {
            return Ok(None);
        }
        Ok(Some(self.session.inner_text(&link).await?))
    }
}
