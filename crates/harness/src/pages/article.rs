//! Encyclopedia article page used by the visual snapshot suite.

use tekqa_common::{Locator, QaResult};

use crate::browser::{ScreenshotRequest, Session};

use super::SETTLE_TIMEOUT_MS;

pub struct ArticlePage<'a> {
    session: &'a Session,
    base_url: String,
}

impl<'a> ArticlePage<'a> {
    pub fn new(session: &'a Session, base_url: &str) -> Self {
        Self {
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn heading(&self) -> Locator {
        Locator::heading(1).first()
    }

    fn infobox(&self) -> Locator {
        Locator::css(".infobox")
    }

    /// Open the article and wait for its main heading.
    pub async fn goto(&self, title: &str) -> QaResult<()> {
        self.session
            .goto(&format!("{}/wiki/{title}", self.base_url))
            .await?;
        self.session
            .wait_for(&self.heading(), crate::browser::WaitState::Visible, SETTLE_TIMEOUT_MS)
            .await
    }

    /// Capture the main heading region.
    pub async fn screenshot_heading(&self, path: &str) -> QaResult<()> {
        self.session
            .screenshot(&ScreenshotRequest {
                path: path.to_string(),
                locator: Some(self.heading()),
                ..Default::default()
            })
            .await
    }

    /// Whether the article carries an infobox; not all do.
    pub async fn has_infobox(&self) -> QaResult<bool> {
        Ok(self.session.count(&self.infobox()).await? > 0)
    }

    /// Capture the infobox region.
    pub async fn screenshot_infobox(&self, path: &str) -> QaResult<()> {
        self.session
            .screenshot(&ScreenshotRequest {
                path: path.to_string(),
                locator: Some(self.infobox().first()),
                ..Default::default()
            })
            .await
    }
}
