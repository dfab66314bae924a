//! Login flow of the travel-booking portal.

use tekqa_common::{Locator, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct PortalLoginPage<'a> {
    session: &'a Session,
    base_url: String,
}

impl<'a> PortalLoginPage<'a> {
    pub fn new(session: &'a Session, base_url: &str) -> Self {
        Self {
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Go to the portal home page.
    pub async fn goto_home(&self) -> QaResult<()> {
        self.session.goto(&format!("{}/", self.base_url)).await
    }

    /// Open the login form and confirm we landed on the right screen.
    pub async fn open_login(&self) -> QaResult<()> {
        self.session.click(&Locator::role("link", "^login$")).await?;
        self.session
            .wait_visible(&Locator::role("heading", "log in"))
            .await
    }

    /// Full login flow: home, open login, fill credentials, submit. Returns
    /// only once the account button is visible (proof of auth).
    pub async fn login(&self, email: &str, password: &str) -> QaResult<()> {
        self.goto_home().await?;
        self.open_login().await?;
        self.session.fill(&Locator::role("textbox", "email"), email).await?;
        self.session.fill(&Locator::role("textbox", "password"), password).await?;
        self.session.click(&Locator::role("button", "^continue$")).await?;

        self.session
            .wait_for(
                &Locator::role("button", "open user account menu"),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }
}
