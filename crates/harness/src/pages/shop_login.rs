//! Login screen of the e-commerce demo shop.

use tekqa_common::{Locator, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct ShopLoginPage<'a> {
    session: &'a Session,
    base_url: String,
}

impl<'a> ShopLoginPage<'a> {
    pub fn new(session: &'a Session, base_url: &str) -> Self {
        Self {
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn username(&self) -> Locator {
        Locator::test_id("username")
    }

    fn password(&self) -> Locator {
        Locator::test_id("password")
    }

    fn login_button(&self) -> Locator {
        Locator::test_id("login-button")
    }

    /// Open the login screen and wait for the form to render.
    pub async fn goto(&self) -> QaResult<()> {
        self.session.goto(&format!("{}/", self.base_url)).await?;
        self.session.wait_visible(&self.login_button()).await
    }

    /// Submit credentials. Returns once the inventory page is reached and its
    /// product list is visible.
    pub async fn login(&self, username: &str, password: &str) -> QaResult<()> {
        self.session.fill(&self.username(), username).await?;
        self.session.fill(&self.password(), password).await?;
        self.session.click(&self.login_button()).await?;

        self.session.wait_for_url(r"inventory\.html", SETTLE_TIMEOUT_MS).await?;
        self.session.wait_visible(&Locator::css(".inventory_list")).await
    }

    /// Error banner text shown for rejected credentials.
    pub async fn error_message(&self) -> QaResult<String> {
        let banner = Locator::css(r#"[data-test="error"]"#);
        self.session.wait_visible(&banner).await?;
        self.session.inner_text(&banner).await
    }

    /// Log out through the burger menu; returns once the login form is back.
    pub async fn logout(&self) -> QaResult<()> {
        self.session.click(&Locator::css("#react-burger-menu-btn")).await?;
        self.session.click(&Locator::css("#logout_sidebar_link")).await?;
        self.session.wait_visible(&self.login_button()).await
    }
}
