//! Profile screen of the travel-booking portal.

use regex::Regex;
use tekqa_common::{Locator, QaError, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct ProfilePage<'a> {
    session: &'a Session,
}

impl<'a> ProfilePage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Confirm the profile screen rendered: welcome heading plus the first
    /// editable field.
    pub async fn expect_loaded(&self) -> QaResult<()> {
        self.session
            .wait_for(
                &Locator::role("heading", "welcome"),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await?;
        self.session
            .wait_for(
                &Locator::role("textbox", "first name"),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }

    /// Confirm we are on the profile URL.
    pub async fn expect_profile_url(&self) -> QaResult<()> {
        self.session.wait_for_url("/account/profile", SETTLE_TIMEOUT_MS).await
    }

    /// Confirm the session is back on the public, logged-out UI.
    pub async fn expect_logged_out(&self) -> QaResult<()> {
        let login_link = Locator::role("link", "^login$");
        let login_button = Locator::role("button", "^login$");
        let visible = if self.session.is_visible(&login_link).await? {
            true
        } else {
            self.session.wait_visible(&login_button).await.is_ok()
        };
        if !visible {
            return Err(QaError::PreconditionTimeout {
                condition: "logged-out header (login link or button)".into(),
                waited_ms: SETTLE_TIMEOUT_MS,
            });
        }

        let url = self.session.current_url().await?;
        let account = Regex::new(r"(?i)/account/").expect("static url pattern");
        if account.is_match(&url) {
            return Err(QaError::HardMismatch {
                check: "logged-out URL".into(),
                expected: "a URL outside /account/".into(),
                actual: url,
            });
        }
        Ok(())
    }
}
