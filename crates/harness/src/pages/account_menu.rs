//! Account menu of the travel-booking portal.
//!
//! Opening goes Closed → Opening → Open. The Open state is confirmed by
//! polling two alternative signals (the trigger button's `aria-expanded`
//! attribute or the menu panel's visibility) because neither is guaranteed
//! to update first. A click swallowed by animation timing gets exactly one
//! re-issue before the operation fails.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use tekqa_common::{Locator, QaError, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

/// Bounded wait for the menu to reach the Open state after one click.
const OPEN_WAIT_MS: u64 = 8_000;

/// Poll back-off ladder; the last interval repeats until the deadline.
const POLL_INTERVALS_MS: [u64; 4] = [100, 200, 300, 500];

pub struct AccountMenu<'a> {
    session: &'a Session,
}

impl<'a> AccountMenu<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn trigger(&self) -> Locator {
        Locator::role("button", "open user account menu")
    }

    fn panel(&self) -> Locator {
        Locator::css(r#"[role="menu"]"#).first()
    }

    /// Open the menu. Returns immediately when it is already open.
    pub async fn open(&self) -> QaResult<()> {
        let trigger = self.trigger();

        if self.session.is_visible(&self.panel()).await? {
            debug!("account menu already open");
            return Ok(());
        }

        self.session.scroll_into_view(&trigger).await?;
        self.session.click(&trigger).await?;
        if self.wait_until_open(OPEN_WAIT_MS).await? {
            return Ok(());
        }

        warn!("account menu did not open, re-issuing the click once");
        self.session.click(&trigger).await?;
        if self.wait_until_open(OPEN_WAIT_MS).await? {
            return Ok(());
        }

        Err(QaError::PreconditionTimeout {
            condition: "account menu open (aria-expanded=true or panel visible)".into(),
            waited_ms: 2 * OPEN_WAIT_MS,
        })
    }

    /// Poll until either open signal holds. `Ok(false)` on deadline.
    async fn wait_until_open(&self, timeout_ms: u64) -> QaResult<bool> {
        let trigger = self.trigger();
        let panel = self.panel();
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let mut intervals = POLL_INTERVALS_MS.iter().copied();
        let mut interval = intervals.next().unwrap_or(500);

        loop {
            let expanded = self.session.attribute(&trigger, "aria-expanded").await?;
            if expanded.as_deref() == Some("true") || self.session.is_visible(&panel).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(interval)).await;
            if let Some(next) = intervals.next() {
                interval = next;
            }
        }
    }

    /// Click a menu item, preferring the stable href handle and falling back
    /// to the accessible role + name.
    async fn click_item(&self, href_fragment: &str, name_pattern: &str) -> QaResult<()> {
        let by_href = self
            .panel()
            .then_css(format!(r#"a[role="menuitem"][href*="{href_fragment}"]"#))
            .first();
        let item = if self.session.count(&by_href).await? > 0 {
            by_href
        } else {
            self.panel().then_role("menuitem", name_pattern).first()
        };

        self.session
            .wait_for(&item, crate::browser::WaitState::Visible, SETTLE_TIMEOUT_MS)
            .await?;
        self.session.click(&item).await
    }

    /// Open "My Profile" from the (already open) menu.
    pub async fn go_to_profile(&self) -> QaResult<()> {
        self.click_item("/account/profile", "^my profile$").await
    }

    /// Log out through the menu; returns once the logged-out header shows
    /// the login link again.
    pub async fn logout(&self) -> QaResult<()> {
        self.open().await?;
        self.click_item("/logout", "^logout$").await?;
        self.session
            .wait_for(
                &Locator::role("link", "^login$"),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }
}
