//! Checkout flow of the demo shop: information form, overview, completion.

use regex::Regex;
use tekqa_common::{Locator, QaError, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct CheckoutPage<'a> {
    session: &'a Session,
}

impl<'a> CheckoutPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Fill the buyer information form.
    pub async fn fill_information(&self, first: &str, last: &str, zip: &str) -> QaResult<()> {
        self.session.fill(&Locator::placeholder("First Name"), first).await?;
        self.session.fill(&Locator::placeholder("Last Name"), last).await?;
        self.session.fill(&Locator::placeholder("Zip/Postal Code"), zip).await
    }

    /// Submit the information form. Returns once the overview page loads.
    pub async fn continue_to_overview(&self) -> QaResult<()> {
        self.session.click(&Locator::role("button", "^continue$")).await?;
        self.session.wait_for_url(r"checkout-step-two\.html", SETTLE_TIMEOUT_MS).await
    }

    /// Submit the form expecting validation to reject it; the form URL must
    /// not change.
    pub async fn continue_expecting_error(&self) -> QaResult<String> {
        self.session.click(&Locator::role("button", "^continue$")).await?;
        self.error_message().await
    }

    /// Validation error banner text.
    pub async fn error_message(&self) -> QaResult<String> {
        let banner = Locator::css(r#"[data-test="error"]"#);
        self.session.wait_visible(&banner).await?;
        self.session.inner_text(&banner).await
    }

    /// Item subtotal shown on the overview page.
    pub async fn subtotal(&self) -> QaResult<f64> {
        let label = Locator::test_id("subtotal-label");
        self.session.wait_visible(&label).await?;
        let text = self.session.inner_text(&label).await?;

        let re = Regex::new(r"Item total:\s*\$(\d+\.\d{2})").expect("static subtotal pattern");
        let captures = re.captures(&text).ok_or_else(|| QaError::HardMismatch {
            check: "subtotal label".into(),
            expected: "Item total: $NN.NN".into(),
            actual: text.clone(),
        })?;
        captures[1].parse().map_err(|_| QaError::HardMismatch {
            check: "subtotal value".into(),
            expected: "a decimal amount".into(),
            actual: text,
        })
    }

    /// Finish the order. Returns once the completion heading is visible.
    pub async fn finish(&self) -> QaResult<()> {
        self.session.click(&Locator::role("button", "^finish$")).await?;
        self.session
            .wait_for(
                &Locator::text("thank you for your order"),
                crate::browser::WaitState::Visible,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }

    /// Completion banner text on the final screen.
    pub async fn completion_heading(&self) -> QaResult<String> {
        self.session
            .inner_text(&Locator::css(".complete-header"))
            .await
    }
}
