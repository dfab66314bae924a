//! Shopping cart screen of the demo shop.

use tekqa_common::{Locator, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct CartPage<'a> {
    session: &'a Session,
}

impl<'a> CartPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn items(&self) -> Locator {
        Locator::css(".cart_item")
    }

    /// Number of line items currently in the cart.
    pub async fn item_count(&self) -> QaResult<usize> {
        self.session.count(&self.items()).await
    }

    /// Whether a line item with the given product name is present.
    pub async fn item_visible(&self, name: &str) -> QaResult<bool> {
        self.session
            .is_visible(&self.items().has_text(regex::escape(name)).first())
            .await
    }

    /// Remove a product by its test-id slug. Returns once its row is gone.
    pub async fn remove(&self, slug: &str) -> QaResult<()> {
        self.session.click(&Locator::test_id(format!("remove-{slug}"))).await?;
        self.session
            .wait_for(
                &Locator::test_id(format!("remove-{slug}")),
                crate::browser::WaitState::Detached,
                SETTLE_TIMEOUT_MS,
            )
            .await
    }

    /// Return to the inventory. Postcondition: product list visible again.
    pub async fn continue_shopping(&self) -> QaResult<()> {
        self.session.click(&Locator::test_id("continue-shopping")).await?;
        self.session.wait_for_url(r"inventory\.html", SETTLE_TIMEOUT_MS).await?;
        self.session.wait_visible(&Locator::css(".inventory_list")).await
    }

    /// Begin checkout. Returns once the information form is reached.
    pub async fn begin_checkout(&self) -> QaResult<()> {
        self.session.click(&Locator::test_id("checkout")).await?;
        self.session.wait_for_url(r"checkout-step-one\.html", SETTLE_TIMEOUT_MS).await
    }
}
