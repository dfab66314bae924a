//! Product inventory screen of the demo shop.

use tekqa_common::{Locator, QaResult};

use crate::browser::Session;

use super::SETTLE_TIMEOUT_MS;

pub struct InventoryPage<'a> {
    session: &'a Session,
}

impl<'a> InventoryPage<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn cart_badge(&self) -> Locator {
        Locator::css(".shopping_cart_badge")
    }

    fn cart_link(&self) -> Locator {
        Locator::css(".shopping_cart_link")
    }

    /// Add a product by its test-id slug (e.g. `sauce-labs-backpack`).
    /// Returns once the cart badge reflects a non-empty cart.
    pub async fn add_to_cart(&self, slug: &str) -> QaResult<()> {
        self.session.click(&Locator::test_id(format!("add-to-cart-{slug}"))).await?;
        self.session.wait_visible(&self.cart_badge()).await
    }

    /// Add a product by its visible card name.
    pub async fn add_by_name(&self, name: &str) -> QaResult<()> {
        let card = Locator::css(".inventory_item").has_text(regex::escape(name));
        self.session.wait_visible(&card.clone().first()).await?;
        self.session
            .click(&card.then_role("button", "add to cart"))
            .await?;
        self.session.wait_visible(&self.cart_badge()).await
    }

    /// Current cart badge value; an absent badge means an empty cart.
    pub async fn cart_count(&self) -> QaResult<u32> {
        if !self.session.is_visible(&self.cart_badge()).await? {
            return Ok(0);
        }
        let text = self.session.inner_text(&self.cart_badge()).await?;
        Ok(text.trim().parse().unwrap_or(0))
    }

    /// Open a product's detail view by its title link.
    pub async fn open_item(&self, name: &str) -> QaResult<()> {
        self.session
            .click(&Locator::css(".inventory_item_name").has_text(regex::escape(name)).first())
            .await?;
        self.session.wait_for_url(r"inventory-item\.html", SETTLE_TIMEOUT_MS).await
    }

    /// Navigate to the cart. Returns once the cart page URL is reached.
    pub async fn open_cart(&self) -> QaResult<()> {
        self.session.click(&self.cart_link()).await?;
        self.session.wait_for_url(r"cart\.html", SETTLE_TIMEOUT_MS).await
    }
}
