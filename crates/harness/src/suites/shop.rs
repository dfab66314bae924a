//! Scenarios against the e-commerce demo shop.

use async_trait::async_trait;

use tekqa_common::dataset::{load_dataset, CartCase, CaseName};
use tekqa_common::{Locator, QaError, QaResult, SuiteConfig};

use crate::browser::ScreenshotRequest;
use crate::fixtures::ShopFixtures;
use crate::runner::{expand, Registration, Requirement, Scenario, ScenarioCtx};
use crate::visual::VisualOutcome;

/// Known inventory prices, used to compute expected subtotals for the
/// data-driven cart cases.
const PRICES: &[(&str, f64)] = &[
    ("Sauce Labs Backpack", 29.99),
    ("Sauce Labs Bike Light", 9.99),
    ("Sauce Labs Bolt T-Shirt", 15.99),
    ("Sauce Labs Fleece Jacket", 49.99),
    ("Sauce Labs Onesie", 7.99),
    ("Test.allTheThings() T-Shirt (Red)", 15.99),
];

fn price_of(name: &str) -> Option<f64> {
    PRICES.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

async fn login<'a>(
    session: &'a crate::browser::Session,
    config: &tekqa_common::config::ShopConfig,
) -> QaResult<ShopFixtures<'a>> {
    let shop = ShopFixtures::new(session, config);
    shop.login.goto().await?;
    shop.login
        .login(&config.credentials.username, &config.credentials.password)
        .await?;
    Ok(shop)
}

/// Login, add one product, verify it in the cart, log back out.
struct LoginSingleItem;

#[async_trait]
impl Scenario for LoginSingleItem {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let shop = login(&ctx.session, &ctx.config.shop).await?;
        shop.inventory.add_to_cart("sauce-labs-backpack").await?;

        let count = shop.inventory.cart_count().await?;
        ctx.checkpoint.hard(count == 1, "cart badge after one add", 1, count)?;

        shop.inventory.open_cart().await?;
        let present = shop.cart.item_visible("Sauce Labs Backpack").await?;
        ctx.checkpoint
            .hard(present, "backpack row in cart", "visible", "absent")?;

        shop.login.logout().await
    }
}

/// Open a product's detail view and verify its key content.
struct ItemDetail;

#[async_trait]
impl Scenario for ItemDetail {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let shop = login(&ctx.session, &ctx.config.shop).await?;
        shop.inventory.open_item("Sauce Labs Bike Light").await?;

        ctx.session
            .wait_visible(&Locator::text(regex::escape("$9.99")).first())
            .await?;
        ctx.session
            .wait_visible(&Locator::text("Add to cart").first())
            .await?;
        ctx.session
            .wait_visible(&Locator::css(".inventory_details_desc_container"))
            .await?;

        // Back to the listing.
        ctx.session.click(&Locator::text("Back to products").first()).await?;
        ctx.session.wait_for_url(r"inventory\.html", 10_000).await
    }
}

/// Data-driven cart case: add the listed items, then verify the cart count
/// and the checkout overview subtotal against the known prices.
struct CartTotals {
    case: CartCase,
}

#[async_trait]
impl Scenario for CartTotals {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let shop = login(&ctx.session, &ctx.config.shop).await?;

        for item in &self.case.items {
            shop.inventory.add_by_name(item).await?;
        }

        shop.inventory.open_cart().await?;
        let count = shop.cart.item_count().await?;
        ctx.checkpoint
            .hard(count == self.case.items.len(), "cart item count", self.case.items.len(), count)?;

        shop.cart.begin_checkout().await?;
        shop.checkout.fill_information("Ryan", "Goede", "55330").await?;
        shop.checkout.continue_to_overview().await?;

        let expected: f64 = self.case.items.iter().filter_map(|i| price_of(i)).sum();
        let subtotal = shop.checkout.subtotal().await?;
        ctx.checkpoint.hard(
            (subtotal - expected).abs() < 0.005,
            "checkout subtotal",
            format!("{expected:.2}"),
            format!("{subtotal:.2}"),
        )
    }
}

/// Add two products, remove one, and verify the cart tracks both changes.
struct AddRemove;

#[async_trait]
impl Scenario for AddRemove {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let shop = login(&ctx.session, &ctx.config.shop).await?;
        shop.inventory.add_to_cart("sauce-labs-backpack").await?;
        shop.inventory.add_to_cart("sauce-labs-bike-light").await?;

        let count = shop.inventory.cart_count().await?;
        ctx.checkpoint.hard(count == 2, "cart badge after two adds", 2, count)?;

        shop.inventory.open_cart().await?;
        shop.cart.remove("sauce-labs-backpack").await?;

        let remaining = shop.cart.item_count().await?;
        ctx.checkpoint.hard(remaining == 1, "cart rows after removal", 1, remaining)?;

        let backpack = shop.cart.item_visible("Sauce Labs Backpack").await?;
        ctx.checkpoint
            .hard(!backpack, "removed backpack row", "absent", "visible")?;
        let bike_light = shop.cart.item_visible("Sauce Labs Bike Light").await?;
        ctx.checkpoint
            .hard(bike_light, "bike light row", "visible", "absent")
    }
}

/// Complete checkout flow through to the confirmation screen.
struct CheckoutFlow;

#[async_trait]
impl Scenario for CheckoutFlow {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let shop = login(&ctx.session, &ctx.config.shop).await?;
        shop.inventory.add_to_cart("sauce-labs-backpack").await?;
        shop.inventory.open_cart().await?;
        shop.cart.begin_checkout().await?;
        shop.checkout.fill_information("Ryan", "Goede", "55330").await?;
        shop.checkout.continue_to_overview().await?;
        shop.checkout.finish().await?;

        let heading = shop.checkout.completion_heading().await?;
        ctx.checkpoint.hard(
            heading.to_lowercase().contains("thank you"),
            "order confirmation heading",
            "contains 'thank you'",
            heading,
        )
    }
}

/// The information form rejects incomplete input, field by field.
struct CheckoutValidation;

#[async_trait]
impl Scenario for CheckoutValidation {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let shop = login(&ctx.session, &ctx.config.shop).await?;
        shop.inventory.add_to_cart("sauce-labs-backpack").await?;
        shop.inventory.open_cart().await?;
        shop.cart.begin_checkout().await?;

        let error = shop.checkout.continue_expecting_error().await?;
        ctx.checkpoint.hard(
            error.contains("First Name is required"),
            "empty form validation",
            "First Name is required",
            error,
        )?;

        ctx.session
            .fill(&Locator::placeholder("First Name"), "Ryan")
            .await?;
        let error = shop.checkout.continue_expecting_error().await?;
        ctx.checkpoint.hard(
            error.contains("Last Name is required"),
            "partial form validation",
            "Last Name is required",
            error,
        )
    }
}

/// Visual smoke: the inventory header region against its stored baseline,
/// with the (dynamic) cart badge masked out.
struct VisualHeader;

#[async_trait]
impl Scenario for VisualHeader {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        login(&ctx.session, &ctx.config.shop).await?;

        let name = "inventory-header";
        let path = ctx.visual.candidate_path(name);
        ctx.session
            .screenshot(&ScreenshotRequest {
                path: path.to_string_lossy().into_owned(),
                locator: Some(Locator::css(".primary_header, header").first()),
                mask: vec![Locator::css(".shopping_cart_badge")],
                ..Default::default()
            })
            .await?;

        match ctx.visual.check(name, None)? {
            VisualOutcome::Match(_) => Ok(()),
            VisualOutcome::BaselineCreated { baseline_path } => Err(QaError::Skipped(format!(
                "baseline created at {}; re-run to compare",
                baseline_path.display()
            ))),
            VisualOutcome::Mismatch(diff) => Err(QaError::HardMismatch {
                check: "inventory header pixels".into(),
                expected: "diff ratio within threshold".into(),
                actual: format!(
                    "{:.2}% pixels differ{}",
                    diff.diff_ratio * 100.0,
                    diff.diff_image_path
                        .map(|p| format!(" (diff: {})", p.display()))
                        .unwrap_or_default()
                ),
            }),
        }
    }
}

/// Build the shop registrations, expanding the cart dataset.
pub fn registrations(config: &SuiteConfig) -> QaResult<Vec<Registration>> {
    let dataset_path = config.data_dir.join("cart-cases.json");
    let cases: Vec<CartCase> = load_dataset(&dataset_path)?;

    // An unknown item would make the expected subtotal meaningless; reject
    // the dataset before anything runs.
    for case in &cases {
        if let Some(unknown) = case.items.iter().find(|i| price_of(i).is_none()) {
            return Err(QaError::DatasetLoad {
                path: dataset_path,
                reason: format!("case '{}' references unknown item '{unknown}'", case.name),
            });
        }
    }

    let mut regs = vec![
        Registration::new(
            "shop: login, single item, logout",
            &["shop", "smoke"],
            Requirement::LiveSite,
            LoginSingleItem,
        ),
        Registration::new(
            "shop: item detail content",
            &["shop"],
            Requirement::LiveSite,
            ItemDetail,
        ),
        Registration::new(
            "shop: add and remove cart items",
            &["shop"],
            Requirement::LiveSite,
            AddRemove,
        ),
        Registration::new(
            "shop: full checkout flow",
            &["shop", "smoke"],
            Requirement::LiveSite,
            CheckoutFlow,
        ),
        Registration::new(
            "shop: checkout form validation",
            &["shop"],
            Requirement::LiveSite,
            CheckoutValidation,
        ),
        Registration::new(
            "shop: inventory header visual",
            &["shop", "visual"],
            Requirement::LiveSite,
            VisualHeader,
        ),
    ];

    regs.extend(expand(cases, |case| {
        Registration::new(
            format!("shop cart: {}", case.case_name()),
            &["shop", "ddt"],
            Requirement::LiveSite,
            CartTotals { case },
        )
    }));

    Ok(regs)
}
