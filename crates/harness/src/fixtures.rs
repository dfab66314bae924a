//! Fixture provider: fresh page objects per scenario.
//!
//! Each scenario execution owns one [`Session`]; the fixture sets construct
//! one instance of every declared page object type, borrowed from that
//! session only. Nothing here is shared or reused across scenarios: the
//! runner launches a new session per execution, and the fixtures die with
//! it.

use tekqa_common::config::{PortalConfig, ShopConfig};

use crate::browser::Session;
use crate::pages::{
    AccountMenu, CartPage, CheckoutPage, InventoryPage, PortalLoginPage, ProfilePage,
    ShopLoginPage,
};

/// Page objects for the e-commerce demo shop.
pub struct ShopFixtures<'a> {
    pub login: ShopLoginPage<'a>,
    pub inventory: InventoryPage<'a>,
    pub cart: CartPage<'a>,
    pub checkout: CheckoutPage<'a>,
}

impl<'a> ShopFixtures<'a> {
    pub fn new(session: &'a Session, config: &ShopConfig) -> Self {
        Self {
            login: ShopLoginPage::new(session, &config.base_url),
            inventory: InventoryPage::new(session),
            cart: CartPage::new(session),
            checkout: CheckoutPage::new(session),
        }
    }
}

/// Page objects for the travel-booking portal.
pub struct PortalFixtures<'a> {
    pub login: PortalLoginPage<'a>,
    pub account_menu: AccountMenu<'a>,
    pub profile: ProfilePage<'a>,
}

impl<'a> PortalFixtures<'a> {
    pub fn new(session: &'a Session, config: &PortalConfig) -> Self {
        Self {
            login: PortalLoginPage::new(session, &config.base_url),
            account_menu: AccountMenu::new(session),
            profile: ProfilePage::new(session),
        }
    }
}
