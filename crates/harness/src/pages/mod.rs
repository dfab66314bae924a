//! Page objects: one module per logical screen.
//!
//! Every page object is constructed with a borrowed [`Session`](crate::browser::Session)
//! and is valid only for that session's lifetime. Action methods return once
//! their success postcondition is observably true; query methods return
//! typed values. A postcondition that does not hold within its bounded wait
//! fails with `PreconditionTimeout`, so callers never re-check the same
//! condition.

mod account_menu;
mod article;
mod cart;
mod checkout;
mod inventory;
mod portal_login;
mod profile;
mod repo;
mod search;
mod shop_login;

pub use account_menu::AccountMenu;
pub use article::ArticlePage;
pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use inventory::InventoryPage;
pub use portal_login::PortalLoginPage;
pub use profile::ProfilePage;
pub use repo::RepoPage;
pub use search::SearchPage;
pub use shop_login::ShopLoginPage;

/// Default bound for login and post-navigation settles.
pub(crate) const SETTLE_TIMEOUT_MS: u64 = 10_000;
