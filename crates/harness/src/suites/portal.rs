//! Scenarios against the travel-booking portal. These need real account
//! credentials and are skipped with a reason when none are configured.

use async_trait::async_trait;

use tekqa_common::{QaError, QaResult, SuiteConfig};

use crate::fixtures::PortalFixtures;
use crate::runner::{Registration, Requirement, Scenario, ScenarioCtx};

/// Full POM flow: login, open the account menu, visit My Profile, verify the
/// page and URL, then log out and verify the public UI is back.
struct ProfileFlow;

#[async_trait]
impl Scenario for ProfileFlow {
    async fn run(&self, ctx: &mut ScenarioCtx) -> QaResult<()> {
        let creds = ctx
            .config
            .portal
            .credentials
            .clone()
            .ok_or_else(|| QaError::Skipped("portal credentials not configured".into()))?;

        let portal = PortalFixtures::new(&ctx.session, &ctx.config.portal);

        portal.login.login(&creds.username, &creds.password).await?;

        portal.account_menu.open().await?;
        portal.account_menu.go_to_profile().await?;
        portal.profile.expect_loaded().await?;
        portal.profile.expect_profile_url().await?;

        portal.account_menu.logout().await?;
        portal.profile.expect_logged_out().await
    }
}

pub fn registrations(_config: &SuiteConfig) -> QaResult<Vec<Registration>> {
    Ok(vec![Registration::new(
        "portal: login, profile, logout",
        &["portal", "pom"],
        Requirement::PortalCredentials,
        ProfileFlow,
    )])
}
