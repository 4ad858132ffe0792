//! Dashboard page object: user menu, logout, sidebar state.

use std::time::Duration;

use crate::error::E2eResult;
use crate::routes::LOGIN_ROUTE;
use crate::session::BrowserSession;

use super::{require_displayed, wait_displayed, wait_for_path, Locators, Strategy};

const DASHBOARD_SHELL: Locators = Locators(&[
    Strategy::Css("[data-testid='dashboard']"),
    Strategy::Css("main"),
    Strategy::Css(".dashboard"),
]);

const USER_MENU: Locators = Locators(&[
    Strategy::Css("[data-testid='user-menu']"),
    Strategy::Css("header .avatar"),
    Strategy::Css(".user-menu"),
]);

const LOGOUT_ITEM: Locators = Locators(&[
    Strategy::Css("[data-testid='logout']"),
    Strategy::Text("Logout"),
    Strategy::Text("Sign Out"),
]);

const SIDEBAR_TOGGLE: Locators = Locators(&[
    Strategy::Css("[data-testid='sidebar-toggle']"),
    Strategy::Css("button[aria-label='Toggle sidebar']"),
    Strategy::Css(".sidebar-toggle"),
]);

const SIDEBAR: Locators = Locators(&[
    Strategy::Css("[data-testid='sidebar']"),
    Strategy::Css("nav.sidebar"),
    Strategy::Css("aside"),
]);

const MENU_TIMEOUT: Duration = Duration::from_secs(5);
const VISIBILITY_PROBE: Duration = Duration::from_secs(1);
const LOGOUT_REDIRECT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DashboardPage<'a> {
    session: &'a BrowserSession,
}

impl<'a> DashboardPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    /// Whether the dashboard shell rendered within a short probe window.
    pub async fn is_loaded(&self) -> E2eResult<bool> {
        let probe = wait_displayed(&self.session.driver, DASHBOARD_SHELL, VISIBILITY_PROBE).await?;
        Ok(probe.is_found())
    }

    pub async fn open_user_menu(&self) -> E2eResult<()> {
        let menu = require_displayed(
            &self.session.driver,
            USER_MENU,
            MENU_TIMEOUT,
            "user menu trigger",
        )
        .await?;
        menu.click().await?;
        Ok(())
    }

    /// Open the user menu, click logout, and wait for the redirect back to
    /// the login page.
    pub async fn logout(&self) -> E2eResult<()> {
        self.open_user_menu().await?;
        let item = require_displayed(
            &self.session.driver,
            LOGOUT_ITEM,
            MENU_TIMEOUT,
            "logout menu item",
        )
        .await?;
        item.click().await?;
        wait_for_path(
            &self.session.driver,
            |path| path.starts_with(LOGIN_ROUTE),
            LOGOUT_REDIRECT_TIMEOUT,
            "post-logout redirect to login",
        )
        .await
    }

    pub async fn toggle_sidebar(&self) -> E2eResult<()> {
        let toggle = require_displayed(
            &self.session.driver,
            SIDEBAR_TOGGLE,
            MENU_TIMEOUT,
            "sidebar toggle",
        )
        .await?;
        toggle.click().await?;
        Ok(())
    }

    pub async fn is_sidebar_open(&self) -> E2eResult<bool> {
        let probe = wait_displayed(&self.session.driver, SIDEBAR, VISIBILITY_PROBE).await?;
        Ok(probe.is_found())
    }

    /// Bearer token the SPA keeps in localStorage, if any.
    pub async fn auth_token(&self) -> E2eResult<Option<String>> {
        self.session
            .local_storage(crate::session::AUTH_TOKEN_KEY)
            .await
    }
}
