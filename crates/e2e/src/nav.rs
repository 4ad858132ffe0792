//! Cross-page navigation with a shared page-readiness heuristic
//!
//! Pages in the console show a loading indicator while they fetch. The
//! heuristic: probe briefly for an indicator; if one is visible, wait for it
//! to go away; if none appears within the probe window, the page is assumed
//! ready. Pages without an indicator are therefore considered instantly
//! ready, which is a guess rather than a guarantee.

use std::time::Duration;

use thirtyfour::prelude::*;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::pages::{wait_displayed, wait_gone, Locators, Probe, Strategy};
use crate::session::BrowserSession;

const LOADING_INDICATOR: Locators = Locators(&[
    Strategy::Css("[data-testid='loading']"),
    Strategy::Css(".loading-spinner"),
    Strategy::Css(".ant-spin-spinning"),
]);

/// Window in which a loading indicator must appear to be waited on.
const READY_PROBE_WINDOW: Duration = Duration::from_millis(500);

/// Deadline for a visible indicator to disappear.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between sidebar clicks for expand/collapse animation.
const SIDEBAR_STEP_PAUSE: Duration = Duration::from_millis(300);

const SIDEBAR_ITEM_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Navigator<'a> {
    session: &'a BrowserSession,
}

impl<'a> Navigator<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    /// Navigate to a root-relative route and wait for the page to be usable.
    pub async fn goto(&self, route: &str) -> E2eResult<()> {
        debug!("Navigating to {}", route);
        self.session.goto(route).await?;
        self.wait_until_ready().await
    }

    /// Apply the readiness heuristic to the current page.
    pub async fn wait_until_ready(&self) -> E2eResult<()> {
        match wait_displayed(&self.session.driver, LOADING_INDICATOR, READY_PROBE_WINDOW).await? {
            Probe::Absent => Ok(()),
            Probe::Found(_) => {
                wait_gone(
                    &self.session.driver,
                    LOADING_INDICATOR,
                    READY_TIMEOUT,
                    "loading indicator to disappear",
                )
                .await
            }
        }
    }

    /// Click through a sequence of sidebar menu labels, pausing between
    /// clicks for the menu animation, then wait for readiness once.
    pub async fn navigate_via_sidebar(&self, labels: &[&str]) -> E2eResult<()> {
        for label in labels {
            let item = self.find_sidebar_item(label).await?;
            item.click().await?;
            sleep(SIDEBAR_STEP_PAUSE).await;
        }
        self.wait_until_ready().await
    }

    pub async fn back(&self) -> E2eResult<()> {
        self.session.driver.back().await?;
        self.wait_until_ready().await
    }

    pub async fn forward(&self) -> E2eResult<()> {
        self.session.driver.forward().await?;
        self.wait_until_ready().await
    }

    pub async fn refresh(&self) -> E2eResult<()> {
        self.session.driver.refresh().await?;
        self.wait_until_ready().await
    }

    async fn find_sidebar_item(&self, label: &str) -> E2eResult<WebElement> {
        // Prefer an item inside the nav, fall back to any element with the
        // exact label text.
        let candidates = [
            format!("//nav//*[normalize-space(text())='{label}']"),
            format!("//*[normalize-space(text())='{label}']"),
        ];

        let deadline = std::time::Instant::now() + SIDEBAR_ITEM_TIMEOUT;
        loop {
            for xpath in &candidates {
                match self.session.driver.find(By::XPath(xpath.clone())).await {
                    Ok(element) => {
                        if element.is_displayed().await.unwrap_or(false) {
                            return Ok(element);
                        }
                    }
                    Err(thirtyfour::error::WebDriverError::NoSuchElement(_)) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            if std::time::Instant::now() >= deadline {
                return Err(E2eError::Timeout(format!("sidebar item '{label}'")));
            }
            sleep(crate::pages::POLL_INTERVAL).await;
        }
    }
}
