//! Page objects over the live console UI
//!
//! Each page object holds a borrowed [`crate::session::BrowserSession`] and
//! translates a named user intent into locator-and-interact operations. No
//! in-memory mirror of the DOM is kept; every query re-reads the live page.
//!
//! Logical elements are matched by an ordered list of alternative locator
//! strategies, first match wins, which tolerates minor markup drift between
//! environments. Optional-element queries return a [`Probe`] instead of
//! coercing timeouts to booleans, so "not there within the wait" stays
//! distinguishable from a hard WebDriver failure.

pub mod dashboard;
pub mod login;
pub mod programs;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use programs::ProgramsPage;

use std::time::{Duration, Instant};

use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tokio::time::sleep;

use crate::error::{E2eError, E2eResult};

/// Poll interval for bounded element waits.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of a bounded lookup for an element that is allowed to be absent.
#[derive(Debug)]
pub enum Probe<T> {
    Found(T),
    Absent,
}

impl<T> Probe<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Probe::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Probe::Found(value) => Some(value),
            Probe::Absent => None,
        }
    }
}

/// One way of locating a logical element.
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// A CSS selector.
    Css(&'static str),
    /// Exact visible text, matched anywhere in the document.
    Text(&'static str),
}

impl Strategy {
    pub(crate) fn by(&self) -> By {
        match self {
            Strategy::Css(selector) => By::Css(*selector),
            Strategy::Text(text) => By::XPath(format!(
                "//*[normalize-space(text())='{}']",
                text
            )),
        }
    }
}

/// Ordered alternatives for one logical element; evaluated in sequence.
#[derive(Debug, Clone, Copy)]
pub struct Locators(pub &'static [Strategy]);

/// Find the first matching element across the alternatives, without waiting.
///
/// "No such element" moves on to the next alternative; any other WebDriver
/// failure propagates.
pub(crate) async fn find_first(
    driver: &WebDriver,
    locators: Locators,
) -> E2eResult<Probe<WebElement>> {
    for strategy in locators.0 {
        match driver.find(strategy.by()).await {
            Ok(element) => return Ok(Probe::Found(element)),
            Err(WebDriverError::NoSuchElement(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Probe::Absent)
}

/// Wait up to `timeout` for any alternative to be present and displayed.
pub(crate) async fn wait_displayed(
    driver: &WebDriver,
    locators: Locators,
    timeout: Duration,
) -> E2eResult<Probe<WebElement>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Probe::Found(element) = find_first(driver, locators).await? {
            if element.is_displayed().await.unwrap_or(false) {
                return Ok(Probe::Found(element));
            }
        }
        if Instant::now() >= deadline {
            return Ok(Probe::Absent);
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Like [`wait_displayed`] but a miss is fatal: used for elements a flow
/// cannot proceed without.
pub(crate) async fn require_displayed(
    driver: &WebDriver,
    locators: Locators,
    timeout: Duration,
    what: &str,
) -> E2eResult<WebElement> {
    match wait_displayed(driver, locators, timeout).await? {
        Probe::Found(element) => Ok(element),
        Probe::Absent => Err(E2eError::Timeout(what.to_string())),
    }
}

/// Wait up to `timeout` for every alternative to be gone or hidden.
/// Errors with a timeout naming `what` if something is still visible.
pub(crate) async fn wait_gone(
    driver: &WebDriver,
    locators: Locators,
    timeout: Duration,
    what: &str,
) -> E2eResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let mut visible = false;
        for strategy in locators.0 {
            match driver.find(strategy.by()).await {
                Ok(element) => {
                    if element.is_displayed().await.unwrap_or(false) {
                        visible = true;
                        break;
                    }
                }
                Err(WebDriverError::NoSuchElement(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if !visible {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(E2eError::Timeout(what.to_string()));
        }
        sleep(POLL_INTERVAL).await;
    }
}

/// Wait up to `timeout` for the current URL path to satisfy `predicate`.
pub(crate) async fn wait_for_path(
    driver: &WebDriver,
    predicate: impl Fn(&str) -> bool,
    timeout: Duration,
    what: &str,
) -> E2eResult<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let url = driver.current_url().await?;
        if predicate(url.path()) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(E2eError::Timeout(what.to_string()));
        }
        sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_found_and_absent() {
        let found: Probe<u8> = Probe::Found(7);
        assert!(found.is_found());
        assert_eq!(found.into_option(), Some(7));

        let absent: Probe<u8> = Probe::Absent;
        assert!(!absent.is_found());
        assert_eq!(absent.into_option(), None);
    }

    #[test]
    fn locator_alternatives_keep_declaration_order() {
        const EMAIL: Locators = Locators(&[
            Strategy::Css("input[type='email']"),
            Strategy::Css("#email"),
        ]);
        assert!(matches!(EMAIL.0[0], Strategy::Css("input[type='email']")));
        assert!(matches!(EMAIL.0[1], Strategy::Css("#email")));
    }
}
