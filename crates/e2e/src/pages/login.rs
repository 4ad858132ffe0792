//! Login page object
//!
//! Drives the flow: unauthenticated, fill credentials, submit, then redirect
//! to an authenticated landing page. The redirect wait is a required state
//! transition and fails loudly on timeout; the error-alert query is optional
//! and resolves to [`Probe::Absent`] when no error is shown.

use std::time::Duration;

use crate::config::TestConfig;
use crate::error::E2eResult;
use crate::routes::LOGIN_ROUTE;
use crate::session::BrowserSession;

use super::{require_displayed, wait_displayed, wait_for_path, Locators, Probe, Strategy};

const EMAIL_INPUT: Locators = Locators(&[
    Strategy::Css("input[type='email']"),
    Strategy::Css("input[name='email']"),
    Strategy::Css("#email"),
]);

const PASSWORD_INPUT: Locators = Locators(&[
    Strategy::Css("input[type='password']"),
    Strategy::Css("input[name='password']"),
    Strategy::Css("#password"),
]);

const SUBMIT_BUTTON: Locators = Locators(&[
    Strategy::Css("button[type='submit']"),
    Strategy::Css("form button"),
    Strategy::Text("Sign In"),
]);

const ERROR_ALERT: Locators = Locators(&[
    Strategy::Css("[role='alert']"),
    Strategy::Css(".ant-alert-error"),
    Strategy::Css(".error-message"),
]);

/// How long the form gets to appear before a required fill fails.
const FORM_TIMEOUT: Duration = Duration::from_secs(5);

/// Post-submit redirect deadline.
pub const REDIRECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Bounded probe window for the optional error alert.
const ERROR_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct LoginPage<'a> {
    session: &'a BrowserSession,
}

impl<'a> LoginPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    /// Navigate to the login page.
    pub async fn open(&self) -> E2eResult<()> {
        self.session.goto(LOGIN_ROUTE).await
    }

    /// Fill the credential fields without submitting.
    pub async fn fill_credentials(&self, email: &str, password: &str) -> E2eResult<()> {
        let email_field = require_displayed(
            &self.session.driver,
            EMAIL_INPUT,
            FORM_TIMEOUT,
            "login email input",
        )
        .await?;
        email_field.clear().await?;
        email_field.send_keys(email).await?;

        let password_field = require_displayed(
            &self.session.driver,
            PASSWORD_INPUT,
            FORM_TIMEOUT,
            "login password input",
        )
        .await?;
        password_field.clear().await?;
        password_field.send_keys(password).await?;

        Ok(())
    }

    /// Submit the form.
    pub async fn submit(&self) -> E2eResult<()> {
        let button = require_displayed(
            &self.session.driver,
            SUBMIT_BUTTON,
            FORM_TIMEOUT,
            "login submit button",
        )
        .await?;
        button.click().await?;
        Ok(())
    }

    /// Full login flow: fill, submit, and wait for the authenticated
    /// landing page (`/dashboard` or `/gateway`).
    pub async fn login(&self, email: &str, password: &str) -> E2eResult<()> {
        self.fill_credentials(email, password).await?;
        self.submit().await?;
        wait_for_path(
            &self.session.driver,
            is_authenticated_landing,
            REDIRECT_TIMEOUT,
            "post-login redirect",
        )
        .await
    }

    /// Log in with the configured demo-user credentials.
    pub async fn login_as_demo(&self, config: &TestConfig) -> E2eResult<()> {
        self.login(&config.test_email, &config.test_password).await
    }

    /// Log in with the configured admin credentials.
    pub async fn login_as_admin(&self, config: &TestConfig) -> E2eResult<()> {
        self.login(&config.admin_email, &config.admin_password).await
    }

    /// Probe the alert region for a login error. Absence is a valid outcome,
    /// not a failure.
    pub async fn login_error(&self) -> E2eResult<Probe<String>> {
        match wait_displayed(&self.session.driver, ERROR_ALERT, ERROR_PROBE_TIMEOUT).await? {
            Probe::Found(alert) => Ok(Probe::Found(alert.text().await?)),
            Probe::Absent => Ok(Probe::Absent),
        }
    }

    /// Whether the browser is still on the login page.
    pub async fn is_current(&self) -> E2eResult<bool> {
        Ok(self.session.current_path().await?.starts_with(LOGIN_ROUTE))
    }
}

/// URL patterns that count as "logged in and landed".
pub fn is_authenticated_landing(path: &str) -> bool {
    path.starts_with("/dashboard") || path.starts_with("/gateway")
}
