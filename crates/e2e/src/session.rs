//! Browser session management and persisted storage state
//!
//! A [`BrowserSession`] wraps one WebDriver connection bound to the console's
//! base URL. Sessions are created per test and closed with [`BrowserSession::quit`];
//! they are never shared between tests.
//!
//! [`StorageState`] is the serialized cookies + localStorage of a logged-in
//! session, persisted to disk so tests can skip the login form. The JSON
//! shape matches the Playwright storage-state format, so state files are
//! interchangeable with the old suite's `playwright/.auth/*.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thirtyfour::prelude::*;
use thirtyfour::Cookie;
use tracing::{debug, info};

use crate::config::TestConfig;
use crate::error::{E2eError, E2eResult};

/// localStorage key the console uses for its bearer token. Login and logout
/// tests assert on this key.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// One live browser session bound to the app base URL.
pub struct BrowserSession {
    pub driver: WebDriver,
    app_url: String,
}

impl BrowserSession {
    /// Open a new session against the configured WebDriver endpoint.
    pub async fn connect(config: &TestConfig) -> E2eResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }

        let driver = WebDriver::new(&config.webdriver_url, caps)
            .await
            .map_err(|e| {
                E2eError::SessionStartup(format!(
                    "WebDriver at {} rejected session: {}",
                    config.webdriver_url, e
                ))
            })?;

        debug!("Browser session opened via {}", config.webdriver_url);

        Ok(Self {
            driver,
            app_url: config.app_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn app_url(&self) -> &str {
        &self.app_url
    }

    /// Absolute URL for a root-relative route.
    pub fn url_for(&self, route: &str) -> String {
        format!("{}{}", self.app_url, route)
    }

    /// Navigate to a root-relative route.
    pub async fn goto(&self, route: &str) -> E2eResult<()> {
        self.driver.goto(self.url_for(route)).await?;
        Ok(())
    }

    /// Path component of the current URL.
    pub async fn current_path(&self) -> E2eResult<String> {
        let url = self.driver.current_url().await?;
        Ok(url.path().to_string())
    }

    /// Read one localStorage value from the live page.
    pub async fn local_storage(&self, key: &str) -> E2eResult<Option<String>> {
        let ret = self
            .driver
            .execute(
                "return window.localStorage.getItem(arguments[0]);",
                vec![json!(key)],
            )
            .await?;
        Ok(ret.convert()?)
    }

    pub async fn set_local_storage(&self, key: &str, value: &str) -> E2eResult<()> {
        self.driver
            .execute(
                "window.localStorage.setItem(arguments[0], arguments[1]);",
                vec![json!(key), json!(value)],
            )
            .await?;
        Ok(())
    }

    pub async fn clear_local_storage(&self, key: &str) -> E2eResult<()> {
        self.driver
            .execute(
                "window.localStorage.removeItem(arguments[0]);",
                vec![json!(key)],
            )
            .await?;
        Ok(())
    }

    /// Install a persisted session into this browser.
    ///
    /// Cookies and localStorage can only be written from the app's own
    /// origin, so this navigates there first, then reloads so the SPA boots
    /// with the session already in place.
    pub async fn apply_storage_state(&self, state: &StorageState) -> E2eResult<()> {
        self.driver.goto(&self.app_url).await?;

        for cookie in &state.cookies {
            self.driver.add_cookie(cookie.to_webdriver()).await?;
        }

        for origin in &state.origins {
            for item in &origin.local_storage {
                self.set_local_storage(&item.name, &item.value).await?;
            }
        }

        self.driver.refresh().await?;
        Ok(())
    }

    /// Capture the current session's cookies and localStorage.
    pub async fn capture_storage_state(&self) -> E2eResult<StorageState> {
        let cookies = self
            .driver
            .get_all_cookies()
            .await?
            .into_iter()
            .map(StateCookie::from_webdriver)
            .collect();

        let origin: String = self
            .driver
            .execute("return window.location.origin;", vec![])
            .await?
            .convert()?;

        let local_storage: Vec<StorageItem> = self
            .driver
            .execute(
                "var out = []; \
                 for (var i = 0; i < window.localStorage.length; i++) { \
                   var k = window.localStorage.key(i); \
                   out.push({ name: k, value: window.localStorage.getItem(k) }); \
                 } \
                 return out;",
                vec![],
            )
            .await?
            .convert()?;

        Ok(StorageState {
            cookies,
            origins: vec![OriginState {
                origin,
                local_storage,
            }],
        })
    }

    /// Close the browser. Sessions are owned per test; always call this at
    /// test end.
    pub async fn quit(self) -> E2eResult<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// Serialized browser session: cookies plus per-origin localStorage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub cookies: Vec<StateCookie>,
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateCookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: bool,
    /// WebDriver does not report this flag, so captured states always record
    /// `false`. The field is kept so Playwright-written state files parse.
    #[serde(default, rename = "httpOnly")]
    pub http_only: bool,
}

impl StateCookie {
    fn to_webdriver(&self) -> Cookie {
        Cookie {
            name: self.name.clone(),
            value: self.value.clone(),
            path: self.path.clone(),
            domain: self.domain.clone(),
            secure: Some(self.secure),
            expiry: None,
            same_site: None,
        }
    }

    fn from_webdriver(cookie: Cookie) -> Self {
        Self {
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            secure: cookie.secure.unwrap_or(false),
            http_only: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginState {
    pub origin: String,
    #[serde(default, rename = "localStorage")]
    pub local_storage: Vec<StorageItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageItem {
    pub name: String,
    pub value: String,
}

impl StorageState {
    /// Load persisted state from disk.
    pub fn load(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            E2eError::StorageState(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            E2eError::StorageState(format!("malformed state file {}: {}", path.display(), e))
        })
    }

    /// Persist state to disk, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Storage state written to {}", path.display());
        Ok(())
    }

    /// Value of a localStorage key across all recorded origins.
    pub fn local_storage_value(&self, key: &str) -> Option<&str> {
        self.origins
            .iter()
            .flat_map(|o| &o.local_storage)
            .find(|item| item.name == key)
            .map(|item| item.value.as_str())
    }
}
