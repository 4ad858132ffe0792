//! Run configuration resolved once at startup
//!
//! Every knob comes from an `E2E_*` environment variable with a documented
//! literal fallback. Fixtures receive the resolved config by reference;
//! nothing else in the harness reads the environment.

use std::path::PathBuf;

/// Naming convention that marks records as disposable test data.
///
/// Any backend record whose display name starts with this prefix is eligible
/// for bulk deletion by [`crate::api::ApiClient::cleanup_test_data`].
pub const TEST_DATA_PREFIX: &str = "E2E_TEST_";

/// Configuration for a test run.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Base URL of the web console (`E2E_APP_URL`)
    pub app_url: String,

    /// Base URL of the BrAPI backend (`E2E_API_URL`)
    pub api_url: String,

    /// WebDriver endpoint, e.g. a chromedriver or Selenium hub (`E2E_WEBDRIVER_URL`)
    pub webdriver_url: String,

    /// Demo user credentials (`E2E_TEST_EMAIL` / `E2E_TEST_PASSWORD`)
    pub test_email: String,
    pub test_password: String,

    /// Admin credentials (`E2E_ADMIN_EMAIL` / `E2E_ADMIN_PASSWORD`)
    pub admin_email: String,
    pub admin_password: String,

    /// Persisted storage state for the standard user session
    pub user_state_path: PathBuf,

    /// Persisted storage state for the admin session
    pub admin_state_path: PathBuf,

    /// Prefix identifying disposable test data
    pub data_prefix: String,

    /// Run the browser headless (`E2E_HEADLESS`, anything but "0" is true)
    pub headless: bool,
}

impl TestConfig {
    /// Resolve the configuration from the environment, falling back to the
    /// documented defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            app_url: env_or("E2E_APP_URL", "http://localhost:3000"),
            api_url: env_or("E2E_API_URL", "http://localhost:8000"),
            webdriver_url: env_or("E2E_WEBDRIVER_URL", "http://localhost:4444"),
            test_email: env_or("E2E_TEST_EMAIL", "demo@bijmantra.org"),
            test_password: env_or("E2E_TEST_PASSWORD", "demo123"),
            admin_email: env_or("E2E_ADMIN_EMAIL", "admin@bijmantra.org"),
            admin_password: env_or("E2E_ADMIN_PASSWORD", "admin123"),
            user_state_path: PathBuf::from(env_or("E2E_USER_STATE", ".auth/user.json")),
            admin_state_path: PathBuf::from(env_or("E2E_ADMIN_STATE", ".auth/admin.json")),
            data_prefix: TEST_DATA_PREFIX.to_string(),
            headless: env_or("E2E_HEADLESS", "1") != "0",
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:8000".to_string(),
            webdriver_url: "http://localhost:4444".to_string(),
            test_email: "demo@bijmantra.org".to_string(),
            test_password: "demo123".to_string(),
            admin_email: "admin@bijmantra.org".to_string(),
            admin_password: "admin123".to_string(),
            user_state_path: PathBuf::from(".auth/user.json"),
            admin_state_path: PathBuf::from(".auth/admin.json"),
            data_prefix: TEST_DATA_PREFIX.to_string(),
            headless: true,
        }
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
