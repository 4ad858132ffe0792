//! Composition root wiring configuration, API client, and browser sessions
//!
//! Tests build one [`Harness`] from the run configuration and request their
//! dependencies from it. Sessions are constructed per test and owned by the
//! caller, which closes them with `quit()` at test end; pre-authenticated
//! sessions are rebuilt from persisted storage state each time rather than
//! shared across tests.

use std::path::PathBuf;

use tracing::info;

use crate::api::ApiClient;
use crate::config::TestConfig;
use crate::error::E2eResult;
use crate::nav::Navigator;
use crate::pages::LoginPage;
use crate::session::{BrowserSession, StorageState};

/// Which persisted identity to use for a pre-authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

pub struct Harness {
    config: TestConfig,
}

impl Harness {
    pub fn new(config: TestConfig) -> Self {
        Self { config }
    }

    /// Build a harness from the environment.
    pub fn from_env() -> Self {
        Self::new(TestConfig::from_env())
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// API client bound to the configured backend, with no token yet.
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config.api_url)
    }

    /// API client already authenticated as the demo user.
    pub async fn authenticated_api(&self) -> E2eResult<ApiClient> {
        let mut api = self.api();
        api.authenticate(&self.config.test_email, &self.config.test_password)
            .await?;
        Ok(api)
    }

    /// Fresh, unauthenticated browser session.
    pub async fn session(&self) -> E2eResult<BrowserSession> {
        BrowserSession::connect(&self.config).await
    }

    /// Fresh session carrying the persisted standard-user login.
    pub async fn authenticated_session(&self) -> E2eResult<BrowserSession> {
        self.session_with_state(Role::User).await
    }

    /// Fresh session carrying the persisted admin login.
    pub async fn admin_session(&self) -> E2eResult<BrowserSession> {
        self.session_with_state(Role::Admin).await
    }

    async fn session_with_state(&self, role: Role) -> E2eResult<BrowserSession> {
        let state = StorageState::load(&self.state_path(role))?;
        let session = self.session().await?;
        session.apply_storage_state(&state).await?;
        Ok(session)
    }

    /// Convenience: navigator over a borrowed session.
    pub fn navigator<'a>(&self, session: &'a BrowserSession) -> Navigator<'a> {
        Navigator::new(session)
    }

    /// Setup flow producing the persisted state file for a role: log in
    /// through the UI with the configured credentials, capture the session,
    /// write it to the role's state file.
    pub async fn save_auth_state(&self, role: Role) -> E2eResult<PathBuf> {
        let session = self.session().await?;

        let outcome = async {
            let login = LoginPage::new(&session);
            login.open().await?;
            match role {
                Role::User => login.login_as_demo(&self.config).await?,
                Role::Admin => login.login_as_admin(&self.config).await?,
            }
            session.capture_storage_state().await
        }
        .await;

        let quit_result = session.quit().await;

        let state = outcome?;
        quit_result?;

        let path = self.state_path(role);
        state.save(&path)?;
        info!("Saved {:?} auth state to {}", role, path.display());
        Ok(path)
    }

    /// Display name for a disposable record: carries the configured data
    /// prefix so cleanup can find it, plus a per-call counter so repeated
    /// calls within a run do not collide.
    pub fn test_name(&self, base: &str) -> String {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("{}{}_{}", self.config.data_prefix, base, n)
    }

    fn state_path(&self, role: Role) -> PathBuf {
        match role {
            Role::User => self.config.user_state_path.clone(),
            Role::Admin => self.config.admin_state_path.clone(),
        }
    }
}
