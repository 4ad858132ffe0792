//! Bijmantra E2E Test Harness
//!
//! This crate drives the Bijmantra web console and its BrAPI v2 backend for
//! end-to-end testing:
//! - A static route registry mapping logical page names to URL paths
//! - An authenticated HTTP client for API-level setup and teardown
//! - Page objects over a live WebDriver session
//! - A navigation helper with a shared page-readiness heuristic
//! - Fixtures composing the above, including pre-authenticated sessions
//!   rebuilt from persisted storage state
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Test Harness (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Harness (fixtures)                                         │
//! │    ├── api() -> ApiClient          setup/teardown via HTTP  │
//! │    ├── session() -> BrowserSession fresh WebDriver page     │
//! │    ├── authenticated_session()     from .auth/user.json     │
//! │    └── admin_session()             from .auth/admin.json    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Page Objects (Login, Dashboard, Programs)                  │
//! │    └── ordered locator alternatives, Probe-based queries    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Navigator: goto + readiness heuristic, sidebar traversal   │
//! │  Routes: static tree -> all / protected / public sets       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The application under test is external: the harness connects to a
//! running deployment and a WebDriver endpoint, both taken from `E2E_*`
//! environment variables.

pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod nav;
pub mod pages;
pub mod routes;
pub mod session;

pub use api::{ApiClient, BrapiPage, PageQuery, Resource};
pub use config::{TestConfig, TEST_DATA_PREFIX};
pub use error::{E2eError, E2eResult};
pub use fixtures::{Harness, Role};
pub use nav::Navigator;
pub use pages::{DashboardPage, LoginPage, Probe, ProgramsPage};
pub use session::{BrowserSession, StorageState, AUTH_TOKEN_KEY};
