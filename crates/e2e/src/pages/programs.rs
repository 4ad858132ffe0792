//! Programs listing page object, the representative module screen.

use std::time::Duration;

use crate::error::E2eResult;
use crate::session::BrowserSession;

use super::{wait_displayed, Locators, Strategy};

const PROGRAMS_TABLE: Locators = Locators(&[
    Strategy::Css("[data-testid='programs-table']"),
    Strategy::Css("table"),
    Strategy::Css(".programs-list"),
]);

const PROGRAM_NAME_CELL: Locators = Locators(&[
    Strategy::Css("[data-testid='program-name']"),
    Strategy::Css("table tbody tr td:first-child"),
]);

const LOAD_PROBE: Duration = Duration::from_secs(3);

pub struct ProgramsPage<'a> {
    session: &'a BrowserSession,
}

impl<'a> ProgramsPage<'a> {
    pub fn new(session: &'a BrowserSession) -> Self {
        Self { session }
    }

    pub async fn open(&self) -> E2eResult<()> {
        self.session.goto("/programs").await
    }

    pub async fn is_loaded(&self) -> E2eResult<bool> {
        let probe = wait_displayed(&self.session.driver, PROGRAMS_TABLE, LOAD_PROBE).await?;
        Ok(probe.is_found())
    }

    /// Program names currently rendered in the listing.
    pub async fn visible_program_names(&self) -> E2eResult<Vec<String>> {
        let mut names = Vec::new();
        for strategy in PROGRAM_NAME_CELL.0 {
            let cells = self.session.driver.find_all(strategy.by()).await?;
            if cells.is_empty() {
                continue;
            }
            for cell in cells {
                let text = cell.text().await?;
                if !text.is_empty() {
                    names.push(text);
                }
            }
            break;
        }
        Ok(names)
    }

    pub async fn has_program(&self, name: &str) -> E2eResult<bool> {
        Ok(self
            .visible_program_names()
            .await?
            .iter()
            .any(|n| n == name))
    }
}
