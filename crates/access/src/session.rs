//! Caller-owned session context.

use crate::{AccessMap, Error, Evaluator, Result};
use chrono::NaiveDate;
use storage::PrincipalStore;
use tracing::debug;

/// The page a session is currently on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Main,
    Resource(String),
}

/// A logged-in user, the date used for evaluation, and the current page.
///
/// Owned by the caller and passed in explicitly; nothing here is global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    today: NaiveDate,
    page: Page,
}

impl Session {
    pub fn new(username: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            username: username.into(),
            today,
            page: Page::Main,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Move the session to a later date, e.g. when a long-lived session spans midnight.
    pub fn advance_to(&mut self, today: NaiveDate) {
        self.today = today;
    }

    /// Evaluate access for this session's user and date.
    pub fn access<S: PrincipalStore>(&self, evaluator: &Evaluator<S>) -> Result<AccessMap> {
        evaluator.evaluate(&self.username, self.today)
    }

    /// Switch pages. Resource pages require a grant in `access`.
    pub fn navigate(&mut self, target: Page, access: &AccessMap) -> Result<()> {
        if let Page::Resource(id) = &target
            && !access.is_granted(id)
        {
            debug!(username = %self.username, resource = %id, "navigation refused");
            return Err(Error::NotPermitted(id.clone()));
        }
        self.page = target;
        Ok(())
    }
}
