//! Principal records and their stored representation.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Date format used by every backing store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator of the joined permission form. Never valid inside an identifier.
pub const GRANT_SEPARATOR: &str = ",";

/// An identity together with its entitlements.
///
/// Access is valid through the end of `expiry_date`. There is no
/// "never expires" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub credential_secret: String,
    pub expiry_date: NaiveDate,
    pub granted: BTreeSet<String>,
}

impl Principal {
    pub fn new(
        username: impl Into<String>,
        credential_secret: impl Into<String>,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            username: username.into(),
            credential_secret: credential_secret.into(),
            expiry_date,
            granted: BTreeSet::new(),
        }
    }

    /// Grant a resource identifier.
    pub fn with_grant(mut self, resource: impl Into<String>) -> Self {
        self.granted.insert(resource.into());
        self
    }

    pub fn is_granted(&self, resource: &str) -> bool {
        self.granted.contains(resource)
    }

    /// True once `today` is strictly after the expiry date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expiry_date
    }

    /// Fail if a grant cannot survive the joined permission form.
    pub fn check_grants(&self) -> Result<()> {
        match self.granted.iter().find(|g| g.contains(GRANT_SEPARATOR)) {
            Some(grant) => Err(Error::MalformedRecord {
                username: self.username.clone(),
                reason: format!("permission '{grant}' contains '{GRANT_SEPARATOR}'"),
            }),
            None => Ok(()),
        }
    }

    /// Convert back into the stored representation.
    pub fn to_record(&self) -> PrincipalRecord {
        PrincipalRecord {
            password: self.credential_secret.clone(),
            expiry_date: self.expiry_date.format(DATE_FORMAT).to_string(),
            permissions: Permissions::List(self.granted.iter().cloned().collect()),
        }
    }
}

/// A principal as it appears in a backing store, keyed externally by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRecord {
    pub password: String,
    pub expiry_date: String,
    #[serde(default)]
    pub permissions: Permissions,
}

/// Granted resources, either as a list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Permissions {
    List(Vec<String>),
    Joined(String),
}

impl Default for Permissions {
    fn default() -> Self {
        Permissions::List(Vec::new())
    }
}

impl Permissions {
    /// Normalized resource identifiers: trimmed, empty items dropped.
    pub fn to_set(&self) -> BTreeSet<String> {
        let items: Vec<&str> = match self {
            Permissions::List(list) => list.iter().map(String::as_str).collect(),
            Permissions::Joined(joined) => joined.split(GRANT_SEPARATOR).collect(),
        };
        items
            .into_iter()
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Comma-separated form, as stored in the relational table.
    pub fn joined(&self) -> String {
        self.to_set()
            .into_iter()
            .collect::<Vec<_>>()
            .join(GRANT_SEPARATOR)
    }
}

impl PrincipalRecord {
    /// Decode this record into a [`Principal`].
    pub fn into_principal(self, username: impl Into<String>) -> Result<Principal> {
        let username = username.into();
        let expiry_date = NaiveDate::parse_from_str(self.expiry_date.trim(), DATE_FORMAT)
            .map_err(|e| Error::MalformedRecord {
                username: username.clone(),
                reason: format!("expiry_date '{}': {e}", self.expiry_date),
            })?;

        let principal = Principal {
            granted: self.permissions.to_set(),
            username,
            credential_secret: self.password,
            expiry_date,
        };
        principal.check_grants()?;
        Ok(principal)
    }
}
