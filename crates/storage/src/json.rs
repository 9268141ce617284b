//! JSON document principal store.

use crate::{Error, Principal, PrincipalRecord, PrincipalStore, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// A principal store backed by a JSON object keyed by username.
///
/// Records are decoded per lookup, so one malformed entry does not make
/// the rest of the document unreadable.
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    records: BTreeMap<String, Value>,
}

impl JsonStore {
    /// Load a store from a JSON file. A missing file yields an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "principal file missing, starting empty");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse a store from a JSON string.
    pub fn parse(json: &str) -> Result<Self> {
        let records = serde_json::from_str(json)?;
        Ok(Self { records })
    }

    /// Usernames present in the document, in sorted order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl PrincipalStore for JsonStore {
    fn lookup(&self, username: &str) -> Result<Option<Principal>> {
        let Some(value) = self.records.get(username) else {
            debug!(username, "principal not found");
            return Ok(None);
        };

        let record: PrincipalRecord =
            serde_json::from_value(value.clone()).map_err(|e| Error::MalformedRecord {
                username: username.to_string(),
                reason: e.to_string(),
            })?;

        record
            .into_principal(username)
            .inspect_err(|e| warn!(username, error = %e, "rejecting principal record"))
            .map(Some)
    }
}
