//! Per-resource access decisions.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The outcome for one catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// Granted, with whole days left before the principal expires.
    Granted { days_remaining: u32 },
    /// The resource is not among the principal's grants.
    Denied,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }

    pub fn days_remaining(&self) -> Option<u32> {
        match self {
            AccessDecision::Granted { days_remaining } => Some(*days_remaining),
            AccessDecision::Denied => None,
        }
    }
}

/// Decisions keyed by resource id, in catalog order.
///
/// An empty map means the principal is unknown or expired; it is not the
/// same as a map where every entry is [`AccessDecision::Denied`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessMap {
    entries: Vec<(String, AccessDecision)>,
}

impl AccessMap {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, resource: impl Into<String>, decision: AccessDecision) {
        self.entries.push((resource.into(), decision));
    }

    pub fn get(&self, resource: &str) -> Option<AccessDecision> {
        self.entries
            .iter()
            .find(|(id, _)| id == resource)
            .map(|(_, decision)| *decision)
    }

    pub fn is_granted(&self, resource: &str) -> bool {
        self.get(resource).is_some_and(|d| d.is_granted())
    }

    /// Granted resource ids, in catalog order.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, decision)| decision.is_granted())
            .map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, AccessDecision)> {
        self.entries.iter().map(|(id, decision)| (id.as_str(), *decision))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AccessMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, decision) in &self.entries {
            map.serialize_entry(id, decision)?;
        }
        map.end()
    }
}
