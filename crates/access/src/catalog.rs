//! The ordered set of protected resources.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use storage::GRANT_SEPARATOR;
use std::path::Path;

/// Number of dashboards in the default catalog.
pub const DEFAULT_DASHBOARDS: usize = 6;

/// A protected resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Identifier matched against a principal's granted resources.
    pub id: String,

    /// Display title for callers that render the catalog.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Resource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
        }
    }

    /// The title, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// A fixed, ordered list of resources.
///
/// Evaluation emits one decision per catalog entry, in catalog order.
/// Identifiers are non-empty, unique, trimmed and free of the grant separator,
/// so every resource can be granted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CatalogDef")]
pub struct Catalog {
    resources: Vec<Resource>,
}

/// Catalog as written in TOML: a `[[resource]]` array of tables.
#[derive(Debug, Deserialize)]
struct CatalogDef {
    #[serde(default)]
    resource: Option<Vec<Resource>>,
}

impl TryFrom<CatalogDef> for Catalog {
    type Error = Error;

    fn try_from(def: CatalogDef) -> Result<Self> {
        match def.resource {
            Some(resources) => Catalog::new(resources),
            None => Ok(Catalog::default()),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::dashboards(DEFAULT_DASHBOARDS)
    }
}

impl Catalog {
    /// Build a catalog, rejecting identifiers no grant could match.
    pub fn new(resources: Vec<Resource>) -> Result<Self> {
        let mut seen = HashSet::new();
        for resource in &resources {
            let id = resource.id.as_str();
            if id.trim().is_empty() {
                return Err(Error::Invalid("resource id must not be empty".into()));
            }
            if id.trim() != id {
                return Err(Error::Invalid(format!("resource id '{id}' has surrounding whitespace")));
            }
            if id.contains(GRANT_SEPARATOR) {
                return Err(Error::Invalid(format!(
                    "resource id '{id}' contains '{GRANT_SEPARATOR}'"
                )));
            }
            if !seen.insert(resource.id.as_str()) {
                return Err(Error::Invalid(format!(
                    "duplicate resource id '{}'",
                    resource.id
                )));
            }
        }
        Ok(Self { resources })
    }

    /// Build a catalog from bare identifiers.
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ids.into_iter().map(Resource::new).collect())
    }

    /// `dashboard1` through `dashboard{count}`.
    pub fn dashboards(count: usize) -> Self {
        let resources = (1..=count)
            .map(|n| Resource {
                id: format!("dashboard{n}"),
                title: Some(format!("Dashboard {n}")),
                description: None,
            })
            .collect();
        Self { resources }
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a catalog from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let def: CatalogDef = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;
        Self::try_from(def)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_six_dashboards() {
        let catalog = Catalog::default();
        let ids: Vec<_> = catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["dashboard1", "dashboard2", "dashboard3", "dashboard4", "dashboard5", "dashboard6"]
        );
        assert_eq!(catalog.get("dashboard4").unwrap().display_name(), "Dashboard 4");
    }

    #[test]
    fn test_parse_toml_keeps_order() {
        let toml = r#"
[[resource]]
id = "reports"
title = "Reports"
description = "Monthly performance."

[[resource]]
id = "alerts"
"#;
        let catalog = Catalog::parse(toml).unwrap();

        let ids: Vec<_> = catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["reports", "alerts"]);
        assert_eq!(catalog.get("alerts").unwrap().display_name(), "alerts");
        assert_eq!(
            catalog.get("reports").unwrap().description.as_deref(),
            Some("Monthly performance.")
        );
    }

    #[test]
    fn test_parse_without_resources_uses_default() {
        assert_eq!(Catalog::parse("").unwrap(), Catalog::default());
    }

    #[test]
    fn test_explicit_empty_catalog() {
        assert!(Catalog::parse("resource = []").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::from_ids(["d1", "d2", "d1"]).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));

        let toml = r#"
[[resource]]
id = "d1"

[[resource]]
id = "d1"
"#;
        assert!(matches!(Catalog::parse(toml), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_blank_id_rejected() {
        assert!(matches!(Catalog::from_ids(["d1", " "]), Err(Error::Invalid(_))));
        assert!(matches!(
            Catalog::parse("[[resource]]\nid = \"\""),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_ungrantable_ids_rejected() {
        assert!(matches!(Catalog::from_ids([" d1"]), Err(Error::Invalid(_))));
        assert!(matches!(Catalog::from_ids(["d1 "]), Err(Error::Invalid(_))));
        assert!(matches!(Catalog::from_ids(["d1,d2"]), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        assert!(matches!(Catalog::parse("[[resource]"), Err(Error::Parse(_))));
    }
}
