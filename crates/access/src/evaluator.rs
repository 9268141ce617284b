//! Access evaluation over the resource catalog.

use crate::{AccessDecision, AccessMap, Catalog, Result};
use chrono::NaiveDate;
use storage::{Principal, PrincipalStore};
use tracing::debug;

/// Evaluate one principal against a catalog.
///
/// Pure: the result depends only on the catalog, the principal and `today`.
/// An expired principal yields an empty map. Otherwise every catalog
/// resource gets exactly one decision, and all granted resources share the
/// same `days_remaining`. Grants outside the catalog are ignored.
pub fn evaluate_principal(
    catalog: &Catalog,
    principal: &Principal,
    today: NaiveDate,
) -> AccessMap {
    if principal.is_expired(today) {
        debug!(
            username = %principal.username,
            expiry = %principal.expiry_date,
            "principal expired"
        );
        return AccessMap::default();
    }

    // Non-negative: expired principals returned above.
    let days_remaining =
        u32::try_from((principal.expiry_date - today).num_days()).unwrap_or_default();

    let mut map = AccessMap::with_capacity(catalog.len());
    for resource in catalog.iter() {
        let decision = if principal.is_granted(&resource.id) {
            AccessDecision::Granted { days_remaining }
        } else {
            AccessDecision::Denied
        };
        map.push(resource.id.as_str(), decision);
    }
    map
}

/// Produces access decisions for usernames resolved through a store.
#[derive(Debug)]
pub struct Evaluator<S> {
    store: S,
    catalog: Catalog,
}

impl<S: PrincipalStore> Evaluator<S> {
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Evaluate access for `username` as of `today`.
    ///
    /// Unknown and expired principals both yield an empty map. Store
    /// failures, including malformed records, are returned as errors.
    pub fn evaluate(&self, username: &str, today: NaiveDate) -> Result<AccessMap> {
        let Some(principal) = self.store.lookup(username)? else {
            debug!(username, "no principal, no access");
            return Ok(AccessMap::default());
        };

        let map = evaluate_principal(&self.catalog, &principal, today);
        debug!(username, granted = map.granted().count(), "evaluated access");
        Ok(map)
    }
}
