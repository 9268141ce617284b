//! Login credential checks.
//!
//! Stored secrets are compared in plaintext by default. [`CredentialVerifier`]
//! is the seam for a hashed or constant-time comparison; swapping it does not
//! change the store or the evaluator.

use crate::Session;
use chrono::NaiveDate;
use storage::{DATE_FORMAT, Principal, PrincipalStore};
use thiserror::Error;
use tracing::{debug, warn};

/// Compares a stored credential with a supplied one.
pub trait CredentialVerifier {
    fn verify(&self, stored: &str, supplied: &str) -> bool;
}

/// Exact string equality against a plaintext stored secret.
///
/// Not hardened: neither hashed nor constant-time.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, stored: &str, supplied: &str) -> bool {
        stored == supplied
    }
}

impl<F> CredentialVerifier for F
where
    F: Fn(&str, &str) -> bool,
{
    fn verify(&self, stored: &str, supplied: &str) -> bool {
        self(stored, supplied)
    }
}

/// Why a login was refused.
///
/// Unknown usernames and wrong secrets are indistinguishable; expiry is
/// reported separately.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthFailure {
    #[error("invalid username or password")]
    InvalidCredential,

    #[error("access expired on {}, please contact admin", .expired_on.format(DATE_FORMAT))]
    Expired { expired_on: NaiveDate },

    #[error(transparent)]
    Store(#[from] storage::Error),
}

/// Authenticates principals from a store.
pub struct Authenticator<S, V = PlaintextVerifier> {
    store: S,
    verifier: V,
}

impl<S: PrincipalStore> Authenticator<S> {
    /// An authenticator using plaintext comparison.
    pub fn new(store: S) -> Self {
        Self::with_verifier(store, PlaintextVerifier)
    }
}

impl<S: PrincipalStore, V: CredentialVerifier> Authenticator<S, V> {
    pub fn with_verifier(store: S, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// Check `secret` for `username`, then check expiry as of `today`.
    pub fn authenticate(
        &self,
        username: &str,
        secret: &str,
        today: NaiveDate,
    ) -> Result<Principal, AuthFailure> {
        let principal = match self.store.lookup(username)? {
            Some(p) if self.verifier.verify(&p.credential_secret, secret) => p,
            _ => {
                warn!(username, "login rejected: bad credentials");
                return Err(AuthFailure::InvalidCredential);
            }
        };

        if principal.is_expired(today) {
            warn!(username, expiry = %principal.expiry_date, "login rejected: expired");
            return Err(AuthFailure::Expired {
                expired_on: principal.expiry_date,
            });
        }

        debug!(username, "login accepted");
        Ok(principal)
    }

    /// Authenticate and open a session on the main page.
    pub fn login(
        &self,
        username: &str,
        secret: &str,
        today: NaiveDate,
    ) -> Result<Session, AuthFailure> {
        let principal = self.authenticate(username, secret, today)?;
        Ok(Session::new(principal.username, today))
    }
}
