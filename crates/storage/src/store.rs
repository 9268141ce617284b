//! The principal lookup contract.

use crate::{Principal, Result};

/// Resolves usernames to principal records.
///
/// Lookups are read-only and may be repeated freely. An unknown username is
/// `Ok(None)`, not an error; `Err` is reserved for I/O failures and records
/// that cannot be decoded.
pub trait PrincipalStore {
    fn lookup(&self, username: &str) -> Result<Option<Principal>>;
}

impl<S: PrincipalStore + ?Sized> PrincipalStore for &S {
    fn lookup(&self, username: &str) -> Result<Option<Principal>> {
        (**self).lookup(username)
    }
}

impl<S: PrincipalStore + ?Sized> PrincipalStore for Box<S> {
    fn lookup(&self, username: &str) -> Result<Option<Principal>> {
        (**self).lookup(username)
    }
}
