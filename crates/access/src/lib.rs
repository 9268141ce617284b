//! Time-bounded, per-resource access evaluation.
//!
//! Given a principal's expiry date and granted resources, decide for every
//! resource in a fixed [`Catalog`] whether access is currently valid and how
//! many days remain.
//!
//! - [`Evaluator`] resolves a username through a [`storage::PrincipalStore`]
//!   and returns an ordered [`AccessMap`]. Unknown and expired principals
//!   both yield an empty map.
//! - [`Authenticator`] checks a login through a pluggable
//!   [`CredentialVerifier`] and reports expiry separately from bad
//!   credentials.
//! - [`Session`] is the caller-owned context (username, date, page).
//!
//! # Example
//!
//! ```no_run
//! use access::{Catalog, Evaluator};
//! use chrono::Local;
//! use storage::JsonStore;
//!
//! let evaluator = Evaluator::new(JsonStore::open("user_data.json")?, Catalog::default());
//! let access = evaluator.evaluate("alice", Local::now().date_naive())?;
//! for (resource, decision) in access.iter() {
//!     println!("{resource}: {decision:?}");
//! }
//! # Ok::<(), access::Error>(())
//! ```

mod auth;
mod catalog;
mod decision;
mod error;
mod evaluator;
mod session;

pub use auth::{AuthFailure, Authenticator, CredentialVerifier, PlaintextVerifier};
pub use catalog::{Catalog, DEFAULT_DASHBOARDS, Resource};
pub use decision::{AccessDecision, AccessMap};
pub use error::{Error, Result};
pub use evaluator::{Evaluator, evaluate_principal};
pub use session::{Page, Session};
