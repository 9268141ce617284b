//! Principal storage for Warden.
//!
//! A principal is a username with a credential secret, an expiry date and a
//! set of granted resource identifiers. This crate defines that record, the
//! read-only [`PrincipalStore`] lookup contract, and two backings that
//! implement it:
//!
//! - [`JsonStore`] — a JSON object keyed by username.
//! - [`SqliteStore`] — a `principals` table with the same columns.
//!
//! Both share one stored schema ([`PrincipalRecord`]): `password`,
//! `expiry_date` as `YYYY-MM-DD`, and `permissions` as a list or a
//! comma-separated string.
//!
//! # Example
//!
//! ```no_run
//! use storage::{JsonStore, PrincipalStore};
//!
//! let store = JsonStore::open("user_data.json")?;
//! match store.lookup("alice")? {
//!     Some(principal) => println!("{} expires {}", principal.username, principal.expiry_date),
//!     None => println!("no such user"),
//! }
//! # Ok::<(), storage::Error>(())
//! ```

mod error;
mod json;
mod principal;
mod sqlite;
mod store;

pub use error::{Error, Result};
pub use json::JsonStore;
pub use principal::{DATE_FORMAT, GRANT_SEPARATOR, Permissions, Principal, PrincipalRecord};
pub use sqlite::SqliteStore;
pub use store::PrincipalStore;
