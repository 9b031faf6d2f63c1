//! Drive an LDAP directory server from short test scripts.
//!
//! Scripts don't construct typed requests. They pass loosely-typed argument
//! mappings (as they would arrive from a scripting engine), and this library
//! resolves every field against its default, checks its type, and only then
//! builds and sends a request. The first field of the wrong type fails the
//! whole call, and no partial request ever reaches the server.
//!
//! For a general primer on LDAP, the [introduction] in the `ldap3` crate which
//! is used here for interfacing with LDAP is an excellent resource.
//!
//! [introduction]: https://github.com/inejge/ldap3/blob/master/LDAP-primer.md
//!
//! # Getting started
//! A minimal script might look like so:
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use ldap_script::{Ldap, Options};
//! use serde_json::json;
//!
//! fn args(value: serde_json::Value) -> Options {
//!     value.as_object().cloned().unwrap_or_default()
//! }
//!
//! let ldap = Ldap::new();
//! let mut conn = ldap.dial_url("ldap://localhost:1389", &Options::new()).await?;
//! conn.bind("cn=admin,dc=example,dc=org", "adminpassword").await?;
//!
//! let result = conn
//!     .search(&args(json!({
//!         "baseDn": "dc=example,dc=org",
//!         "filter": "(cn=*)",
//!         "attributes": ["cn", "sn"], // [] for all attributes
//!         "scope": "WholeSubtree", // BaseObject, SingleLevel, WholeSubtree
//!     })))
//!     .await?;
//! println!("Search found {} results", result.entries.len());
//!
//! conn.modify(
//!     "cn=user01,ou=users,dc=example,dc=org",
//!     &args(json!({ "displayName": { "operation": "replace", "value": "User One" } })),
//! )
//! .await?;
//!
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Limitations
//! * Requests never carry controls (i.e. extensions).
//! * Unrecognized search scopes silently select a subtree search instead of
//!   failing, for compatibility with existing scripts.
//! * `sizeLimit` and `timeLimit` are forwarded to the server and not enforced
//!   locally. There are no client-side timeouts or retries.
//! * A [`Conn`] must not be shared between concurrently running tasks.

pub mod config;
pub mod directory;
pub mod entry;
pub mod error;
pub mod ldap;
pub mod modify;
pub mod options;
pub mod search;

pub use ldap3::{self, SearchEntry};

pub use crate::{
	config::DialOptions,
	directory::{Directory, LdapDirectory},
	entry::{Entry, SearchResults},
	error::Error,
	ldap::{Conn, Ldap},
	modify::{ModifyKind, ModifyOperation, ModifyRequest},
	options::{get_or_default, Options},
	search::{Dereference, SearchRequest, SearchScope},
};
