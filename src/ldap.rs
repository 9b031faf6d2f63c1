//! Entry points a script host exposes: dialing, and the operations on an
//! open connection.
use std::{borrow::Cow, collections::HashMap, fmt};

use tracing::debug;
use url::Url;

use crate::{
	config::DialOptions,
	directory::{Directory, LdapDirectory},
	entry::SearchResults,
	error::Error,
	modify::ModifyRequest,
	options::Options,
	search::SearchRequest,
};

/// The module object handed to scripts. It holds no state; hosts construct
/// one explicitly and register it however they see fit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ldap;

impl Ldap {
	/// Create a new [`Ldap`].
	#[must_use]
	pub const fn new() -> Self {
		Self
	}

	/// Open a connection to `address`, an `ldap://`, `ldaps://` or `ldapi://`
	/// URL.
	///
	/// `options` may contain `insecureSkipTlsVerify`. Setting it to `true`
	/// disables certificate verification entirely, which makes the connection
	/// open to interception. Only use it against test servers.
	pub async fn dial_url(&self, address: &str, options: &Options) -> Result<Conn, Error> {
		let options = DialOptions::from_options(options)?;
		self.dial(address, &options).await
	}

	/// Like [`Ldap::dial_url`], with already typed options.
	pub async fn dial(&self, address: &str, options: &DialOptions) -> Result<Conn, Error> {
		let url = Url::parse(address)?;
		let directory = LdapDirectory::connect(&url, options).await?;
		Ok(Conn::new(Box::new(directory)))
	}

	/// Escape `filter` for embedding into a search filter, as described in
	/// RFC 4515.
	#[must_use]
	pub fn escape_filter<'a>(&self, filter: &'a str) -> Cow<'a, str> {
		ldap3::ldap_escape(filter)
	}
}

/// An open connection. Requests are built from script arguments and handed
/// to the underlying [`Directory`].
///
/// A connection belongs to whoever dialed it and is not meant to be shared
/// between tasks; open one per task instead.
pub struct Conn {
	/// Where requests are sent.
	directory: Box<dyn Directory>,
}

impl fmt::Debug for Conn {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Conn").finish_non_exhaustive()
	}
}

impl Conn {
	/// Wrap an already open directory connection.
	#[must_use]
	pub fn new(directory: Box<dyn Directory>) -> Self {
		Self { directory }
	}

	/// Authenticate with a simple bind.
	pub async fn bind(&mut self, username: &str, password: &str) -> Result<(), Error> {
		self.directory.simple_bind(username, password).await
	}

	/// Search with the arguments in `args`. See
	/// [`SearchRequest::from_options`] for the recognized fields; nothing is
	/// sent if any of them is invalid.
	pub async fn search(&mut self, args: &Options) -> Result<SearchResults, Error> {
		let request = SearchRequest::from_options(args)?;
		let results = self.directory.search(&request).await?;
		debug!(entries = results.entries.len(), "Search finished");
		Ok(results)
	}

	/// Add an entry.
	pub async fn add(
		&mut self,
		dn: &str,
		attributes: HashMap<String, Vec<String>>,
	) -> Result<(), Error> {
		let attributes = attributes
			.into_iter()
			.map(|(name, values)| (name, values.into_iter().collect()))
			.collect();
		self.directory.add(dn, attributes).await
	}

	/// Delete an entry.
	pub async fn del(&mut self, dn: &str) -> Result<(), Error> {
		self.directory.delete(dn).await
	}

	/// Modify the entry `dn` with the per-attribute operations in `args`. See
	/// [`ModifyRequest::from_options`]; nothing is sent if any attribute is
	/// invalid.
	pub async fn modify(&mut self, dn: &str, args: &Options) -> Result<(), Error> {
		let request = ModifyRequest::from_options(dn, args)?;
		self.directory.modify(&request).await
	}

	/// Close the connection.
	pub async fn close(mut self) -> Result<(), Error> {
		self.directory.unbind().await
	}
}
