//! The directory connection capability, and its `ldap3` implementation.
use std::collections::HashSet;

use async_trait::async_trait;
use ldap3::LdapConnAsync;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::{
	config::DialOptions,
	entry::{Entry, SearchResults},
	error::Error,
	modify::ModifyRequest,
	search::SearchRequest,
};

/// An open connection to a directory server.
///
/// Implementations are not expected to be shared between tasks; whoever
/// issues a request holds the connection exclusively for its duration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Directory: Send {
	/// Authenticate with a simple bind.
	async fn simple_bind(&mut self, dn: &str, password: &str) -> Result<(), Error>;

	/// Run a search.
	async fn search(&mut self, request: &SearchRequest) -> Result<SearchResults, Error>;

	/// Add an entry with the given attributes.
	async fn add(
		&mut self,
		dn: &str,
		attributes: Vec<(String, HashSet<String>)>,
	) -> Result<(), Error>;

	/// Delete an entry.
	async fn delete(&mut self, dn: &str) -> Result<(), Error>;

	/// Apply all changes of the request in one modify operation.
	async fn modify(&mut self, request: &ModifyRequest) -> Result<(), Error>;

	/// Unbind and shut the connection down.
	async fn unbind(&mut self) -> Result<(), Error>;
}

/// A [`Directory`] backed by an `ldap3` connection.
pub struct LdapDirectory {
	/// Handle for issuing operations.
	ldap: ldap3::Ldap,
	/// The task driving the connection in the background.
	driver: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for LdapDirectory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LdapDirectory")
			.field("driving", &self.driver.is_some())
			.finish_non_exhaustive()
	}
}

impl LdapDirectory {
	/// Connect to the server at `url`. Must be called from within a tokio
	/// runtime, since the connection is driven by a spawned task.
	pub async fn connect(url: &Url, options: &DialOptions) -> Result<Self, Error> {
		debug!(%url, verify_tls = options.verifies_certificates(), "Dialing LDAP server");
		let (conn, ldap) = LdapConnAsync::from_url_with_settings(options.to_settings(), url).await?;
		let driver = tokio::spawn(async move {
			if let Err(err) = conn.drive().await {
				warn!("Ldap connection error {err}");
			}
		});
		Ok(Self { ldap, driver: Some(driver) })
	}
}

#[async_trait]
impl Directory for LdapDirectory {
	async fn simple_bind(&mut self, dn: &str, password: &str) -> Result<(), Error> {
		debug!(dn, "Binding");
		self.ldap.simple_bind(dn, password).await?.success()?;
		Ok(())
	}

	async fn search(&mut self, request: &SearchRequest) -> Result<SearchResults, Error> {
		debug!(
			base = request.base_dn(),
			filter = request.filter(),
			scope = ?request.scope(),
			"Searching"
		);
		let (entries, result) = self
			.ldap
			.with_search_options(request.search_options())
			.search(
				request.base_dn(),
				request.scope().into(),
				request.filter(),
				request.attributes().to_vec(),
			)
			.await?
			.success()?;
		let entries = entries.into_iter().map(Entry::from).collect();
		Ok(SearchResults { entries, referrals: result.refs })
	}

	async fn add(
		&mut self,
		dn: &str,
		attributes: Vec<(String, HashSet<String>)>,
	) -> Result<(), Error> {
		debug!(dn, "Adding entry");
		self.ldap.add(dn, attributes).await?.success()?;
		Ok(())
	}

	async fn delete(&mut self, dn: &str) -> Result<(), Error> {
		debug!(dn, "Deleting entry");
		self.ldap.delete(dn).await?.success()?;
		Ok(())
	}

	async fn modify(&mut self, request: &ModifyRequest) -> Result<(), Error> {
		debug!(dn = request.dn(), changes = request.changes().len(), "Modifying entry");
		self.ldap.modify(request.dn(), request.to_mods()).await?.success()?;
		Ok(())
	}

	async fn unbind(&mut self) -> Result<(), Error> {
		self.ldap.unbind().await?;
		if let Some(driver) = self.driver.take() {
			if let Err(err) = driver.await {
				warn!("Failed to join background task: {err}");
			}
		}
		Ok(())
	}
}
