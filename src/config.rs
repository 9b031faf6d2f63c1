//! Config for dialing the LDAP server.
use ldap3::LdapConnSettings;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::{
	error::Error,
	options::{expect_bool, get_or_default, Options},
};

/// Options controlling how a connection is established.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialOptions {
	/// Disable verification of the server's TLS certificate chain and
	/// hostname.
	///
	/// **This is insecure.** Any server, including a man in the middle, will
	/// be accepted. It exists for test setups with self-signed certificates
	/// and must never be enabled against a production directory.
	pub insecure_skip_tls_verify: bool,
}

impl DialOptions {
	/// Reads dial options from a script's argument mapping. The only
	/// recognized field is `insecureSkipTlsVerify`, defaulting to `false`.
	pub fn from_options(args: &Options) -> Result<Self, Error> {
		let insecure_skip_tls_verify = expect_bool(
			get_or_default(args, "insecureSkipTlsVerify", &json!(false)),
			"insecureSkipTlsVerify",
		)?;
		Ok(Self { insecure_skip_tls_verify })
	}

	/// Whether the connection verifies the server certificate.
	#[must_use]
	pub const fn verifies_certificates(&self) -> bool {
		!self.insecure_skip_tls_verify
	}

	/// Create a [`LdapConnSettings`] based on these [`DialOptions`]
	pub(crate) fn to_settings(&self) -> LdapConnSettings {
		if self.insecure_skip_tls_verify {
			warn!("TLS certificate verification is disabled for this connection");
		}
		LdapConnSettings::new().set_no_tls_verify(self.insecure_skip_tls_verify)
	}
}
