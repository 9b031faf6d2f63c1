//! Error codes

/// Errors that can occur when using this library
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// A field of an argument mapping was present, but did not hold a value of
	/// the expected type (or was outside the range the protocol allows).
	#[error("Invalid search argument type: {field}")]
	InvalidArgumentType {
		/// Name of the offending field.
		field: String,
	},
	/// A modify entry named an operation other than `add`, `replace`,
	/// `increment` or `delete`.
	#[error("Unsupported LDAP Modify operation for attribute {attribute}")]
	UnsupportedOperation {
		/// The attribute whose operation was not recognized.
		attribute: String,
	},
	/// An underlying protocol error or similar occurred, or the LDAP library
	/// was used incorrectly.
	#[error(transparent)]
	Ldap(#[from] ldap3::LdapError),
	/// The address given to dial was not a valid URL.
	#[error(transparent)]
	Url(#[from] url::ParseError),
}

impl Error {
	/// Shorthand for [`Error::InvalidArgumentType`].
	pub(crate) fn invalid_argument(field: impl Into<String>) -> Self {
		Self::InvalidArgumentType { field: field.into() }
	}

	/// Whether the error was raised while talking to the server (or trying to
	/// reach it) rather than while validating arguments.
	#[must_use]
	pub const fn is_transport(&self) -> bool {
		matches!(self, Self::Ldap(_) | Self::Url(_))
	}
}
