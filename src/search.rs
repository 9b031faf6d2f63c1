//! Building search requests from script arguments.
use ldap3::{DerefAliases, Scope, SearchOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::{
	error::Error,
	options::{
		expect_bool, expect_integer, expect_limit, expect_text, expect_text_list, get_or_default,
		Options,
	},
};

/// How far a search descends from its base DN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchScope {
	/// Only the base entry itself.
	BaseObject,
	/// The entries immediately below the base entry.
	SingleLevel,
	/// The base entry and everything below it.
	#[default]
	WholeSubtree,
}

impl SearchScope {
	/// Maps a symbolic scope name to a scope. Names other than `BaseObject`
	/// and `SingleLevel` select [`SearchScope::WholeSubtree`].
	#[must_use]
	pub fn from_name(name: &str) -> Self {
		match name {
			"BaseObject" => Self::BaseObject,
			"SingleLevel" => Self::SingleLevel,
			_ => Self::WholeSubtree,
		}
	}

	/// Maps a resolved argument value to a scope. Never fails; anything that
	/// is not a recognized name falls back to a subtree search.
	fn from_value(value: &Value) -> Self {
		let scope = value.as_str().map_or(Self::WholeSubtree, Self::from_name);
		if scope == Self::WholeSubtree && value.as_str() != Some("WholeSubtree") {
			warn!(scope = %value, "Unrecognized search scope, searching whole subtree");
		}
		scope
	}
}

impl From<SearchScope> for Scope {
	fn from(scope: SearchScope) -> Self {
		match scope {
			SearchScope::BaseObject => Scope::Base,
			SearchScope::SingleLevel => Scope::OneLevel,
			SearchScope::WholeSubtree => Scope::Subtree,
		}
	}
}

/// Whether alias entries are followed during a search. The numeric values
/// are the ones of the `derefAliases` protocol field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dereference {
	/// Never dereference aliases.
	#[default]
	Never = 0,
	/// Dereference aliases below the base object only.
	InSearching = 1,
	/// Dereference the base object only.
	FindingBaseObject = 2,
	/// Always dereference aliases.
	Always = 3,
}

impl Dereference {
	/// The protocol value of this policy.
	#[must_use]
	pub const fn code(self) -> i64 {
		self as i64
	}
}

impl TryFrom<i64> for Dereference {
	type Error = i64;

	fn try_from(code: i64) -> Result<Self, Self::Error> {
		match code {
			0 => Ok(Self::Never),
			1 => Ok(Self::InSearching),
			2 => Ok(Self::FindingBaseObject),
			3 => Ok(Self::Always),
			other => Err(other),
		}
	}
}

impl From<Dereference> for DerefAliases {
	fn from(deref: Dereference) -> Self {
		match deref {
			Dereference::Never => DerefAliases::Never,
			Dereference::InSearching => DerefAliases::Searching,
			Dereference::FindingBaseObject => DerefAliases::Finding,
			Dereference::Always => DerefAliases::Always,
		}
	}
}

/// A fully validated search request. Every field is populated, falling back
/// to its default when the script did not supply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	/// The search base.
	base_dn: String,
	/// How far below the base to search.
	scope: SearchScope,
	/// The search filter.
	filter: String,
	/// Alias dereferencing policy.
	deref_aliases: Dereference,
	/// Maximum number of entries to return, 0 for unlimited.
	size_limit: i32,
	/// Maximum search duration in seconds, 0 for unlimited.
	time_limit: i32,
	/// Return attribute names only, without values.
	types_only: bool,
	/// Attributes to return, empty for all of them.
	attributes: Vec<String>,
}

impl Default for SearchRequest {
	fn default() -> Self {
		Self {
			base_dn: String::new(),
			scope: SearchScope::WholeSubtree,
			filter: "*".to_owned(),
			deref_aliases: Dereference::Never,
			size_limit: 0,
			time_limit: 0,
			types_only: false,
			attributes: Vec::new(),
		}
	}
}

impl SearchRequest {
	/// Builds a request from a script's argument mapping.
	///
	/// Recognized fields are `baseDn`, `scope`, `filter`, `derefAliases`,
	/// `sizeLimit`, `timeLimit`, `typesOnly` and `attributes`; unknown fields
	/// are ignored. Validation stops at the first field of the wrong type,
	/// which is named in the returned [`Error::InvalidArgumentType`].
	pub fn from_options(args: &Options) -> Result<Self, Error> {
		let scope = SearchScope::from_value(get_or_default(args, "scope", &json!("WholeSubtree")));
		let filter = expect_text(get_or_default(args, "filter", &json!("*")), "filter")?;
		let base_dn = expect_text(get_or_default(args, "baseDn", &json!("")), "baseDn")?;
		let deref_code =
			expect_integer(get_or_default(args, "derefAliases", &json!(0)), "derefAliases")?;
		let deref_aliases =
			Dereference::try_from(deref_code).map_err(|_| Error::invalid_argument("derefAliases"))?;
		let size_limit = expect_limit(get_or_default(args, "sizeLimit", &json!(0)), "sizeLimit")?;
		let time_limit = expect_limit(get_or_default(args, "timeLimit", &json!(0)), "timeLimit")?;
		let types_only = expect_bool(get_or_default(args, "typesOnly", &json!(false)), "typesOnly")?;
		let attributes =
			expect_text_list(get_or_default(args, "attributes", &json!([])), "attributes")?;

		Ok(Self {
			base_dn,
			scope,
			filter,
			deref_aliases,
			size_limit,
			time_limit,
			types_only,
			attributes,
		})
	}

	/// The search base.
	#[must_use]
	pub fn base_dn(&self) -> &str {
		&self.base_dn
	}

	/// The search scope.
	#[must_use]
	pub const fn scope(&self) -> SearchScope {
		self.scope
	}

	/// The search filter.
	#[must_use]
	pub fn filter(&self) -> &str {
		&self.filter
	}

	/// The alias dereferencing policy.
	#[must_use]
	pub const fn deref_aliases(&self) -> Dereference {
		self.deref_aliases
	}

	/// The size limit, 0 meaning unlimited.
	#[must_use]
	pub const fn size_limit(&self) -> i32 {
		self.size_limit
	}

	/// The time limit in seconds, 0 meaning unlimited.
	#[must_use]
	pub const fn time_limit(&self) -> i32 {
		self.time_limit
	}

	/// Whether only attribute names are requested.
	#[must_use]
	pub const fn types_only(&self) -> bool {
		self.types_only
	}

	/// Attributes to return. Empty means all user attributes.
	#[must_use]
	pub fn attributes(&self) -> &[String] {
		&self.attributes
	}

	/// The per-search options `ldap3` sends alongside the request. The limits
	/// are hints for the server and not enforced locally.
	pub(crate) fn search_options(&self) -> SearchOptions {
		SearchOptions::new()
			.deref(self.deref_aliases.into())
			.sizelimit(self.size_limit)
			.timelimit(self.time_limit)
			.typesonly(self.types_only)
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]

	use serde_json::{json, Value};

	use super::{Dereference, SearchRequest, SearchScope};
	use crate::{error::Error, options::Options};

	fn options(value: Value) -> Options {
		match value {
			Value::Object(map) => map,
			_ => panic!("test options must be an object"),
		}
	}

	fn failing_field(value: Value) -> String {
		match SearchRequest::from_options(&options(value)) {
			Err(Error::InvalidArgumentType { field }) => field,
			other => panic!("expected an invalid argument error, got {other:?}"),
		}
	}

	#[test]
	fn empty_mapping_yields_defaults() {
		let request = SearchRequest::from_options(&Options::new()).unwrap();
		assert_eq!(request, SearchRequest::default());
		assert_eq!(request.base_dn(), "");
		assert_eq!(request.scope(), SearchScope::WholeSubtree);
		assert_eq!(request.filter(), "*");
		assert_eq!(request.deref_aliases(), Dereference::Never);
		assert_eq!(request.size_limit(), 0);
		assert_eq!(request.time_limit(), 0);
		assert!(!request.types_only());
		assert!(request.attributes().is_empty());
	}

	#[test]
	fn scope_names() {
		assert_eq!(SearchScope::from_name("BaseObject"), SearchScope::BaseObject);
		assert_eq!(SearchScope::from_name("SingleLevel"), SearchScope::SingleLevel);
		assert_eq!(SearchScope::from_name("WholeSubtree"), SearchScope::WholeSubtree);
		assert_eq!(SearchScope::from_name("anything-else"), SearchScope::WholeSubtree);
		assert_eq!(SearchScope::from_name("baseobject"), SearchScope::WholeSubtree);
	}

	#[test]
	fn scope_never_fails_validation() {
		let request = SearchRequest::from_options(&options(json!({ "scope": 7 }))).unwrap();
		assert_eq!(request.scope(), SearchScope::WholeSubtree);
		let request =
			SearchRequest::from_options(&options(json!({ "scope": "SingleLevel" }))).unwrap();
		assert_eq!(request.scope(), SearchScope::SingleLevel);
	}

	#[test]
	fn fully_specified_mapping_round_trips() {
		let request = SearchRequest::from_options(&options(json!({
			"baseDn": "dc=example,dc=org",
			"scope": "BaseObject",
			"filter": "(cn=*)",
			"derefAliases": 3,
			"sizeLimit": 10,
			"timeLimit": 30,
			"typesOnly": true,
			"attributes": ["cn", "sn", "objectClass"],
		})))
		.unwrap();

		assert_eq!(request.base_dn(), "dc=example,dc=org");
		assert_eq!(request.scope(), SearchScope::BaseObject);
		assert_eq!(request.filter(), "(cn=*)");
		assert_eq!(request.deref_aliases().code(), 3);
		assert_eq!(request.size_limit(), 10);
		assert_eq!(request.time_limit(), 30);
		assert!(request.types_only());
		assert_eq!(request.attributes(), ["cn", "sn", "objectClass"]);
	}

	#[test]
	fn wrongly_typed_fields_are_named() {
		assert_eq!(failing_field(json!({ "sizeLimit": "10" })), "sizeLimit");
		assert_eq!(failing_field(json!({ "timeLimit": 1.5 })), "timeLimit");
		assert_eq!(failing_field(json!({ "derefAliases": true })), "derefAliases");
		assert_eq!(failing_field(json!({ "derefAliases": 4 })), "derefAliases");
		assert_eq!(failing_field(json!({ "typesOnly": 1 })), "typesOnly");
		assert_eq!(failing_field(json!({ "filter": ["(cn=*)"] })), "filter");
		assert_eq!(failing_field(json!({ "baseDn": null })), "baseDn");
		assert_eq!(failing_field(json!({ "attributes": "cn" })), "attributes");
	}

	#[test]
	fn first_bad_field_wins() {
		// filter is checked before sizeLimit and attributes.
		let field = failing_field(json!({
			"sizeLimit": "x",
			"filter": 1,
			"attributes": {},
		}));
		assert_eq!(field, "filter");
		assert_eq!(failing_field(json!({ "typesOnly": "no", "timeLimit": -5 })), "timeLimit");
	}

	#[test]
	fn mixed_attribute_lists_are_stringified() {
		let request =
			SearchRequest::from_options(&options(json!({ "attributes": ["cn", 1, false] })))
				.unwrap();
		assert_eq!(request.attributes(), ["cn", "1", "false"]);
	}
}
