//! Building modify requests from script arguments.
use std::{
	collections::{BTreeMap, HashSet},
	str::FromStr,
};

use ldap3::Mod;
use serde_json::{json, Value};

use crate::{
	error::Error,
	options::{expect_text, get_or_default, Options},
};

/// The operation kinds a modify entry may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyKind {
	/// Add a value to the attribute.
	Add,
	/// Replace all values of the attribute.
	Replace,
	/// Atomically increment the attribute.
	Increment,
	/// Remove the attribute entirely.
	Delete,
}

impl FromStr for ModifyKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"add" => Ok(Self::Add),
			"replace" => Ok(Self::Replace),
			"increment" => Ok(Self::Increment),
			"delete" => Ok(Self::Delete),
			_ => Err(()),
		}
	}
}

/// A single change to one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifyOperation {
	/// Add the value to the attribute's values.
	Add(String),
	/// Overwrite all of the attribute's values with this one.
	Replace(String),
	/// Increment the attribute by the given amount.
	Increment(String),
	/// Remove all values of the attribute.
	Delete,
}

impl ModifyOperation {
	/// Pairs an operation kind with its value. The value is ignored for
	/// deletions.
	#[must_use]
	pub fn new(kind: ModifyKind, value: String) -> Self {
		match kind {
			ModifyKind::Add => Self::Add(value),
			ModifyKind::Replace => Self::Replace(value),
			ModifyKind::Increment => Self::Increment(value),
			ModifyKind::Delete => Self::Delete,
		}
	}

	/// The kind of this operation.
	#[must_use]
	pub const fn kind(&self) -> ModifyKind {
		match self {
			Self::Add(_) => ModifyKind::Add,
			Self::Replace(_) => ModifyKind::Replace,
			Self::Increment(_) => ModifyKind::Increment,
			Self::Delete => ModifyKind::Delete,
		}
	}

	/// Converts the operation into the `ldap3` modification for `attribute`.
	fn to_mod(&self, attribute: &str) -> Mod<String> {
		let attribute = attribute.to_owned();
		match self {
			Self::Add(value) => Mod::Add(attribute, HashSet::from([value.clone()])),
			Self::Replace(value) => Mod::Replace(attribute, HashSet::from([value.clone()])),
			Self::Increment(value) => Mod::Increment(attribute, value.clone()),
			Self::Delete => Mod::Delete(attribute, HashSet::new()),
		}
	}
}

/// A validated set of attribute changes to one entry, sent as a single
/// modify operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRequest {
	/// The entry to modify.
	dn: String,
	/// Exactly one operation per attribute.
	changes: BTreeMap<String, ModifyOperation>,
}

impl ModifyRequest {
	/// Builds a request from a mapping of attribute names to
	/// `{ "operation": ..., "value": ... }` records.
	///
	/// Attributes are visited in name order. The first attribute with an
	/// unknown operation fails the whole request with
	/// [`Error::UnsupportedOperation`]; nothing is kept from the attributes
	/// before it.
	pub fn from_options(dn: &str, args: &Options) -> Result<Self, Error> {
		let mut changes = BTreeMap::new();
		for (attribute, record) in args {
			let record = record.as_object().ok_or_else(|| Error::invalid_argument(attribute))?;
			let kind = record
				.get("operation")
				.and_then(Value::as_str)
				.and_then(|operation| operation.parse::<ModifyKind>().ok())
				.ok_or_else(|| Error::UnsupportedOperation { attribute: attribute.clone() })?;
			let value = match kind {
				ModifyKind::Delete => String::new(),
				_ => expect_text(
					get_or_default(record, "value", &json!("")),
					&format!("{attribute}.value"),
				)?,
			};
			changes.insert(attribute.clone(), ModifyOperation::new(kind, value));
		}
		Ok(Self { dn: dn.to_owned(), changes })
	}

	/// The entry to modify.
	#[must_use]
	pub fn dn(&self) -> &str {
		&self.dn
	}

	/// The operation for each attribute.
	#[must_use]
	pub const fn changes(&self) -> &BTreeMap<String, ModifyOperation> {
		&self.changes
	}

	/// The changes in the form `ldap3` sends them.
	pub(crate) fn to_mods(&self) -> Vec<Mod<String>> {
		self.changes.iter().map(|(attribute, operation)| operation.to_mod(attribute)).collect()
	}
}
