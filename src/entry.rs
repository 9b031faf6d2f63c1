//! Search results and helpers for extracting data from them.
use std::collections::HashMap;

use ldap3::{ResultEntry, SearchEntry};
use serde::{Deserialize, Serialize};

/// A single entry returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
	/// Distinguished name of the entry.
	pub dn: String,
	/// Attributes whose values are valid UTF-8.
	pub attributes: HashMap<String, Vec<String>>,
	/// Attributes with at least one value that is not valid UTF-8.
	pub binary_attributes: HashMap<String, Vec<Vec<u8>>>,
}

impl Entry {
	/// Get the first value of an attribute. Will return `None` if attribute
	/// value is not valid UTF-8.
	#[must_use]
	pub fn attr_first(&self, attr: &str) -> Option<&str> {
		let attr = self.attributes.get(attr)?;
		attr.first().map(String::as_str)
	}

	/// Get all values of an attribute.
	#[must_use]
	pub fn attr_values(&self, attr: &str) -> &[String] {
		self.attributes.get(attr).map_or(&[], Vec::as_slice)
	}

	/// Get the first value of an attribute, in binary form
	#[must_use]
	pub fn bin_attr_first(&self, attr: &str) -> Option<&[u8]> {
		if let Some(attr) = self.attributes.get(attr) {
			return attr.first().map(String::as_bytes);
		}

		if let Some(attr) = self.binary_attributes.get(attr) {
			return attr.first().map(Vec::as_slice);
		}
		None
	}
}

impl From<SearchEntry> for Entry {
	fn from(entry: SearchEntry) -> Self {
		Self { dn: entry.dn, attributes: entry.attrs, binary_attributes: entry.bin_attrs }
	}
}

impl From<ResultEntry> for Entry {
	fn from(entry: ResultEntry) -> Self {
		SearchEntry::construct(entry).into()
	}
}

/// Everything a search returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
	/// Matching entries, in the order the server sent them.
	pub entries: Vec<Entry>,
	/// Referral URLs returned by the server.
	pub referrals: Vec<String>,
}
