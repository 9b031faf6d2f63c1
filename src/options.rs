//! Reading typed fields out of loosely-typed argument mappings.
//!
//! Scripts hand over plain mappings whose values may be of any type. Fields
//! are resolved one at a time against a default and then asserted to be of
//! the expected type, so that the first bad field is the one reported.
use serde_json::{Map, Value};

use crate::error::Error;

/// An untyped argument mapping, as supplied by a script.
pub type Options = Map<String, Value>;

/// Returns the value stored under `key`, or `default` if the key is absent.
///
/// No type checking happens here; that is left to the caller.
#[must_use]
pub fn get_or_default<'a>(options: &'a Options, key: &str, default: &'a Value) -> &'a Value {
	options.get(key).unwrap_or(default)
}

/// Asserts that a resolved value is text.
pub(crate) fn expect_text(value: &Value, field: &str) -> Result<String, Error> {
	value.as_str().map(str::to_owned).ok_or_else(|| Error::invalid_argument(field))
}

/// Asserts that a resolved value is a 64-bit integer. Floating point numbers
/// and numeric strings are rejected rather than converted.
pub(crate) fn expect_integer(value: &Value, field: &str) -> Result<i64, Error> {
	value.as_i64().ok_or_else(|| Error::invalid_argument(field))
}

/// Asserts that a resolved value is an integer in the protocol's
/// `0..=maxInt` range.
pub(crate) fn expect_limit(value: &Value, field: &str) -> Result<i32, Error> {
	let limit = expect_integer(value, field)?;
	i32::try_from(limit)
		.ok()
		.filter(|limit| *limit >= 0)
		.ok_or_else(|| Error::invalid_argument(field))
}

/// Asserts that a resolved value is a boolean.
pub(crate) fn expect_bool(value: &Value, field: &str) -> Result<bool, Error> {
	value.as_bool().ok_or_else(|| Error::invalid_argument(field))
}

/// Asserts that a resolved value is a sequence, stringifying every element.
pub(crate) fn expect_text_list(value: &Value, field: &str) -> Result<Vec<String>, Error> {
	let items = value.as_array().ok_or_else(|| Error::invalid_argument(field))?;
	Ok(items.iter().map(stringify).collect())
}

/// Canonical text form of an arbitrary value: strings as they are, anything
/// else in its JSON notation.
#[must_use]
pub fn stringify(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}
