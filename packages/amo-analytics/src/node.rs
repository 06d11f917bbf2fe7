//! Read-only view over loosely typed JSON metadata.
//!
//! METS-to-JSON exports encode a repeated element as a list when it occurs several times and as
//! a bare object when it occurs once. [`Node::as_list`] is the only place that resolves that
//! ambiguity; extraction code never inspects `Value` variants directly.

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
	Object(&'a Map<String, Value>),
	List(&'a [Value]),
	Text(&'a str),
	Number(&'a Number),
	Flag(bool),
	Missing,
}
impl<'a> Node<'a> {
	pub fn new(value: Option<&'a Value>) -> Self {
		match value {
			Some(Value::Object(map)) => Self::Object(map),
			Some(Value::Array(items)) => Self::List(items),
			Some(Value::String(text)) => Self::Text(text),
			Some(Value::Number(number)) => Self::Number(number),
			Some(Value::Bool(flag)) => Self::Flag(*flag),
			Some(Value::Null) | None => Self::Missing,
		}
	}

	pub fn of(value: &'a Value) -> Self {
		Self::new(Some(value))
	}

	pub fn root(map: &'a Map<String, Value>) -> Self {
		Self::Object(map)
	}

	/// Child under `key`; anything but an object yields `Missing`.
	pub fn get(self, key: &str) -> Self {
		match self {
			Self::Object(map) => Self::new(map.get(key)),
			_ => Self::Missing,
		}
	}

	pub fn path(self, keys: &[&str]) -> Self {
		keys.iter().fold(self, |node, key| node.get(key))
	}

	/// A list yields its elements, an absent value yields nothing, and any other value is a
	/// one-element list.
	pub fn as_list(self) -> Vec<Node<'a>> {
		match self {
			Self::List(items) => items.iter().map(Node::of).collect(),
			Self::Missing => Vec::new(),
			single => vec![single],
		}
	}

	/// Trimmed, non-empty text.
	pub fn text(self) -> Option<&'a str> {
		match self {
			Self::Text(text) => Some(text.trim()).filter(|text| !text.is_empty()),
			_ => None,
		}
	}

	pub fn owned_text(self) -> Option<String> {
		self.text().map(str::to_string)
	}

	/// Numbers and numeric strings.
	pub fn number(self) -> Option<f64> {
		match self {
			Self::Number(number) => number.as_f64(),
			Self::Text(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	/// Entries in a collection-ish value: list length, object size, or 1 for non-blank text.
	pub fn item_count(self) -> usize {
		match self {
			Self::List(items) => items.len(),
			Self::Object(map) => map.len(),
			Self::Text(_) => usize::from(self.text().is_some()),
			_ => 0,
		}
	}

	pub fn is_missing(self) -> bool {
		matches!(self, Self::Missing)
	}
}
