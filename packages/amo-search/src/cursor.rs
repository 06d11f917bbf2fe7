//! Opaque `search_after` continuation handles.
//!
//! A cursor is the URL-safe, unpadded base64 form of the JSON array of sort values taken from
//! the last hit of a page. Callers treat it as an opaque string; an empty string means "from the
//! start".

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;

use crate::{Error, Result};

pub fn encode(sort_values: &[Value]) -> String {
	let json = Value::Array(sort_values.to_vec()).to_string();

	URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Returns `Ok(None)` for an empty cursor or an empty sort tuple.
pub fn decode(raw: &str) -> Result<Option<Vec<Value>>> {
	let raw = raw.trim();

	if raw.is_empty() {
		return Ok(None);
	}

	let blob = URL_SAFE_NO_PAD
		.decode(raw)
		.map_err(|err| Error::MalformedCursor { message: format!("invalid encoding: {err}") })?;
	let value: Value = serde_json::from_slice(&blob)
		.map_err(|err| Error::MalformedCursor { message: format!("invalid payload: {err}") })?;
	let Value::Array(sort_values) = value else {
		return Err(Error::MalformedCursor {
			message: "payload must be an array of sort values".to_string(),
		});
	};

	if sort_values.is_empty() {
		return Ok(None);
	}

	Ok(Some(sort_values))
}
