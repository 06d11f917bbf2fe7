//! Optional report timestamps on the wire: whole-second RFC 3339 in UTC, or `null`.

use serde::{Deserialize as _, Deserializer, Serializer};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::timestamp::{parse_timestamp, whole_seconds};

pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let Some(value) = value else {
		return serializer.serialize_none();
	};
	let utc = value
		.checked_to_offset(UtcOffset::UTC)
		.ok_or_else(|| serde::ser::Error::custom("timestamp is out of range in UTC"))?;
	let formatted = whole_seconds(utc).format(&Rfc3339).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

/// Accepts anything the metadata parser accepts. Blank strings read as absent.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
	D: Deserializer<'de>,
{
	let Some(raw) = Option::<String>::deserialize(deserializer)? else {
		return Ok(None);
	};

	if raw.trim().is_empty() {
		return Ok(None);
	}

	parse_timestamp(&raw)
		.map(Some)
		.ok_or_else(|| serde::de::Error::custom(format!("invalid report timestamp: {raw}")))
}
