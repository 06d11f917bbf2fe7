use time::{
	Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::{
		BorrowedFormatItem,
		well_known::{Iso8601, Rfc3339},
	},
	macros::format_description,
};

const NAIVE_DATE_TIME: &[BorrowedFormatItem<'_>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const NAIVE_DATE_TIME_FRACTION: &[BorrowedFormatItem<'_>] =
	format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const DATE_ONLY: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parses an ISO 8601 family timestamp into UTC, trying layouts from strictest to loosest.
///
/// Timestamps without an offset are taken as UTC. Blank or unparsable input is `None`, and so is
/// anything whose UTC date leaves the four-digit year range.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if raw.is_empty() {
		return None;
	}

	let parsed = OffsetDateTime::parse(raw, &Rfc3339)
		.or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
		.or_else(|_| PrimitiveDateTime::parse(raw, NAIVE_DATE_TIME_FRACTION).map(|dt| dt.assume_utc()))
		.or_else(|_| PrimitiveDateTime::parse(raw, NAIVE_DATE_TIME).map(|dt| dt.assume_utc()))
		.or_else(|_| Date::parse(raw, DATE_ONLY).map(|date| date.midnight().assume_utc()))
		.ok()?;

	parsed.checked_to_offset(UtcOffset::UTC).filter(in_reporting_range)
}

/// Epoch seconds, possibly fractional. Non-positive values are `None`.
pub fn from_epoch_seconds(seconds: f64) -> Option<OffsetDateTime> {
	if !seconds.is_finite() || seconds <= 0.0 {
		return None;
	}

	OffsetDateTime::from_unix_timestamp_nanos((seconds * 1_000_000_000.0) as i128)
		.ok()
		.filter(in_reporting_range)
}

/// RFC 3339 can only render years `0000..=9999`.
fn in_reporting_range(value: &OffsetDateTime) -> bool {
	(0..=9999).contains(&value.year())
}

/// Drops sub-second precision for reporting.
pub fn whole_seconds(value: OffsetDateTime) -> OffsetDateTime {
	value.replace_nanosecond(0).unwrap_or(value)
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn parses_rfc3339_with_and_without_fraction() {
		assert_eq!(parse_timestamp("2023-04-05T06:07:08Z"), Some(datetime!(2023-04-05 06:07:08 UTC)));
		assert_eq!(
			parse_timestamp("2023-04-05T08:07:08.123456+02:00"),
			Some(datetime!(2023-04-05 06:07:08.123456 UTC))
		);
	}

	#[test]
	fn naive_and_date_only_layouts_are_utc() {
		assert_eq!(parse_timestamp("2023-04-05T06:07:08"), Some(datetime!(2023-04-05 06:07:08 UTC)));
		assert_eq!(
			parse_timestamp("2023-04-05T06:07:08.5"),
			Some(datetime!(2023-04-05 06:07:08.5 UTC))
		);
		assert_eq!(parse_timestamp("2023-04-05"), Some(datetime!(2023-04-05 00:00:00 UTC)));
	}

	#[test]
	fn garbage_is_absent_not_an_error() {
		assert_eq!(parse_timestamp(""), None);
		assert_eq!(parse_timestamp("   "), None);
		assert_eq!(parse_timestamp("yesterday"), None);
		assert_eq!(parse_timestamp("2023-13-45T99:00:00Z"), None);
	}

	#[test]
	fn offsets_pushing_past_year_bounds_are_absent() {
		assert_eq!(parse_timestamp("9999-12-31T23:59:59-01:00"), None);
		assert_eq!(parse_timestamp("0000-01-01T00:00:00+01:00"), None);
		assert_eq!(
			parse_timestamp("9999-12-31T22:59:59-01:00"),
			Some(datetime!(9999-12-31 23:59:59 UTC))
		);
		assert_eq!(
			parse_timestamp("0000-01-01T01:00:00+01:00"),
			Some(datetime!(0000-01-01 00:00:00 UTC))
		);
	}

	#[test]
	fn epoch_seconds_beyond_year_9999_are_absent() {
		assert_eq!(from_epoch_seconds(253_402_300_800.0), None);
		assert!(from_epoch_seconds(253_402_300_799.0).is_some());
	}

	#[test]
	fn epoch_seconds_keep_fractions() {
		let parsed = from_epoch_seconds(1_700_000_000.25).expect("valid epoch");

		assert_eq!(parsed.unix_timestamp(), 1_700_000_000);
		assert_eq!(whole_seconds(parsed).nanosecond(), 0);
		assert_eq!(from_epoch_seconds(0.0), None);
		assert_eq!(from_epoch_seconds(-5.0), None);
	}
}
