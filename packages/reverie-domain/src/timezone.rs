use jiff::{Timestamp, tz::TimeZone};
use time::OffsetDateTime;

use crate::{Error, Result};

/// `Mon, Jan 5, 2026`.
const ENTRY_DATE_FORMAT: &str = "%a, %b %-d, %Y";

pub fn resolve(zone: &str) -> Result<TimeZone> {
	TimeZone::get(zone.trim()).map_err(|_| Error::UnknownTimeZone { zone: zone.to_string() })
}

pub fn format_entry_date(at: OffsetDateTime, tz: &TimeZone) -> Result<String> {
	let timestamp = Timestamp::from_nanosecond(at.unix_timestamp_nanos())
		.map_err(|_| Error::TimestampOutOfRange)?;

	Ok(timestamp.to_zoned(tz.clone()).strftime(ENTRY_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	#[test]
	fn formats_in_the_requested_zone() {
		let at = datetime!(2026-01-06 03:30 UTC);

		assert_eq!(format_entry_date(at, &TimeZone::UTC).expect("format failed"), "Tue, Jan 6, 2026");

		let new_york = resolve("America/New_York").expect("zone must resolve");

		assert_eq!(format_entry_date(at, &new_york).expect("format failed"), "Mon, Jan 5, 2026");
	}

	#[test]
	fn rejects_unknown_zones() {
		assert!(matches!(resolve("Not/AZone"), Err(Error::UnknownTimeZone { .. })));
		assert!(resolve("").is_err());
	}
}
