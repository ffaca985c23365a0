//! Turning a wall-clock time in a named timezone into an absolute instant.

use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{ResolveError, ValidationError};

/// Pins a naive local time in an IANA timezone to a UTC instant.
pub trait TimezoneResolver {
	/// # Errors
	///
	/// Returns an error if `tz` is not a known identifier, or if `local`
	/// falls into a DST gap or overlap in that timezone.
	fn resolve(&self, tz: &str, local: NaiveDateTime) -> Result<DateTime<Utc>, ResolveError>;
}

/// Resolver backed by the IANA database compiled into `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoTzResolver;

impl TimezoneResolver for ChronoTzResolver {
	fn resolve(&self, tz: &str, local: NaiveDateTime) -> Result<DateTime<Utc>, ResolveError> {
		let zone: Tz = tz
			.parse()
			.map_err(|_| ResolveError::UnknownTimezone(tz.to_string()))?;

		match zone.from_local_datetime(&local) {
			LocalResult::Single(dt) => Ok(dt.to_utc()),
			LocalResult::Ambiguous(a, b) => {
				let (a, b) = (a.to_utc(), b.to_utc());

				Err(ResolveError::Ambiguous {
					tz: tz.to_string(),
					local,
					earliest: a.min(b),
					latest: a.max(b),
				})
			}
			LocalResult::None => Err(ResolveError::Nonexistent {
				tz: tz.to_string(),
				local,
			}),
		}
	}
}

// what an HTML datetime-local input produces, with and without seconds
const LOCAL_FORMATS: [&str; 4] = [
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%d %H:%M",
];

/// Parses a local date-time with no offset attached.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDateTime`] if `s` matches none of the
/// accepted forms, carries an offset, or has a year outside `0000..=9999`.
pub fn parse_local(s: &str) -> Result<NaiveDateTime, ValidationError> {
	let trimmed = s.trim();

	LOCAL_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
		.filter(|dt| (0..=9999).contains(&dt.year()))
		.ok_or_else(|| ValidationError::InvalidDateTime(s.to_string()))
}

#[cfg(test)]
mod tests {
	use chrono::NaiveDate;

	use super::*;

	fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
		NaiveDate::from_ymd_opt(y, m, d)
			.unwrap()
			.and_hms_opt(h, min, 0)
			.unwrap()
	}

	#[test]
	fn parses_datetime_local_forms() {
		let expected = local(2024, 12, 17, 18, 48);

		assert_eq!(parse_local("2024-12-17T18:48").unwrap(), expected);
		assert_eq!(parse_local("2024-12-17T18:48:00").unwrap(), expected);
		assert_eq!(parse_local(" 2024-12-17 18:48 ").unwrap(), expected);
		assert_eq!(
			parse_local("2024-12-17T18:48:00.250").unwrap(),
			expected + chrono::Duration::milliseconds(250)
		);
	}

	#[test]
	fn rejects_offsets_and_garbage() {
		for input in [
			"2024-12-17T18:48Z",
			"2024-12-17T18:48:00+01:00",
			"2024-12-17",
			"18:48",
			"2024-13-01T00:00",
			"tomorrow",
		] {
			assert_eq!(
				parse_local(input),
				Err(ValidationError::InvalidDateTime(input.to_string())),
				"{input}"
			);
		}
	}

	#[test]
	fn resolves_winter_offsets() {
		let resolver = ChronoTzResolver;

		assert_eq!(
			resolver
				.resolve("America/New_York", local(2024, 12, 17, 18, 48))
				.unwrap(),
			Utc.with_ymd_and_hms(2024, 12, 17, 23, 48, 0).unwrap()
		);
		assert_eq!(
			resolver
				.resolve("America/Los_Angeles", local(2024, 12, 17, 20, 0))
				.unwrap(),
			Utc.with_ymd_and_hms(2024, 12, 18, 4, 0, 0).unwrap()
		);
	}

	#[test]
	fn resolves_summer_offsets() {
		assert_eq!(
			ChronoTzResolver
				.resolve("Europe/London", local(2024, 7, 1, 12, 0))
				.unwrap(),
			Utc.with_ymd_and_hms(2024, 7, 1, 11, 0, 0).unwrap()
		);
	}

	#[test]
	fn unknown_timezone() {
		assert_eq!(
			ChronoTzResolver.resolve("Mars/Olympus_Mons", local(2024, 1, 1, 0, 0)),
			Err(ResolveError::UnknownTimezone("Mars/Olympus_Mons".into()))
		);
	}

	#[test]
	fn spring_forward_gap_is_nonexistent() {
		let gap = local(2024, 3, 10, 2, 30);

		assert_eq!(
			ChronoTzResolver.resolve("America/New_York", gap),
			Err(ResolveError::Nonexistent {
				tz: "America/New_York".into(),
				local: gap,
			})
		);
	}

	#[test]
	fn fall_back_overlap_is_ambiguous() {
		let overlap = local(2024, 11, 3, 1, 30);

		assert_eq!(
			ChronoTzResolver.resolve("America/New_York", overlap),
			Err(ResolveError::Ambiguous {
				tz: "America/New_York".into(),
				local: overlap,
				earliest: Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap(),
				latest: Utc.with_ymd_and_hms(2024, 11, 3, 6, 30, 0).unwrap(),
			})
		);
	}
}
