use chrono::{DateTime, Datelike, Utc};

use crate::{
	airport::Airport,
	error::ValidationError,
	ics::sanitize_title,
	tz::{parse_local, TimezoneResolver},
};

/// Form state as collected by the front end; any field may be absent.
#[derive(Debug, Clone, Default)]
pub struct RawFlightInput {
	pub departure: Option<Airport>,
	pub arrival: Option<Airport>,
	pub departure_time: Option<String>,
	pub arrival_time: Option<String>,
	pub flight_number: Option<String>,
}

/// A validated flight, ready to be encoded.
///
/// `start` is always strictly before `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
	start: DateTime<Utc>,
	end: DateTime<Utc>,
	start_tz: String,
	end_tz: String,
	title: String,
}

impl CalendarEvent {
	#[must_use]
	pub fn start(&self) -> DateTime<Utc> {
		self.start
	}

	#[must_use]
	pub fn end(&self) -> DateTime<Utc> {
		self.end
	}

	#[must_use]
	pub fn start_tz(&self) -> &str {
		&self.start_tz
	}

	#[must_use]
	pub fn end_tz(&self) -> &str {
		&self.end_tz
	}

	#[must_use]
	pub fn title(&self) -> &str {
		&self.title
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|s| !s.trim().is_empty())
}

/// ICS UTC date-times only have room for a four-digit year.
fn within_ics_years(
	instant: DateTime<Utc>,
	input: &str,
) -> Result<DateTime<Utc>, ValidationError> {
	if (0..=9999).contains(&instant.year()) {
		Ok(instant)
	} else {
		Err(ValidationError::InvalidDateTime(input.to_string()))
	}
}

#[must_use]
pub fn compose_title(flight_number: Option<&str>, from: &Airport, to: &Airport) -> String {
	match non_empty(flight_number) {
		Some(number) => format!("Flight {number} from {from} to {to}"),
		None => format!("Flight from {from} to {to}"),
	}
}

/// Validates raw form input and resolves both ends to UTC.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found, checking in order: airports
/// present, date-times present, date-times parseable, timezones resolvable
/// (to a UTC year in `0000..=9999`), departure strictly before arrival.
pub fn build<R>(raw: &RawFlightInput, resolver: &R) -> Result<CalendarEvent, ValidationError>
where
	R: TimezoneResolver + ?Sized,
{
	let (Some(from), Some(to)) = (&raw.departure, &raw.arrival) else {
		return Err(ValidationError::MissingField("airport"));
	};

	let (Some(departs), Some(arrives)) = (
		non_empty(raw.departure_time.as_deref()),
		non_empty(raw.arrival_time.as_deref()),
	) else {
		return Err(ValidationError::MissingField("datetime"));
	};

	let departs_local = parse_local(departs)?;
	let arrives_local = parse_local(arrives)?;

	let start = resolver.resolve(&from.tz, departs_local)?;
	let end = resolver.resolve(&to.tz, arrives_local)?;

	let start = within_ics_years(start, departs)?;
	let end = within_ics_years(end, arrives)?;

	if start >= end {
		return Err(ValidationError::InvalidRange(
			"departure must precede arrival",
		));
	}

	let title = sanitize_title(&compose_title(raw.flight_number.as_deref(), from, to));

	tracing::debug!(%start, %end, from = %from.iata, to = %to.iata, "built flight event");

	Ok(CalendarEvent {
		start,
		end,
		start_tz: from.tz.clone(),
		end_tz: to.tz.clone(),
		title,
	})
}
