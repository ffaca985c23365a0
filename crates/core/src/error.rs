//! Error types for building, encoding and delivering flight calendars.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Why a raw flight could not become a [`CalendarEvent`](crate::CalendarEvent).
///
/// Checked in a fixed order; the first failure wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	#[error("missing field: {0}")]
	MissingField(&'static str),

	#[error("invalid local date-time '{0}'")]
	InvalidDateTime(String),

	#[error(transparent)]
	TimezoneResolution(#[from] ResolveError),

	#[error("invalid range: {0}")]
	InvalidRange(&'static str),
}

/// A local wall-clock time that could not be pinned to a single instant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
	#[error("unknown timezone '{0}'")]
	UnknownTimezone(String),

	#[error("{local} does not exist in {tz}")]
	Nonexistent { tz: String, local: NaiveDateTime },

	#[error("{local} is ambiguous in {tz} ({earliest} or {latest})")]
	Ambiguous {
		tz: String,
		local: NaiveDateTime,
		earliest: DateTime<Utc>,
		latest: DateTime<Utc>,
	},
}

/// Handing the encoded file to its destination failed.
#[derive(Error, Debug)]
pub enum DeliveryError {
	#[error("refusing to write file named '{0}'")]
	InvalidFileName(String),

	#[error("failed to deliver '{file_name}': {source}")]
	Io {
		file_name: String,
		#[source]
		source: std::io::Error,
	},
}

/// An airport entry that does not fit the reference data model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AirportError {
	#[error("IATA code '{0}' is not three letters")]
	InvalidIata(String),

	#[error("airport {iata} has unknown timezone '{tz}'")]
	UnknownTimezone { iata: String, tz: String },
}
