#![warn(clippy::pedantic)]

//! Turn a flight between two airports into a downloadable ICS calendar.
//!
//! The pipeline is [`build`] (validate the form and resolve both local times
//! to UTC), then [`encode`] (serialize to RFC 5545), then a [`Sink`].

pub mod airport;
pub mod delivery;
pub mod error;
pub mod event;
pub mod ics;
pub mod tz;

pub use airport::{Airport, AirportTable};
pub use delivery::{DirectorySink, Sink, WriterSink};
pub use error::{AirportError, DeliveryError, ResolveError, ValidationError};
pub use event::{build, CalendarEvent, RawFlightInput};
pub use ics::{encode, encode_at, IcsFile};
pub use tz::{ChronoTzResolver, TimezoneResolver};

/// Builds and encodes in one step, stamped with the current time.
///
/// # Errors
///
/// Returns the [`ValidationError`] from [`build`]; no file is produced.
pub fn generate<R>(raw: &RawFlightInput, resolver: &R) -> Result<IcsFile, ValidationError>
where
	R: TimezoneResolver + ?Sized,
{
	build(raw, resolver).map(|event| encode(&event))
}
