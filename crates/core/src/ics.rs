//! RFC 5545 serialization of a [`CalendarEvent`].
//!
//! Instants are always written in UTC (`Z` suffix). The `VTIMEZONE` blocks
//! only name the airports' zones for the benefit of calendar clients; they
//! carry no offset rules and nothing in the event refers to them by `TZID`.

use chrono::{DateTime, Utc};

use crate::event::CalendarEvent;

pub const PRODID: &str = "-//Flight Calendar App//EN";
pub const UID_DOMAIN: &str = "flight-calendar-app.local";
pub const MAX_TITLE_CHARS: usize = 255;

// RFC 5545 3.1, excluding the line break
const MAX_LINE_OCTETS: usize = 75;

/// An encoded calendar and the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsFile {
	file_name: String,
	content: String,
}

impl IcsFile {
	pub const MIME_TYPE: &'static str = "text/calendar;charset=utf-8";

	#[must_use]
	pub fn file_name(&self) -> &str {
		&self.file_name
	}

	#[must_use]
	pub fn content(&self) -> &str {
		&self.content
	}

	#[must_use]
	pub fn bytes(&self) -> &[u8] {
		self.content.as_bytes()
	}

	#[must_use]
	pub fn into_bytes(self) -> Vec<u8> {
		self.content.into_bytes()
	}
}

/// Formats an instant as an ICS UTC date-time, e.g. `20241217T234800Z`.
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
	instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Makes a title safe for a single-line `SUMMARY`.
///
/// Every CR and LF becomes a space and the result is cut to
/// [`MAX_TITLE_CHARS`] characters. Applying it twice changes nothing.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
	title
		.chars()
		.map(|c| if matches!(c, '\r' | '\n') { ' ' } else { c })
		.take(MAX_TITLE_CHARS)
		.collect()
}

/// The download name for a title: whitespace runs become `_`, plus `.ics`.
#[must_use]
pub fn file_name(title: &str) -> String {
	let mut name = String::new();
	let mut in_space = false;

	for c in sanitize_title(title).chars() {
		if c.is_whitespace() {
			if !in_space {
				name.push('_');
			}
			in_space = true;
		} else {
			name.push(c);
			in_space = false;
		}
	}

	name.push_str(".ics");
	name
}

#[must_use]
pub fn uid(generated_at: DateTime<Utc>) -> String {
	format!("flight-{}@{UID_DOMAIN}", generated_at.timestamp_millis())
}

/// Escapes a TEXT value (RFC 5545 3.3.11). Assumes line breaks are gone.
fn escape_text(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());

	for c in value.chars() {
		if matches!(c, '\\' | ';' | ',') {
			escaped.push('\\');
		}
		escaped.push(c);
	}

	escaped
}

/// Accumulates CRLF-terminated, folded content lines.
#[derive(Default)]
struct ContentLines(String);

impl ContentLines {
	fn line(&mut self, line: &str) {
		let mut octets = 0;

		for c in line.chars() {
			let width = c.len_utf8();

			if octets + width > MAX_LINE_OCTETS {
				self.0.push_str("\r\n ");
				octets = 1;
			}

			self.0.push(c);
			octets += width;
		}

		self.0.push_str("\r\n");
	}

	fn property(&mut self, name: &str, value: &str) {
		self.line(&format!("{name}:{value}"));
	}

	fn timezone(&mut self, tzid: &str) {
		self.line("BEGIN:VTIMEZONE");
		self.property("TZID", tzid);
		self.line("BEGIN:STANDARD");
		self.property("DTSTART", "19700101T000000");
		self.property("TZOFFSETFROM", "+0000");
		self.property("TZOFFSETTO", "+0000");
		self.line("END:STANDARD");
		self.line("END:VTIMEZONE");
	}
}

/// Distinct zones in first-seen order: start, then end if different.
fn timezones(event: &CalendarEvent) -> Vec<&str> {
	let mut zones = vec![event.start_tz()];

	if event.end_tz() != event.start_tz() {
		zones.push(event.end_tz());
	}

	zones
}

/// Encodes `event` as a calendar generated at `now`.
///
/// `now` becomes the `DTSTAMP` and seeds the `UID`, so two calls with
/// different clocks never share an identifier.
#[must_use]
pub fn encode_at(event: &CalendarEvent, now: DateTime<Utc>) -> IcsFile {
	let summary = sanitize_title(event.title());
	let mut out = ContentLines::default();

	out.line("BEGIN:VCALENDAR");
	out.property("VERSION", "2.0");
	out.property("PRODID", PRODID);
	out.property("CALSCALE", "GREGORIAN");
	out.property("METHOD", "PUBLISH");

	for tzid in timezones(event) {
		out.timezone(tzid);
	}

	out.line("BEGIN:VEVENT");
	out.property("UID", &uid(now));
	out.property("DTSTAMP", &format_instant(now));
	out.property("DTSTART", &format_instant(event.start()));
	out.property("DTEND", &format_instant(event.end()));
	out.property("SUMMARY", &escape_text(&summary));
	out.property("STATUS", "CONFIRMED");
	out.line("END:VEVENT");
	out.line("END:VCALENDAR");

	tracing::debug!(summary = %summary, octets = out.0.len(), "encoded calendar");

	IcsFile {
		file_name: file_name(&summary),
		content: out.0,
	}
}

/// Encodes `event` stamped with the current time.
#[must_use]
pub fn encode(event: &CalendarEvent) -> IcsFile {
	encode_at(event, Utc::now())
}
