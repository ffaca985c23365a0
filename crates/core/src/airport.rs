use std::{collections::BTreeMap, fmt};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::AirportError;

/// An airport the user can depart from or arrive at.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Airport {
	pub iata: String,
	pub name: String,
	/// IANA timezone identifier, e.g. `America/New_York`.
	pub tz: String,
}

impl Airport {
	#[must_use]
	pub fn new(iata: &str, name: &str, tz: &str) -> Self {
		Self {
			iata: iata.to_ascii_uppercase(),
			name: name.to_string(),
			tz: tz.to_string(),
		}
	}

	/// Checks the entry against the data model: a three-letter IATA code
	/// (uppercased on insertion) and a known IANA timezone.
	///
	/// # Errors
	///
	/// Returns the first [`AirportError`] found.
	pub fn validate(&self) -> Result<(), AirportError> {
		if self.iata.len() != 3 || !self.iata.bytes().all(|b| b.is_ascii_alphabetic()) {
			return Err(AirportError::InvalidIata(self.iata.clone()));
		}

		if self.tz.parse::<Tz>().is_err() {
			return Err(AirportError::UnknownTimezone {
				iata: self.iata.clone(),
				tz: self.tz.clone(),
			});
		}

		Ok(())
	}

	/// The text shown for this airport in a picker.
	#[must_use]
	pub fn label(&self) -> String {
		format!("{} - {}", self.iata, self.name)
	}
}

impl fmt::Display for Airport {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.iata)
	}
}

const BUILTIN: [(&str, &str, &str); 16] = [
	("JFK", "John F. Kennedy International Airport", "America/New_York"),
	("LAX", "Los Angeles International Airport", "America/Los_Angeles"),
	("ORD", "O'Hare International Airport", "America/Chicago"),
	("ATL", "Hartsfield–Jackson Atlanta International Airport", "America/New_York"),
	("DFW", "Dallas/Fort Worth International Airport", "America/Chicago"),
	("DEN", "Denver International Airport", "America/Denver"),
	("SFO", "San Francisco International Airport", "America/Los_Angeles"),
	("SEA", "Seattle–Tacoma International Airport", "America/Los_Angeles"),
	("YYZ", "Toronto Pearson International Airport", "America/Toronto"),
	("YOW", "Ottawa Macdonald–Cartier International Airport", "America/Toronto"),
	("LHR", "Heathrow Airport", "Europe/London"),
	("CDG", "Charles de Gaulle Airport", "Europe/Paris"),
	("FRA", "Frankfurt Airport", "Europe/Berlin"),
	("DXB", "Dubai International Airport", "Asia/Dubai"),
	("HND", "Haneda Airport", "Asia/Tokyo"),
	("SYD", "Sydney Kingsford Smith Airport", "Australia/Sydney"),
];

/// Read-only airport reference data, keyed by IATA code.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
	airports: BTreeMap<String, Airport>,
}

impl AirportTable {
	#[must_use]
	pub fn builtin() -> Self {
		Self::default().with_airports(
			BUILTIN
				.iter()
				.map(|(iata, name, tz)| Airport::new(iata, name, tz)),
		)
	}

	/// Adds airports, replacing any existing entry with the same code.
	#[must_use]
	pub fn with_airports<I>(mut self, airports: I) -> Self
	where
		I: IntoIterator<Item = Airport>,
	{
		for mut airport in airports {
			airport.iata.make_ascii_uppercase();
			self.airports.insert(airport.iata.clone(), airport);
		}

		self
	}

	#[must_use]
	pub fn get(&self, code: &str) -> Option<&Airport> {
		self.airports.get(&code.trim().to_ascii_uppercase())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.airports.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.airports.is_empty()
	}

	/// Finds airports for a picker: code-prefix hits first, then name hits.
	#[must_use]
	pub fn search(&self, query: &str) -> Vec<&Airport> {
		let query = query.trim().to_lowercase();

		if query.is_empty() {
			return Vec::new();
		}

		let by_code = self
			.airports
			.values()
			.filter(|a| a.iata.to_lowercase().starts_with(&query));
		let by_name = self.airports.values().filter(|a| {
			!a.iata.to_lowercase().starts_with(&query) && a.name.to_lowercase().contains(&query)
		});

		by_code.chain(by_name).collect()
	}
}
