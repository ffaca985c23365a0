#![warn(clippy::pedantic)]

use flight2ics_core::{AirportTable, ChronoTzResolver, IcsFile, RawFlightInput};
use once_cell::sync::Lazy;
use wasm_bindgen::prelude::{wasm_bindgen, JsError};

static AIRPORTS: Lazy<AirportTable> = Lazy::new(AirportTable::builtin);

/// An encoded calendar for the page to offer as a download.
#[wasm_bindgen]
pub struct IcsDownload {
	file: IcsFile,
}

#[wasm_bindgen]
impl IcsDownload {
	#[wasm_bindgen(getter, js_name = fileName)]
	#[must_use]
	pub fn file_name(&self) -> String {
		self.file.file_name().to_string()
	}

	#[wasm_bindgen(getter)]
	#[must_use]
	pub fn content(&self) -> String {
		self.file.content().to_string()
	}

	#[wasm_bindgen(getter, js_name = mimeType)]
	#[must_use]
	pub fn mime_type(&self) -> String {
		IcsFile::MIME_TYPE.to_string()
	}
}

fn to_raw(
	table: &AirportTable,
	departure_iata: &str,
	departure_time: &str,
	arrival_iata: &str,
	arrival_time: &str,
	flight_number: Option<String>,
) -> RawFlightInput {
	RawFlightInput {
		departure: table.get(departure_iata).cloned(),
		arrival: table.get(arrival_iata).cloned(),
		departure_time: Some(departure_time.to_string()),
		arrival_time: Some(arrival_time.to_string()),
		flight_number,
	}
}

/// Builds the calendar for the form's current values.
///
/// # Errors
///
/// Throws with the validation message if the form is incomplete or the
/// departure is not before the arrival.
#[wasm_bindgen]
pub fn generate(
	departure_iata: &str,
	departure_time: &str,
	arrival_iata: &str,
	arrival_time: &str,
	flight_number: Option<String>,
) -> Result<IcsDownload, JsError> {
	let raw = to_raw(
		&AIRPORTS,
		departure_iata,
		departure_time,
		arrival_iata,
		arrival_time,
		flight_number,
	);

	flight2ics_core::generate(&raw, &ChronoTzResolver)
		.map(|file| IcsDownload { file })
		.map_err(|e| JsError::new(&e.to_string()))
}

/// Autocomplete options for the airport pickers.
#[wasm_bindgen(js_name = searchAirports)]
#[must_use]
pub fn search_airports(query: &str) -> Vec<String> {
	AIRPORTS
		.search(query)
		.into_iter()
		.map(|airport| airport.label())
		.collect()
}
