use std::{
	fs,
	path::{Path, PathBuf},
};

use anyhow::Context;
use flight2ics_core::Airport;
use serde::Deserialize;

/// Optional settings read from `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub log_level: Option<String>,
	pub output_dir: Option<PathBuf>,
	#[serde(default)]
	pub airports: Vec<Airport>,
}

impl Config {
	/// `~/.config/flight2ics/config.toml` on Linux, the platform equivalent elsewhere.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("flight2ics").join("config.toml"))
	}

	/// Loads an explicit path (which must exist) or the default one (which may not).
	pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
		match explicit {
			Some(path) => Self::read(path),
			None => match Self::default_path() {
				Some(path) if path.is_file() => Self::read(&path),
				_ => Ok(Self::default()),
			},
		}
	}

	fn read(path: &Path) -> anyhow::Result<Self> {
		let text = fs::read_to_string(path)
			.with_context(|| format!("failed to read config file {}", path.display()))?;

		Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
	}

	pub fn parse(text: &str) -> anyhow::Result<Self> {
		let config: Self = toml::from_str(text)?;

		for (index, airport) in config.airports.iter().enumerate() {
			airport
				.validate()
				.with_context(|| format!("airports[{index}] ({}) is invalid", airport.iata))?;
		}

		Ok(config)
	}
}
