#![warn(clippy::pedantic)]

mod config;

use std::{io, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use flight2ics_core::{
	build, encode, Airport, AirportTable, ChronoTzResolver, DirectorySink, RawFlightInput, Sink,
	WriterSink,
};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[clap(version, about = "Create a calendar file for a flight")]
struct Args {
	/// Config file [default: <config dir>/flight2ics/config.toml]
	#[clap(long, global = true, value_hint = clap::ValueHint::FilePath)]
	config: Option<PathBuf>,
	#[clap(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Write an .ics file for one flight
	Generate(GenerateArgs),
	/// List airports whose code or name matches
	Airports { query: String },
}

#[derive(clap::Args)]
struct GenerateArgs {
	/// Departure airport IATA code
	#[clap(long)]
	from: String,
	/// Local departure time, e.g. 2024-12-17T18:48
	#[clap(long)]
	departs: String,
	/// Arrival airport IATA code
	#[clap(long)]
	to: String,
	/// Local arrival time, e.g. 2024-12-17T20:00
	#[clap(long)]
	arrives: String,
	#[clap(short = 'n', long)]
	flight_number: Option<String>,
	/// Directory to write into [default: config `output_dir`, else .]
	#[clap(short, long, value_hint = clap::ValueHint::DirPath, conflicts_with = "stdout")]
	output_dir: Option<PathBuf>,
	/// Write the calendar to stdout instead of a file
	#[clap(long)]
	stdout: bool,
}

fn init_logging(level: Option<&str>) {
	let fallback = level.unwrap_or("warn");
	let (filter, invalid) = match EnvFilter::try_from_default_env() {
		Ok(filter) => (filter, false),
		Err(_) => match EnvFilter::try_new(fallback) {
			Ok(filter) => (filter, false),
			Err(_) => (EnvFilter::new("warn"), true),
		},
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();

	if invalid {
		tracing::warn!(level = fallback, "invalid log level in config, using warn");
	}
}

fn airport(table: &AirportTable, code: &str) -> anyhow::Result<Airport> {
	match table.get(code) {
		Some(airport) => Ok(airport.clone()),
		None => bail!("unknown airport code '{code}'"),
	}
}

fn generate(
	args: GenerateArgs,
	table: &AirportTable,
	config_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
	let raw = RawFlightInput {
		departure: Some(airport(table, &args.from)?),
		arrival: Some(airport(table, &args.to)?),
		departure_time: Some(args.departs),
		arrival_time: Some(args.arrives),
		flight_number: args.flight_number,
	};

	let event = build(&raw, &ChronoTzResolver).context("cannot create flight event")?;
	let file = encode(&event);

	if args.stdout {
		WriterSink(io::stdout().lock()).deliver(&file)?;
	} else {
		let dir = args
			.output_dir
			.or(config_dir)
			.unwrap_or_else(|| PathBuf::from("."));
		let mut sink = DirectorySink::new(dir);

		sink.deliver(&file)?;

		if let Some(path) = sink.last_written() {
			println!("{}", path.display());
		}
	}

	Ok(())
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	let Config {
		log_level,
		output_dir,
		airports,
	} = Config::load(args.config.as_deref())?;

	init_logging(log_level.as_deref());

	let table = AirportTable::builtin().with_airports(airports);
	tracing::debug!(airports = table.len(), "loaded airport table");

	match args.command {
		Command::Generate(generate_args) => generate(generate_args, &table, output_dir),
		Command::Airports { query } => {
			for airport in table.search(&query) {
				println!("{}\t{}", airport.label(), airport.tz);
			}

			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_valid() {
		Args::command().debug_assert();
	}

	#[test]
	fn output_dir_conflicts_with_stdout() {
		let parsed = Args::try_parse_from([
			"flight2ics",
			"generate",
			"--from",
			"JFK",
			"--departs",
			"2024-12-17T18:48",
			"--to",
			"LAX",
			"--arrives",
			"2024-12-17T20:00",
			"--stdout",
			"-o",
			"/tmp",
		]);

		assert!(parsed.is_err());
	}

	#[test]
	fn unknown_airport_names_the_code() {
		let err = airport(&AirportTable::builtin(), "QQQ").unwrap_err();

		assert_eq!(err.to_string(), "unknown airport code 'QQQ'");
	}

	#[test]
	fn generate_reports_invalid_range() {
		let args = GenerateArgs {
			from: "LAX".into(),
			departs: "2024-12-17T20:00".into(),
			to: "JFK".into(),
			arrives: "2024-12-17T18:48".into(),
			flight_number: None,
			output_dir: Some(std::env::temp_dir()),
			stdout: false,
		};

		let err = generate(args, &AirportTable::builtin(), None).unwrap_err();

		assert_eq!(
			err.root_cause().to_string(),
			"invalid range: departure must precede arrival"
		);
	}
}
