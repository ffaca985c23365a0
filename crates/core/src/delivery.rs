//! Places an encoded [`IcsFile`] somewhere the user can open it.

use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
};

use crate::{error::DeliveryError, ics::IcsFile};

/// "Save these bytes as a file named X."
pub trait Sink {
	/// # Errors
	///
	/// Returns [`DeliveryError`] if the bytes could not be handed over.
	/// Nothing is retried.
	fn deliver(&mut self, file: &IcsFile) -> Result<(), DeliveryError>;
}

/// Writes each file into a directory under its own name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
	dir: PathBuf,
	last: Option<PathBuf>,
}

impl DirectorySink {
	pub fn new<P: AsRef<Path>>(dir: P) -> Self {
		Self {
			dir: dir.as_ref().to_path_buf(),
			last: None,
		}
	}

	/// Where the most recent successful delivery landed.
	#[must_use]
	pub fn last_written(&self) -> Option<&Path> {
		self.last.as_deref()
	}
}

/// A bare file name: no separators, not `.` or `..`, not empty.
fn is_plain_file_name(name: &str) -> bool {
	let path = Path::new(name);

	!name.is_empty()
		&& !name.contains(['/', '\\'])
		&& path.file_name().is_some_and(|n| n == name)
}

impl Sink for DirectorySink {
	fn deliver(&mut self, file: &IcsFile) -> Result<(), DeliveryError> {
		if !is_plain_file_name(file.file_name()) {
			tracing::warn!(file_name = file.file_name(), "refusing unsafe file name");
			return Err(DeliveryError::InvalidFileName(file.file_name().to_string()));
		}

		let path = self.dir.join(file.file_name());

		fs::write(&path, file.bytes()).map_err(|source| DeliveryError::Io {
			file_name: file.file_name().to_string(),
			source,
		})?;

		tracing::info!(path = %path.display(), "wrote calendar");
		self.last = Some(path);

		Ok(())
	}
}

/// Streams the bytes to any writer, e.g. stdout.
#[derive(Debug)]
pub struct WriterSink<W>(pub W);

impl<W: Write> Sink for WriterSink<W> {
	fn deliver(&mut self, file: &IcsFile) -> Result<(), DeliveryError> {
		let io = |source| DeliveryError::Io {
			file_name: file.file_name().to_string(),
			source,
		};

		self.0.write_all(file.bytes()).map_err(io)?;
		self.0.flush().map_err(io)
	}
}

#[cfg(test)]
mod tests {
	use std::{env, io};

	use chrono::{TimeZone, Utc};

	use super::*;
	use crate::{build, encode_at, AirportTable, ChronoTzResolver, RawFlightInput};

	fn sample() -> IcsFile {
		let table = AirportTable::builtin();
		let raw = RawFlightInput {
			departure: table.get("JFK").cloned(),
			arrival: table.get("LAX").cloned(),
			departure_time: Some("2024-12-17T18:48".into()),
			arrival_time: Some("2024-12-17T20:00".into()),
			flight_number: None,
		};
		let event = build(&raw, &ChronoTzResolver).unwrap();

		encode_at(&event, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap())
	}

	#[test]
	fn plain_file_names() {
		assert!(is_plain_file_name("Flight_from_JFK_to_LAX.ics"));
		assert!(!is_plain_file_name("Flight_AA/100.ics"));
		assert!(!is_plain_file_name(r"..\x.ics"));
		assert!(!is_plain_file_name(".."));
		assert!(!is_plain_file_name(""));
	}

	#[test]
	fn writer_sink_writes_exact_bytes() {
		let file = sample();
		let mut sink = WriterSink(Vec::new());

		sink.deliver(&file).unwrap();
		assert_eq!(sink.0, file.bytes());
	}

	#[test]
	fn directory_sink_writes_named_file() {
		let dir = env::temp_dir().join(format!("flight2ics-sink-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();

		let file = sample();
		let mut sink = DirectorySink::new(&dir);
		sink.deliver(&file).unwrap();

		let written = sink.last_written().unwrap();
		assert_eq!(written, dir.join("Flight_from_JFK_to_LAX.ics"));
		assert_eq!(fs::read(written).unwrap(), file.bytes());

		fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn directory_sink_reports_io_failure() {
		let mut sink = DirectorySink::new(env::temp_dir().join("flight2ics-does-not-exist/nested"));

		assert!(matches!(
			sink.deliver(&sample()),
			Err(DeliveryError::Io { .. })
		));
		assert!(sink.last_written().is_none());
	}

	struct Broken;

	impl Write for Broken {
		fn write(&mut self, _: &[u8]) -> io::Result<usize> {
			Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
		}

		fn flush(&mut self) -> io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn writer_failure_leaves_encoded_file_intact() {
		let file = sample();
		let before = file.clone();

		let err = WriterSink(Broken).deliver(&file).unwrap_err();

		assert!(err.to_string().contains("Flight_from_JFK_to_LAX.ics"));
		assert_eq!(file, before);
	}
}
