use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::TritError;

/// On-disk encoding of a report, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportFormat {
	/// `.json`, pretty-printed with `serde_json`.
	Json,
	/// `.bin`, compact `postcard` encoding.
	Binary,
}

impl ReportFormat {
	/// Picks the format from the extension of `path`.
	///
	/// # Errors
	/// Returns `UnsupportedFormat` for any extension other than `json` / `bin`.
	pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TritError> {
		let path = path.as_ref();
		match path.extension().and_then(|e| e.to_str()) {
			Some("json") => Ok(ReportFormat::Json),
			Some("bin") => Ok(ReportFormat::Binary),
			_ => Err(TritError::UnsupportedFormat(path.display().to_string())),
		}
	}
}

/// Reads a whole text file.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> Result<String, TritError> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `results/run` + `"json"` → `results/run.json`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> Result<PathBuf, TritError> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| TritError::UnsupportedFormat(format!("{} has no filename", input_path.display())))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Parses a TOML configuration file into `T`.
pub(crate) fn read_config<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, TritError> {
	let contents = read_file(path)?;
	Ok(toml::from_str(&contents)?)
}

/// Writes `value` to `path` in the format implied by its extension.
///
/// A path without extension is written as JSON next to it
/// (`out/report` → `out/report.json`). Returns the path actually written.
pub(crate) fn save_report<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<PathBuf, TritError> {
	let path = path.as_ref();
	let path = if path.extension().is_none() {
		build_output_path(path, "json")?
	} else {
		path.to_path_buf()
	};

	let bytes = match ReportFormat::from_path(&path)? {
		ReportFormat::Json => serde_json::to_vec_pretty(value)?,
		ReportFormat::Binary => postcard::to_stdvec(value)?,
	};
	std::fs::write(&path, bytes)?;

	Ok(path)
}

/// Reads back a report written by `save_report`.
pub(crate) fn load_report<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, TritError> {
	let format = ReportFormat::from_path(&path)?;
	let bytes = std::fs::read(&path)?;
	match format {
		ReportFormat::Json => Ok(serde_json::from_slice(&bytes)?),
		ReportFormat::Binary => Ok(postcard::from_bytes(&bytes)?),
	}
}
