use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn reads_lines_without_terminators() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "first line\r\nsecond\n\nlast").unwrap();

		let lines = read_file(file.path()).unwrap();
		assert_eq!(lines, vec!["first line", "second", "", "last"]);
	}

	#[test]
	fn missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = read_file(dir.path().join("missing.txt")).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::NotFound);
	}
}
