use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::LoadError;

/// Reads a whole file into memory.
///
/// The path is kept in the error so that the shell can report which
/// artifact is missing.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> Result<Vec<u8>, LoadError> {
	let path = filename.as_ref();
	fs::read(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })
}

/// Reads a UTF-8 text file into a `String`.
pub(crate) fn read_text<P: AsRef<Path>>(filename: P) -> Result<String, LoadError> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_owned(), source })
}

/// Writes `bytes` to `filename`, replacing any existing file.
pub(crate) fn write_bytes<P: AsRef<Path>>(filename: P, bytes: &[u8]) -> Result<(), LoadError> {
	let path = filename.as_ref();
	fs::write(path, bytes).map_err(|source| LoadError::Io { path: path.to_owned(), source })
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/next_word_lstm.bin"` → `"next_word_lstm"`
/// - `"model.bin"` → `"model"`
///
/// Falls back to the full path when there is no file stem.
pub(crate) fn get_filename<P: AsRef<Path>>(input_path: P) -> String {
	let path = input_path.as_ref();
	match path.file_stem() {
		Some(stem) => stem.to_string_lossy().to_string(),
		None => path.to_string_lossy().to_string(),
	}
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_owned()
	}
}
