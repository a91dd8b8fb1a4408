use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading a vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
	#[error("Id 0 is reserved for padding (word '{0}')")]
	ReservedId(String),

	#[error("Id {id} is mapped to both '{first}' and '{second}'")]
	DuplicateId {
		id: u32,
		first: String,
		second: String,
	},

	#[error("Word '{word}' is mapped to both {first} and {second}")]
	DuplicateWord {
		word: String,
		first: u32,
		second: u32,
	},

	#[error("Empty word mapped to id {0}")]
	EmptyWord(u32),

	#[error("Vocabulary is empty")]
	Empty,
}

/// Errors raised by a sequence model forward pass or while building one.
#[derive(Debug, Error)]
pub enum ModelError {
	#[error("Input length mismatch: expected {expected}, got {got}")]
	InputLength { expected: usize, got: usize },

	#[error("Token id {id} is out of range (vocabulary size {vocab_size})")]
	TokenOutOfRange { id: u32, vocab_size: usize },

	#[error("Shape mismatch for {name}: expected {expected:?}, got {got:?}")]
	ShapeMismatch {
		name: String,
		expected: Vec<usize>,
		got: Vec<usize>,
	},

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("Model produced an empty output")]
	EmptyOutput,
}

/// Errors returned by the inference procedure.
///
/// Diagnostics ("no tokens recognized", ...) are not errors, see `Prediction`.
#[derive(Debug, Error)]
pub enum PredictError {
	#[error("max_sequence_length must be >= 2, got {0}")]
	InvalidSequenceLength(usize),

	#[error("Forward pass failed: {0}")]
	Model(#[from] ModelError),
}

/// Errors raised while loading or saving artifacts.
#[derive(Debug, Error)]
pub enum LoadError {
	#[error("Failed to access {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Failed to decode model {path}: {source}")]
	Decode {
		path: PathBuf,
		#[source]
		source: postcard::Error,
	},

	#[error("Failed to encode model: {0}")]
	Encode(#[source] postcard::Error),

	#[error("Failed to parse vocabulary {path}: {source}")]
	Json {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Unsupported model format version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },

	#[error("Invalid vocabulary: {0}")]
	Vocabulary(#[from] VocabularyError),

	#[error("Invalid model: {0}")]
	Model(#[from] ModelError),

	#[error("Vocabulary id {max_id} does not fit the model output size {output_size}")]
	Mismatch { max_id: u32, output_size: usize },
}
