use std::path::Path;

use log::info;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::activation::softmax;
use super::lstm_layer::{check_shape, last_state};
use super::sequence_model::SequenceModel;
use crate::error::{LoadError, ModelError};
use crate::io;

pub use super::lstm_layer::LstmLayer;

/// Version written in front of every model artifact.
pub const FORMAT_VERSION: u32 = 1;

/// Inference-only next-word network.
///
/// `Embedding -> LSTM (stacked) -> Dense -> softmax`. Only the hidden state of
/// the last timestep of the last LSTM layer reaches the dense layer. Dropout
/// used during training is the identity at inference and is not stored.
///
/// # Invariants
/// - `embedding` is `[vocab_size, embedding_dim]`
/// - there is at least one LSTM layer and layer sizes chain together
/// - `dense_kernel` is `[units, vocab_size]` for the last layer
/// - `dense_bias` is `[vocab_size]`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LstmModel {
	input_width: usize,
	embedding: Array2<f32>,
	layers: Vec<LstmLayer>,
	dense_kernel: Array2<f32>,
	dense_bias: Array1<f32>,
}

impl LstmModel {
	/// Assembles a model from trained weights.
	///
	/// The vocabulary size (padding slot included) is the length of `dense_bias`.
	///
	/// # Errors
	/// Returns an error if the weight shapes do not chain together.
	pub fn from_parts(
		input_width: usize,
		embedding: Array2<f32>,
		layers: Vec<LstmLayer>,
		dense_kernel: Array2<f32>,
		dense_bias: Array1<f32>,
	) -> Result<Self, ModelError> {
		let model = Self { input_width, embedding, layers, dense_kernel, dense_bias };
		model.validate()?;
		Ok(model)
	}

	/// Compares array shapes only, no arithmetic on decoded sizes.
	fn validate(&self) -> Result<(), ModelError> {
		if self.input_width == 0 {
			return Err(ModelError::InvalidConfig("input width must be positive".to_owned()));
		}
		if self.embedding_dim() == 0 {
			return Err(ModelError::InvalidConfig("embedding dimension must be positive".to_owned()));
		}
		if self.dense_bias.is_empty() {
			return Err(ModelError::InvalidConfig("vocabulary size must be positive".to_owned()));
		}
		if self.layers.is_empty() {
			return Err(ModelError::InvalidConfig("at least one LSTM layer is required".to_owned()));
		}
		check_shape("embedding", &[self.vocab_size(), self.embedding_dim()], self.embedding.shape())?;

		let mut input_size = self.embedding_dim();
		for layer in &self.layers {
			layer.validate()?;
			check_shape("lstm input", &[input_size], &[layer.input_size()])?;
			input_size = layer.units();
		}

		check_shape("dense kernel", &[input_size, self.vocab_size()], self.dense_kernel.shape())
	}

	/// Loads a model artifact written by `save`.
	///
	/// # Errors
	/// Returns an error if the file is missing, was written by another format
	/// version, cannot be decoded, or holds inconsistent weights.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, LoadError> {
		let path = filepath.as_ref();
		let bytes = io::read_bytes(path)?;

		let (version, rest): (u32, &[u8]) = postcard::take_from_bytes(&bytes)
			.map_err(|source| LoadError::Decode { path: path.to_owned(), source })?;
		if version != FORMAT_VERSION {
			return Err(LoadError::UnsupportedVersion { found: version, expected: FORMAT_VERSION });
		}

		let model: LstmModel = postcard::from_bytes(rest)
			.map_err(|source| LoadError::Decode { path: path.to_owned(), source })?;
		model.validate()?;

		info!(
			"Loaded model {} (input width {}, vocabulary size {}, {} LSTM layer(s))",
			path.display(),
			model.input_width,
			model.vocab_size(),
			model.layers.len()
		);
		Ok(model)
	}

	/// Serializes the model with `postcard`, prefixed by `FORMAT_VERSION`.
	pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<(), LoadError> {
		let bytes = postcard::to_stdvec(&(FORMAT_VERSION, self)).map_err(LoadError::Encode)?;
		io::write_bytes(filepath, &bytes)
	}

	/// Number of output classes, padding slot included.
	pub fn vocab_size(&self) -> usize {
		self.dense_bias.len()
	}

	pub fn embedding_dim(&self) -> usize {
		self.embedding.ncols()
	}

	/// Hidden units of every LSTM layer, first to last.
	pub fn layer_units(&self) -> Vec<usize> {
		self.layers.iter().map(LstmLayer::units).collect()
	}
}

impl SequenceModel for LstmModel {
	fn input_width(&self) -> usize {
		self.input_width
	}

	fn output_size(&self) -> usize {
		self.vocab_size()
	}

	fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>, ModelError> {
		if sequence.len() != self.input_width {
			return Err(ModelError::InputLength { expected: self.input_width, got: sequence.len() });
		}

		let mut rows = Vec::with_capacity(sequence.len());
		for &id in sequence {
			if id as usize >= self.vocab_size() {
				return Err(ModelError::TokenOutOfRange { id, vocab_size: self.vocab_size() });
			}
			rows.push(id as usize);
		}

		// one embedding row per timestep
		let mut states = self.embedding.select(Axis(0), &rows);
		for layer in &self.layers {
			states = layer.forward(&states);
		}
		let last = last_state(&states).ok_or(ModelError::EmptyOutput)?;

		let logits = last.dot(&self.dense_kernel) + &self.dense_bias;
		let mut output = logits.to_vec();
		softmax(&mut output);
		Ok(output)
	}
}
