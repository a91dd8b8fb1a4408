use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::io;
use crate::model::lstm_model::LstmModel;
use crate::model::sequence_model::SequenceModel;
use crate::predictor::Predictor;
use crate::vocabulary::Vocabulary;

/// Default file name of the model artifact.
pub const MODEL_FILE: &str = "next_word_lstm.bin";

/// Default file name of the vocabulary artifact.
pub const VOCABULARY_FILE: &str = "tokenizer.json";

/// Details about the loaded model, shown by the presentation layers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelInfo {
	pub name: String,
	pub architecture: String,
	pub vocabulary_size: usize,
	pub sequence_length: usize,
	pub embedding_dim: usize,
	pub lstm_units: Vec<usize>,
}

/// The model and vocabulary loaded at startup.
///
/// Loading either succeeds as a whole or returns a `LoadError`, so a shell
/// never starts with a half-loaded state.
#[derive(Debug)]
pub struct Artifacts {
	name: String,
	model: Arc<LstmModel>,
	vocabulary: Arc<Vocabulary>,
}

impl Artifacts {
	/// Loads both artifacts and checks they belong together.
	///
	/// # Errors
	/// - Either file is missing or cannot be decoded
	/// - A vocabulary id does not fit the model output
	pub fn load<PM, PV>(model_path: PM, vocabulary_path: PV) -> Result<Self, LoadError>
	where
		PM: AsRef<Path>,
		PV: AsRef<Path>,
	{
		let model = LstmModel::load(&model_path)?;
		let vocabulary = Vocabulary::load(&vocabulary_path)?;
		Self::new(io::get_filename(&model_path), model, vocabulary)
	}

	/// Loads `next_word_lstm.bin` and `tokenizer.json` from a directory.
	///
	/// Both `"folder"` and `"folder/"` are accepted, `"."` is the current directory.
	pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, LoadError> {
		let (model_path, vocabulary_path) = Self::default_paths(dir);
		Self::load(model_path, vocabulary_path)
	}

	/// Well-known artifact locations inside `dir`.
	pub fn default_paths<P: AsRef<Path>>(dir: P) -> (PathBuf, PathBuf) {
		let folder = io::normalize_folder(dir);
		(folder.join(MODEL_FILE), folder.join(VOCABULARY_FILE))
	}

	/// Bundles already loaded artifacts.
	///
	/// # Errors
	/// Returns `LoadError::Mismatch` if the highest vocabulary id is not a
	/// valid output index of the model.
	pub fn new(name: String, model: LstmModel, vocabulary: Vocabulary) -> Result<Self, LoadError> {
		let output_size = model.output_size();
		if vocabulary.max_id() as usize >= output_size {
			return Err(LoadError::Mismatch { max_id: vocabulary.max_id(), output_size });
		}

		let artifacts = Self { name, model: Arc::new(model), vocabulary: Arc::new(vocabulary) };
		info!(
			"Artifacts '{}' ready: {} words, sequence length {}",
			artifacts.name,
			artifacts.vocabulary.len(),
			artifacts.model.input_width() + 1
		);
		Ok(artifacts)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn model(&self) -> &LstmModel {
		&self.model
	}

	/// Returns a predictor sharing the loaded model and vocabulary.
	pub fn predictor(&self) -> Predictor {
		Predictor::new(self.model.clone(), self.vocabulary.clone())
	}

	/// Summary of the loaded model.
	pub fn info(&self) -> ModelInfo {
		ModelInfo {
			name: self.name.clone(),
			architecture: "LSTM".to_owned(),
			vocabulary_size: self.vocabulary.len(),
			sequence_length: self.model.input_width() + 1,
			embedding_dim: self.model.embedding_dim(),
			lstm_units: self.model.layer_units(),
		}
	}
}
