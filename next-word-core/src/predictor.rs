use std::fmt;
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{ModelError, PredictError};
use crate::model::sequence_model::SequenceModel;
use crate::sequence::prepare_sequence;
use crate::vocabulary::Vocabulary;

/// Diagnostic returned when no input word is in the vocabulary.
pub const NO_TOKENS_RECOGNIZED: &str = "no tokens recognized";

/// Diagnostic returned when the most likely id has no word.
pub const UNMAPPED_ID: &str = "predicted id not in vocabulary";

/// Outcome of one next-word prediction.
///
/// Diagnostics are ordinary outcomes meaning "no prediction", not failures.
/// `Display` renders the word or the fixed diagnostic text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prediction {
	Word(String),
	NoTokensRecognized,
	UnmappedId(u32),
}

impl Prediction {
	/// Returns the predicted word, if any.
	pub fn word(&self) -> Option<&str> {
		match self {
			Prediction::Word(word) => Some(word),
			_ => None,
		}
	}

	pub fn is_word(&self) -> bool {
		matches!(self, Prediction::Word(_))
	}
}

impl fmt::Display for Prediction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Prediction::Word(word) => f.write_str(word),
			Prediction::NoTokensRecognized => f.write_str(NO_TOKENS_RECOGNIZED),
			Prediction::UnmappedId(_) => f.write_str(UNMAPPED_ID),
		}
	}
}

/// Index of the largest value, the first one on ties.
///
/// NaN compares as the largest value, so the first NaN wins if there is one.
/// Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
	let mut best: Option<(usize, f32)> = None;
	for (index, &value) in values.iter().enumerate() {
		if value.is_nan() {
			return Some(index);
		}
		match best {
			Some((_, max)) if value <= max => {}
			_ => best = Some((index, value)),
		}
	}
	best.map(|(index, _)| index)
}

/// Predicts the word following `text`.
///
/// `max_sequence_length` is the model input width plus one. The input is
/// normalized, tokenized, truncated to its most recent ids, left-padded,
/// then scored with a single forward pass.
///
/// # Errors
/// - `max_sequence_length < 2`
/// - the forward pass fails or returns an empty vector
pub fn predict_next_word<M: SequenceModel + ?Sized>(
	model: &M,
	vocabulary: &Vocabulary,
	text: &str,
	max_sequence_length: usize,
) -> Result<Prediction, PredictError> {
	if max_sequence_length < 2 {
		return Err(PredictError::InvalidSequenceLength(max_sequence_length));
	}

	let sequence = match prepare_sequence(vocabulary, text, max_sequence_length) {
		Some(sequence) => sequence,
		None => {
			warn!("No known word in input {:?}", text);
			return Ok(Prediction::NoTokensRecognized);
		}
	};

	let probabilities = model.predict(&sequence)?;
	let id = argmax(&probabilities).ok_or(ModelError::EmptyOutput)? as u32;

	match vocabulary.word(id) {
		Some(word) => {
			debug!("{:?} -> {:?} (id {id}, p={:.4})", text, word, probabilities[id as usize]);
			Ok(Prediction::Word(word.to_owned()))
		}
		None => {
			warn!("Predicted id {id} is not in the vocabulary");
			Ok(Prediction::UnmappedId(id))
		}
	}
}

/// A loaded model and its vocabulary, ready to answer predictions.
///
/// Both values are immutable once built and shared through `Arc`, so one
/// `Predictor` can serve every request of a process.
#[derive(Clone)]
pub struct Predictor {
	model: Arc<dyn SequenceModel>,
	vocabulary: Arc<Vocabulary>,
}

impl Predictor {
	pub fn new(model: Arc<dyn SequenceModel>, vocabulary: Arc<Vocabulary>) -> Self {
		Self { model, vocabulary }
	}

	/// Input width of the model plus the predicted slot.
	pub fn max_sequence_length(&self) -> usize {
		self.model.input_width() + 1
	}

	pub fn model(&self) -> &dyn SequenceModel {
		self.model.as_ref()
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	/// Runs `predict_next_word` with the bundled model and vocabulary.
	pub fn predict(&self, text: &str) -> Result<Prediction, PredictError> {
		predict_next_word(self.model.as_ref(), &self.vocabulary, text, self.max_sequence_length())
	}
}

impl fmt::Debug for Predictor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Predictor")
			.field("max_sequence_length", &self.max_sequence_length())
			.field("vocabulary_size", &self.vocabulary.len())
			.finish()
	}
}
