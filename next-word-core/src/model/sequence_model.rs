use crate::error::ModelError;

/// A trained model scoring the next token of a sequence.
///
/// Implementations are read-only at inference time, which is why a single
/// loaded model can be shared between threads.
pub trait SequenceModel: Send + Sync {
	/// Number of ids the model expects in one input sequence.
	fn input_width(&self) -> usize;

	/// Length of the probability vector (vocabulary size plus padding slot).
	fn output_size(&self) -> usize;

	/// Runs one forward pass on a single padded sequence.
	///
	/// Returns a probability vector of length `output_size()`.
	fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>, ModelError>;
}

impl<M: SequenceModel + ?Sized> SequenceModel for Box<M> {
	fn input_width(&self) -> usize {
		(**self).input_width()
	}

	fn output_size(&self) -> usize {
		(**self).output_size()
	}

	fn predict(&self, sequence: &[u32]) -> Result<Vec<f32>, ModelError> {
		(**self).predict(sequence)
	}
}
