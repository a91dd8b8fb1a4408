//! Next-word prediction library.
//!
//! This crate provides everything needed to turn a short text prefix into
//! the most likely next word, including:
//! - A fitted vocabulary (word <-> id) with its tokenizer settings
//! - Sequence preparation (tokenize, truncate, left-pad)
//! - A sequence model abstraction and an inference-only LSTM model
//! - The next-word inference procedure itself
//! - Artifact loading for the presentation layers
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Error types shared by every component of the crate.
pub mod error;

/// Word <-> id mapping and text tokenization.
pub mod vocabulary;

/// Truncation and padding of token sequences to the model input width.
pub mod sequence;

/// Sequence models (trait and the LSTM implementation).
pub mod model;

/// The next-word inference procedure and the `Predictor` bundle.
pub mod predictor;

/// Loading of the model and vocabulary artifacts from disk.
pub mod artifacts;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use artifacts::{Artifacts, ModelInfo};
pub use error::{LoadError, ModelError, PredictError, VocabularyError};
pub use model::lstm_model::LstmModel;
pub use model::sequence_model::SequenceModel;
pub use predictor::{predict_next_word, Prediction, Predictor};
pub use vocabulary::Vocabulary;
