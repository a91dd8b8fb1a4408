//! Sequence models used by the inference procedure.
//!
//! This module provides:
//! - The `SequenceModel` trait, the only thing the predictor relies on
//! - An inference-only LSTM model (`LstmModel`) loadable from disk
//! - Internal layers and activation helpers

/// Trait implemented by every model able to score the next token.
pub mod sequence_model;

/// Embedding -> stacked LSTM -> dense softmax network.
///
/// Supports loading from and saving to a postcard artifact,
/// shape validation and a single-sequence forward pass.
pub mod lstm_model;

/// Internal representation of one LSTM layer.
///
/// Holds the kernels and runs the recurrence over a sequence.
/// This module is not exposed publicly.
mod lstm_layer;

/// Activation functions shared by the layers.
mod activation;
