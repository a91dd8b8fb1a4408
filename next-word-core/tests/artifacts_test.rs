use std::fs;
use std::path::PathBuf;

use next_word_core::artifacts::{MODEL_FILE, VOCABULARY_FILE};
use next_word_core::model::lstm_model::{LstmLayer, FORMAT_VERSION};
use next_word_core::{Artifacts, LoadError, LstmModel, ModelError, Prediction, SequenceModel, Vocabulary};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

fn temp_dir(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("next_word_{}_{}", name, std::process::id()));
	fs::create_dir_all(&dir).unwrap();
	dir
}

fn hamlet() -> Vocabulary {
	Vocabulary::new([("to", 1), ("be", 2), ("or", 3), ("not", 4), ("to_be", 5)]).unwrap()
}

fn zero_layer(input_size: usize, units: usize) -> LstmLayer {
	LstmLayer::new(Array2::zeros((input_size, 4 * units)), Array2::zeros((units, 4 * units)), Array1::zeros(4 * units))
		.unwrap()
}

/// Zero network: the dense bias alone picks the output.
fn biased_model(input_width: usize, dense_bias: Vec<f32>) -> LstmModel {
	let vocab_size = dense_bias.len();
	LstmModel::from_parts(
		input_width,
		Array2::zeros((vocab_size, 4)),
		vec![zero_layer(4, 3)],
		Array2::zeros((3, vocab_size)),
		Array1::from(dense_bias),
	)
	.unwrap()
}

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<f32> {
	Array2::from_shape_fn((rows, cols), |_| rng.random_range(-1.0..1.0))
}

fn random_vector(rng: &mut StdRng, len: usize) -> Array1<f32> {
	Array1::from_shape_fn(len, |_| rng.random_range(-1.0..1.0))
}

/// Two stacked layers with random weights, like a trained network.
fn random_model(seed: u64, input_width: usize, vocab_size: usize) -> LstmModel {
	let mut rng = StdRng::seed_from_u64(seed);
	let (embedding_dim, first, second) = (6, 5, 4);
	let layers = vec![
		LstmLayer::new(
			random_matrix(&mut rng, embedding_dim, 4 * first),
			random_matrix(&mut rng, first, 4 * first),
			random_vector(&mut rng, 4 * first),
		)
		.unwrap(),
		LstmLayer::new(
			random_matrix(&mut rng, first, 4 * second),
			random_matrix(&mut rng, second, 4 * second),
			random_vector(&mut rng, 4 * second),
		)
		.unwrap(),
	];
	LstmModel::from_parts(
		input_width,
		random_matrix(&mut rng, vocab_size, embedding_dim),
		layers,
		random_matrix(&mut rng, second, vocab_size),
		random_vector(&mut rng, vocab_size),
	)
	.unwrap()
}

/// Wire layout of an `ndarray` matrix, written without building the array.
#[derive(Serialize)]
struct RawMatrix {
	v: u8,
	dim: [usize; 2],
	data: Vec<f32>,
}

/// Wire layout of an `ndarray` vector.
#[derive(Serialize)]
struct RawVector {
	v: u8,
	dim: [usize; 1],
	data: Vec<f32>,
}

#[derive(Serialize)]
struct RawLayer {
	kernel: RawMatrix,
	recurrent_kernel: RawMatrix,
	bias: RawVector,
}

fn zero_matrix(rows: usize, cols: usize) -> RawMatrix {
	RawMatrix { v: 1, dim: [rows, cols], data: vec![0.0; rows * cols] }
}

fn zero_vector(len: usize) -> RawVector {
	RawVector { v: 1, dim: [len], data: vec![0.0; len] }
}

#[test]
fn saved_artifacts_predict_the_same_word() {
	let dir = temp_dir("round_trip");
	biased_model(5, vec![0.0, 0.0, 0.0, 0.0, 0.0, 9.0]).save(dir.join(MODEL_FILE)).unwrap();
	hamlet().save(dir.join(VOCABULARY_FILE)).unwrap();

	let artifacts = Artifacts::from_dir(&dir).unwrap();
	assert_eq!(artifacts.name(), "next_word_lstm");
	let predictor = artifacts.predictor();
	assert_eq!(predictor.max_sequence_length(), 6);
	assert_eq!(predictor.predict("to be or not").unwrap(), Prediction::Word("to_be".to_owned()));
	assert_eq!(predictor.predict("").unwrap(), Prediction::NoTokensRecognized);

	let info = artifacts.info();
	assert_eq!(info.vocabulary_size, 5);
	assert_eq!(info.sequence_length, 6);
	assert_eq!(info.embedding_dim, 4);
	assert_eq!(info.lstm_units, vec![3]);

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn reloaded_vocabulary_keeps_mapping_and_settings() {
	let dir = temp_dir("vocabulary");
	let path = dir.join(VOCABULARY_FILE);
	let vocabulary = hamlet();
	vocabulary.save(&path).unwrap();

	let reloaded = Vocabulary::load(&path).unwrap();
	for (word, id) in vocabulary.iter() {
		assert_eq!(reloaded.id(word), Some(id));
		assert_eq!(reloaded.word(id), Some(word));
	}
	assert_eq!(reloaded.settings(), vocabulary.settings());

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_model_is_a_load_error() {
	let dir = temp_dir("missing");
	hamlet().save(dir.join(VOCABULARY_FILE)).unwrap();

	let err = Artifacts::from_dir(&dir).unwrap_err();
	assert!(matches!(err, LoadError::Io { path, .. } if path.ends_with(MODEL_FILE)));

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn vocabulary_larger_than_model_is_rejected() {
	let err = Artifacts::new("small".to_owned(), biased_model(3, vec![0.0; 4]), hamlet()).unwrap_err();
	assert!(matches!(err, LoadError::Mismatch { max_id: 5, output_size: 4 }));
}

#[test]
fn unknown_format_version_is_rejected() {
	let dir = temp_dir("version");
	let path = dir.join(MODEL_FILE);
	fs::write(&path, postcard::to_stdvec(&(FORMAT_VERSION + 1)).unwrap()).unwrap();

	let err = LstmModel::load(&path).unwrap_err();
	assert!(matches!(err, LoadError::UnsupportedVersion { found, .. } if found == FORMAT_VERSION + 1));

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn truncated_model_is_a_decode_error() {
	let dir = temp_dir("truncated");
	let path = dir.join(MODEL_FILE);
	biased_model(3, vec![0.0; 6]).save(&path).unwrap();
	let bytes = fs::read(&path).unwrap();
	fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

	assert!(matches!(LstmModel::load(&path), Err(LoadError::Decode { .. })));

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn overflowing_shape_is_a_decode_error() {
	let dir = temp_dir("overflow");
	let path = dir.join(MODEL_FILE);
	// rows * cols overflows usize, the buffer is empty
	let embedding = RawMatrix { v: 1, dim: [usize::MAX / 2 + 1, 2], data: Vec::new() };
	fs::write(&path, postcard::to_stdvec(&(FORMAT_VERSION, 2usize, embedding)).unwrap()).unwrap();

	assert!(matches!(LstmModel::load(&path), Err(LoadError::Decode { .. })));

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn inconsistent_shapes_are_rejected_on_load() {
	let dir = temp_dir("shapes");
	let path = dir.join(MODEL_FILE);
	let layer = RawLayer { kernel: zero_matrix(3, 8), recurrent_kernel: zero_matrix(2, 8), bias: zero_vector(8) };
	// dense kernel has 5 rows, the layer has 2 units
	let model = (FORMAT_VERSION, 2usize, zero_matrix(4, 3), vec![layer], zero_matrix(5, 4), zero_vector(4));
	fs::write(&path, postcard::to_stdvec(&model).unwrap()).unwrap();

	let err = LstmModel::load(&path).unwrap_err();
	assert!(matches!(err, LoadError::Model(ModelError::ShapeMismatch { name, .. }) if name == "dense kernel"));

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn invalid_vocabulary_json_is_reported() {
	let dir = temp_dir("json");
	let path = dir.join(VOCABULARY_FILE);
	fs::write(&path, r#"{"word_index": {"pad": 0}}"#).unwrap();
	assert!(matches!(Vocabulary::load(&path), Err(LoadError::Vocabulary(_))));

	fs::write(&path, "not json").unwrap();
	assert!(matches!(Vocabulary::load(&path), Err(LoadError::Json { .. })));

	fs::remove_dir_all(dir).unwrap();
}

#[test]
fn random_model_is_deterministic_and_normalized() {
	let model = random_model(42, 5, 6);
	let vocabulary = hamlet();
	let artifacts = Artifacts::new("random".to_owned(), model, vocabulary).unwrap();
	let predictor = artifacts.predictor();

	let first = predictor.predict("to be or not to be").unwrap();
	let second = predictor.predict("to be or not to be").unwrap();
	assert_eq!(first, second);

	let output = artifacts.model().predict(&[0, 0, 1, 2, 3]).unwrap();
	assert_eq!(output.len(), 6);
	let sum: f32 = output.iter().sum();
	assert!((sum - 1.0).abs() < 1e-4);
	assert!(output.iter().all(|p| *p >= 0.0));
}

#[test]
fn saved_random_model_gives_identical_outputs() {
	let dir = temp_dir("random_round_trip");
	let path = dir.join(MODEL_FILE);
	let model = random_model(7, 4, 6);
	model.save(&path).unwrap();
	let reloaded = LstmModel::load(&path).unwrap();

	let sequence = [0, 3, 1, 5];
	assert_eq!(model.predict(&sequence).unwrap(), reloaded.predict(&sequence).unwrap());

	fs::remove_dir_all(dir).unwrap();
}
