use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, VocabularyError};
use crate::io;

/// Characters removed from the text before splitting it into words.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Id reserved for padding. Never mapped to a word.
pub const PADDING_ID: u32 = 0;

/// Settings used to turn raw text into words, fixed at training time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TokenizerSettings {
	/// Lowercase the text before splitting.
	#[serde(default = "default_lower")]
	pub lower: bool,

	/// Word separator.
	#[serde(default = "default_split")]
	pub split: String,

	/// Every character of this string is replaced by `split`.
	#[serde(default = "default_filters")]
	pub filters: String,

	/// Only ids strictly below this limit are kept when tokenizing. `0` means no limit.
	#[serde(default)]
	pub num_words: Option<usize>,
}

fn default_lower() -> bool {
	true
}

fn default_split() -> String {
	" ".to_owned()
}

fn default_filters() -> String {
	DEFAULT_FILTERS.to_owned()
}

impl Default for TokenizerSettings {
	fn default() -> Self {
		Self {
			lower: default_lower(),
			split: default_split(),
			filters: default_filters(),
			num_words: None,
		}
	}
}

/// On-disk layout of the vocabulary artifact.
#[derive(Serialize, Deserialize)]
struct VocabularyFile {
	word_index: BTreeMap<String, u32>,
	#[serde(flatten)]
	settings: TokenizerSettings,
}

/// Bidirectional mapping between words and ids.
///
/// # Invariants
/// - Every word maps to exactly one id and every id to exactly one word
/// - Id `0` is never mapped (padding sentinel)
/// - The mapping is never empty
#[derive(Clone, Debug)]
pub struct Vocabulary {
	word_index: HashMap<String, u32>,
	index_word: HashMap<u32, String>,
	settings: TokenizerSettings,
	max_id: u32,
}

impl Vocabulary {
	/// Builds a vocabulary with the default tokenizer settings.
	///
	/// # Errors
	/// Returns an error if the pairs do not form a bijection over ids >= 1.
	pub fn new<I, S>(pairs: I) -> Result<Self, VocabularyError>
	where
		I: IntoIterator<Item = (S, u32)>,
		S: Into<String>,
	{
		Self::with_settings(pairs, TokenizerSettings::default())
	}

	/// Builds a vocabulary with explicit tokenizer settings.
	///
	/// Both directions are built once here, so lookups are O(1) afterwards.
	pub fn with_settings<I, S>(pairs: I, settings: TokenizerSettings) -> Result<Self, VocabularyError>
	where
		I: IntoIterator<Item = (S, u32)>,
		S: Into<String>,
	{
		let mut word_index: HashMap<String, u32> = HashMap::new();
		let mut index_word: HashMap<u32, String> = HashMap::new();
		let mut max_id = PADDING_ID;

		for (word, id) in pairs {
			let word: String = word.into();
			if word.is_empty() {
				return Err(VocabularyError::EmptyWord(id));
			}
			if id == PADDING_ID {
				return Err(VocabularyError::ReservedId(word));
			}
			if let Some(first) = index_word.get(&id) {
				if *first != word {
					return Err(VocabularyError::DuplicateId { id, first: first.clone(), second: word });
				}
			}
			if let Some(&first) = word_index.get(&word) {
				if first != id {
					return Err(VocabularyError::DuplicateWord { word, first, second: id });
				}
			}

			max_id = max_id.max(id);
			index_word.insert(id, word.clone());
			word_index.insert(word, id);
		}

		if word_index.is_empty() {
			return Err(VocabularyError::Empty);
		}

		Ok(Self { word_index, index_word, settings, max_id })
	}

	/// Loads a vocabulary from its JSON artifact.
	///
	/// Only `word_index` is mandatory, every tokenizer setting has a default.
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self, LoadError> {
		let path = filepath.as_ref();
		let contents = io::read_text(path)?;
		let file: VocabularyFile = serde_json::from_str(&contents)
			.map_err(|source| LoadError::Json { path: path.to_owned(), source })?;
		let vocabulary = Self::with_settings(file.word_index, file.settings)?;
		info!("Loaded vocabulary {} ({} words)", path.display(), vocabulary.len());
		Ok(vocabulary)
	}

	/// Writes the vocabulary as a JSON artifact readable by `load`.
	pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<(), LoadError> {
		let path = filepath.as_ref();
		let file = VocabularyFile {
			word_index: self.word_index.iter().map(|(w, id)| (w.clone(), *id)).collect(),
			settings: self.settings.clone(),
		};
		let json = serde_json::to_vec_pretty(&file)
			.map_err(|source| LoadError::Json { path: path.to_owned(), source })?;
		io::write_bytes(path, &json)
	}

	/// Returns the id of `word`, if known.
	pub fn id(&self, word: &str) -> Option<u32> {
		self.word_index.get(word).copied()
	}

	/// Returns the word mapped to `id`, if any. Never succeeds for id 0.
	pub fn word(&self, id: u32) -> Option<&str> {
		self.index_word.get(&id).map(String::as_str)
	}

	/// Number of words in the vocabulary.
	pub fn len(&self) -> usize {
		self.word_index.len()
	}

	/// Always false, an empty vocabulary cannot be built.
	pub fn is_empty(&self) -> bool {
		self.word_index.is_empty()
	}

	/// Highest id in the mapping.
	pub fn max_id(&self) -> u32 {
		self.max_id
	}

	/// Tokenizer settings fixed at training time.
	pub fn settings(&self) -> &TokenizerSettings {
		&self.settings
	}

	/// Splits `text` into words using the tokenizer settings.
	///
	/// Filtered characters act as separators and empty words are skipped.
	pub fn split_words(&self, text: &str) -> Vec<String> {
		let text = if self.settings.lower { text.to_lowercase() } else { text.to_owned() };
		let split = if self.settings.split.is_empty() { " " } else { self.settings.split.as_str() };

		let mut cleaned = String::with_capacity(text.len());
		for c in text.chars() {
			if self.settings.filters.contains(c) {
				cleaned.push_str(split);
			} else {
				cleaned.push(c);
			}
		}

		cleaned
			.split(split)
			.filter(|word| !word.is_empty())
			.map(str::to_owned)
			.collect()
	}

	/// Converts `text` into a sequence of ids.
	///
	/// Unknown words are dropped, not replaced. When `num_words` is set and
	/// non-zero, ids at or above the limit are dropped too.
	pub fn texts_to_sequence(&self, text: &str) -> Vec<u32> {
		self.split_words(text)
			.iter()
			.filter_map(|word| self.id(word))
			.filter(|id| match self.settings.num_words {
				Some(limit) if limit > 0 => (*id as usize) < limit,
				_ => true,
			})
			.collect()
	}

	/// Iterates over `(word, id)` pairs in no particular order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
		self.word_index.iter().map(|(w, id)| (w.as_str(), *id))
	}
}
