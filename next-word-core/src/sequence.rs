use crate::vocabulary::{Vocabulary, PADDING_ID};

/// Normalizes raw user text: lowercase, surrounding whitespace removed.
pub fn normalize(text: &str) -> String {
	text.trim().to_lowercase()
}

/// Fits `ids` to exactly `width` entries.
///
/// - Longer sequences keep their last `width` ids (most recent context)
/// - Shorter sequences are left-padded with the padding id
pub fn pad_sequence(ids: &[u32], width: usize) -> Vec<u32> {
	let kept = &ids[ids.len().saturating_sub(width)..];
	let mut padded = Vec::with_capacity(width);
	padded.resize(width - kept.len(), PADDING_ID);
	padded.extend_from_slice(kept);
	padded
}

/// Builds the model input for `text`.
///
/// Returns `None` when no word of `text` is in the vocabulary.
/// Otherwise the result always holds `max_sequence_length - 1` ids.
///
/// `max_sequence_length` must be >= 2, this is checked by the caller.
pub fn prepare_sequence(vocabulary: &Vocabulary, text: &str, max_sequence_length: usize) -> Option<Vec<u32>> {
	let ids = vocabulary.texts_to_sequence(&normalize(text));
	if ids.is_empty() {
		return None;
	}
	Some(pad_sequence(&ids, max_sequence_length - 1))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn vocabulary() -> Vocabulary {
		Vocabulary::new([("to", 1), ("be", 2), ("or", 3), ("not", 4)]).unwrap()
	}

	#[test]
	fn short_sequence_is_left_padded() {
		assert_eq!(pad_sequence(&[1, 2], 5), vec![0, 0, 0, 1, 2]);
	}

	#[test]
	fn long_sequence_keeps_most_recent() {
		assert_eq!(pad_sequence(&[1, 2, 3, 4, 1, 2], 4), vec![3, 4, 1, 2]);
	}

	#[test]
	fn exact_width_is_untouched() {
		assert_eq!(pad_sequence(&[4, 3, 2], 3), vec![4, 3, 2]);
	}

	#[test]
	fn unrecognized_text_has_no_sequence() {
		assert_eq!(prepare_sequence(&vocabulary(), "", 5), None);
		assert_eq!(prepare_sequence(&vocabulary(), "   ", 5), None);
		assert_eq!(prepare_sequence(&vocabulary(), "whither wilt thou", 5), None);
	}

	#[test]
	fn text_is_normalized_before_lookup() {
		assert_eq!(prepare_sequence(&vocabulary(), "  TO Be ", 4), Some(vec![0, 1, 2]));
	}

	proptest! {
		#[test]
		fn padding_leaves_leading_sentinels(ids in prop::collection::vec(1u32..100, 0..20), width in 1usize..30) {
			prop_assume!(ids.len() < width);
			let padded = pad_sequence(&ids, width);
			prop_assert_eq!(padded.len(), width);
			let pad = width - ids.len();
			prop_assert!(padded[..pad].iter().all(|id| *id == PADDING_ID));
			prop_assert_eq!(&padded[pad..], ids.as_slice());
		}

		#[test]
		fn truncation_keeps_last_ids(ids in prop::collection::vec(1u32..100, 1..40), width in 1usize..20) {
			prop_assume!(ids.len() > width);
			let padded = pad_sequence(&ids, width);
			prop_assert_eq!(padded.as_slice(), &ids[ids.len() - width..]);
			prop_assert!(padded.iter().all(|id| *id != PADDING_ID));
		}
	}
}
