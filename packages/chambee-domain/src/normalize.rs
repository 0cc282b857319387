use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::filters::Gender;

const FEMALE_SYNONYMS: [&str; 3] = ["mujer", "femenino", "female"];
const MALE_SYNONYMS: [&str; 3] = ["hombre", "masculino", "male"];

/// Lower-cases, strips combining diacritics (á → a, ü → u, ñ → n) and trims.
pub fn canonicalize(input: &str) -> String {
	let lowered = input.to_lowercase();
	let stripped: String = lowered.nfd().filter(|ch| !is_combining_mark(*ch)).collect();

	stripped.trim().to_string()
}

/// Maps gender vocabulary to a canonical code. Unknown terms are kept in canonical form and
/// simply match nothing downstream.
pub fn normalize_gender(input: &str) -> Gender {
	let canonical = canonicalize(input);

	if FEMALE_SYNONYMS.contains(&canonical.as_str()) {
		return Gender::Female;
	}
	if MALE_SYNONYMS.contains(&canonical.as_str()) {
		return Gender::Male;
	}

	Gender::Unrecognized(canonical)
}
