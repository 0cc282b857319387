use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::{canonicalize, normalize_gender};

pub const GENDER_FEMALE: &str = "female";
pub const GENDER_MALE: &str = "male";

pub const MIN_RATING_FLOOR: f64 = 1.0;
pub const MAX_RATING_FLOOR: f64 = 5.0;

// Spanish keys come first: they are what the system prompt asks the model to emit.
const PROFESSION_KEYS: [&str; 2] = ["oficio", "profession"];
const GENDER_KEYS: [&str; 2] = ["genero", "gender"];
const MIN_RATING_KEYS: [&str; 2] = ["puntuacion_minima", "min_rating"];
const MIN_COMPLETED_JOBS_KEYS: [&str; 2] = ["min_trabajos_realizados", "min_completed_jobs"];
const MIN_AGE_KEYS: [&str; 2] = ["edad_minima", "min_age"];
const MAX_AGE_KEYS: [&str; 2] = ["edad_maxima", "max_age"];
const GIVEN_NAME_KEYS: [&str; 2] = ["nombre", "given_name"];
const SURNAME_KEYS: [&str; 2] = ["apellido", "surname"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
	Male,
	Female,
	/// A term outside the synonym table, kept in canonical form.
	Unrecognized(String),
}
impl Gender {
	pub fn as_code(&self) -> &str {
		match self {
			Self::Male => GENDER_MALE,
			Self::Female => GENDER_FEMALE,
			Self::Unrecognized(raw) => raw.as_str(),
		}
	}
}
impl From<String> for Gender {
	fn from(value: String) -> Self {
		normalize_gender(&value)
	}
}
impl From<Gender> for String {
	fn from(value: Gender) -> Self {
		value.as_code().to_string()
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profession: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gender: Option<Gender>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_rating: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_completed_jobs: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_age: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_age: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub given_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub surname: Option<String>,
}
impl SearchFilters {
	/// Validates a model-produced filter object one field at a time. A field that fails
	/// validation is dropped and reported; the remaining fields are kept.
	pub fn from_payload(payload: &Value) -> ParsedFilters {
		let mut issues = Vec::new();
		let obj = match payload {
			Value::Null => return ParsedFilters { filters: Self::default(), issues },
			Value::Object(obj) => obj,
			_ => {
				issues.push(FilterIssue::new("$.data", "filter payload must be an object."));

				return ParsedFilters { filters: Self::default(), issues };
			},
		};
		let filters = Self {
			profession: read_field(obj, &PROFESSION_KEYS, &mut issues, parse_text),
			gender: read_field(obj, &GENDER_KEYS, &mut issues, parse_text)
				.map(|raw| normalize_gender(&raw)),
			min_rating: read_field(obj, &MIN_RATING_KEYS, &mut issues, parse_rating),
			min_completed_jobs: read_field(obj, &MIN_COMPLETED_JOBS_KEYS, &mut issues, parse_count),
			min_age: read_field(obj, &MIN_AGE_KEYS, &mut issues, parse_count),
			max_age: read_field(obj, &MAX_AGE_KEYS, &mut issues, parse_count),
			given_name: read_field(obj, &GIVEN_NAME_KEYS, &mut issues, parse_text),
			surname: read_field(obj, &SURNAME_KEYS, &mut issues, parse_text),
		};

		ParsedFilters { filters, issues }
	}

	pub fn present_count(&self) -> usize {
		[
			self.profession.is_some(),
			self.gender.is_some(),
			self.min_rating.is_some(),
			self.min_completed_jobs.is_some(),
			self.min_age.is_some(),
			self.max_age.is_some(),
			self.given_name.is_some(),
			self.surname.is_some(),
		]
		.into_iter()
		.filter(|present| *present)
		.count()
	}

	pub fn is_empty(&self) -> bool {
		self.present_count() == 0
	}

	pub fn is_profession_only(&self) -> bool {
		self.profession.is_some() && self.present_count() == 1
	}
}

#[derive(Clone, Debug, Default)]
pub struct ParsedFilters {
	pub filters: SearchFilters,
	pub issues: Vec<FilterIssue>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterIssue {
	pub path: String,
	pub message: String,
}
impl FilterIssue {
	fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self { path: path.into(), message: message.into() }
	}
}
impl Display for FilterIssue {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.path, self.message)
	}
}

fn read_field<T>(
	obj: &Map<String, Value>,
	keys: &[&str],
	issues: &mut Vec<FilterIssue>,
	parse: fn(&Value) -> Result<Option<T>, String>,
) -> Option<T> {
	let (key, value) = keys.iter().find_map(|key| obj.get(*key).map(|value| (*key, value)))?;

	match parse(value) {
		Ok(parsed) => parsed,
		Err(message) => {
			issues.push(FilterIssue::new(format!("$.data.{key}"), message));

			None
		},
	}
}

fn parse_text(value: &Value) -> Result<Option<String>, String> {
	match value {
		Value::Null => Ok(None),
		Value::String(raw) => {
			let canonical = canonicalize(raw);

			Ok((!canonical.is_empty()).then_some(canonical))
		},
		_ => Err("must be a string.".to_string()),
	}
}

fn parse_count(value: &Value) -> Result<Option<u32>, String> {
	let Some(number) = parse_number(value)? else {
		return Ok(None);
	};

	if number.fract() != 0.0 {
		return Err("must be a whole number.".to_string());
	}
	if number < 0.0 {
		return Err("must be zero or greater.".to_string());
	}
	if number > f64::from(u32::MAX) {
		return Err("is too large.".to_string());
	}

	Ok(Some(number as u32))
}

fn parse_rating(value: &Value) -> Result<Option<f64>, String> {
	let Some(number) = parse_number(value)? else {
		return Ok(None);
	};

	if !(MIN_RATING_FLOOR..=MAX_RATING_FLOOR).contains(&number) {
		return Err(format!("must be between {MIN_RATING_FLOOR} and {MAX_RATING_FLOOR}."));
	}

	Ok(Some(number))
}

fn parse_number(value: &Value) -> Result<Option<f64>, String> {
	let number = match value {
		Value::Null => return Ok(None),
		Value::Number(number) => number.as_f64(),
		Value::String(raw) if raw.trim().is_empty() => return Ok(None),
		Value::String(raw) => raw.trim().replace(',', ".").parse::<f64>().ok(),
		_ => None,
	};

	match number {
		Some(number) if number.is_finite() => Ok(Some(number)),
		_ => Err("must be a number.".to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_strings_are_accepted() {
		assert_eq!(parse_count(&Value::String(" 12 ".to_string())), Ok(Some(12)));
		assert_eq!(parse_rating(&Value::String("4,5".to_string())), Ok(Some(4.5)));
	}

	#[test]
	fn integral_floats_count_as_whole_numbers() {
		assert_eq!(parse_count(&serde_json::json!(30.0)), Ok(Some(30)));
		assert!(parse_count(&serde_json::json!(30.5)).is_err());
		assert!(parse_count(&serde_json::json!(-1)).is_err());
	}
}
