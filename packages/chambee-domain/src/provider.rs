use serde::{Deserialize, Serialize};

/// One row of the provider directory as shown to the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
	pub id: String,
	pub given_name: String,
	pub surname: String,
	pub photo_url: Option<String>,
	pub professions: Vec<String>,
	pub summary: Option<String>,
	pub rating: f64,
}

/// Rounds an average rating to one decimal place.
pub fn round_rating(value: f64) -> f64 {
	(value * 10.0).round() / 10.0
}
