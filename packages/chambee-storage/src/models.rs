use chambee_domain::{ProviderRecord, provider::round_rating};

#[derive(Debug, sqlx::FromRow)]
pub struct ProviderRow {
	pub id: String,
	pub given_name: String,
	pub surname: String,
	pub photo_url: Option<String>,
	pub summary: Option<String>,
	pub professions: Vec<String>,
	pub avg_rating: f64,
}
impl From<ProviderRow> for ProviderRecord {
	fn from(row: ProviderRow) -> Self {
		Self {
			id: row.id,
			given_name: row.given_name,
			surname: row.surname,
			photo_url: row.photo_url,
			professions: row.professions,
			summary: row.summary,
			rating: round_rating(row.avg_rating),
		}
	}
}
