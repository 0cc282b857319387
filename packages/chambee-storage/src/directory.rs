use sqlx::PgConnection;

use chambee_domain::{ProviderRecord, SearchFilters};

use crate::{Result, db::Db, models::ProviderRow};

const SELECT_PROVIDERS: &str = "\
WITH avg_ratings AS (
	SELECT target_account_id, AVG(score::float8) AS avg_rating
	FROM ratings
	WHERE author_role = 'client'
	GROUP BY target_account_id
),
account_professions AS (
	SELECT account_id, array_agg(profession_name::text ORDER BY profession_name) AS professions
	FROM professions
	GROUP BY account_id
)
SELECT
	a.account_id::text AS id,
	a.given_name::text AS given_name,
	a.surname::text AS surname,
	p.photo_url::text AS photo_url,
	p.professional_summary::text AS summary,
	COALESCE(ap.professions, ARRAY[]::text[]) AS professions,
	COALESCE(r.avg_rating, 0)::float8 AS avg_rating
FROM accounts a
LEFT JOIN profiles p ON p.account_id = a.account_id
LEFT JOIN account_professions ap ON ap.account_id = a.account_id
LEFT JOIN avg_ratings r ON r.target_account_id = a.account_id
WHERE a.status = 'active'
	AND a.role_id IN (2, 3)";
const ORDER_BY_RATING: &str = "\nORDER BY avg_rating DESC, a.account_id ASC";

/// A value bound to one `$n` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryArg {
	Text(String),
	Int(i64),
	Float(f64),
}

/// Parameterized directory search. Filter values only ever travel in `args`; `sql` holds
/// placeholders. Assembled by hand instead of through `sqlx::QueryBuilder` so the statement and its
/// arguments can be inspected before execution.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectoryQuery {
	pub sql: String,
	pub args: Vec<QueryArg>,
}
impl DirectoryQuery {
	pub fn for_filters(filters: &SearchFilters) -> Self {
		let mut query = Self { sql: SELECT_PROVIDERS.to_string(), args: Vec::new() };

		if let Some(profession) = filters.profession.as_deref() {
			let p = query.bind(QueryArg::Text(contains_pattern(profession)));

			query.and(&format!(
				"unaccent(array_to_string(ap.professions, ' ')) ILIKE unaccent({p})"
			));
		}
		if let Some(gender) = filters.gender.as_ref() {
			let p = query.bind(QueryArg::Text(gender.as_code().to_string()));

			query.and(&format!("a.gender = {p}"));
		}
		if let Some(min_jobs) = filters.min_completed_jobs {
			let p = query.bind(QueryArg::Int(i64::from(min_jobs)));

			query.and(&format!("a.completed_jobs >= {p}"));
		}
		if filters.min_age.is_some() || filters.max_age.is_some() {
			query.and("a.birth_date IS NOT NULL");
		}
		if let Some(min_age) = filters.min_age {
			let p = query.bind(QueryArg::Int(i64::from(min_age)));

			query.and(&format!("EXTRACT(YEAR FROM age(CURRENT_DATE, a.birth_date))::int >= {p}"));
		}
		if let Some(max_age) = filters.max_age {
			let p = query.bind(QueryArg::Int(i64::from(max_age)));

			query.and(&format!("EXTRACT(YEAR FROM age(CURRENT_DATE, a.birth_date))::int <= {p}"));
		}
		if let Some(min_rating) = filters.min_rating {
			let p = query.bind(QueryArg::Float(min_rating));

			query.and(&format!("COALESCE(r.avg_rating, 0) >= {p}"));
		}
		if let Some(given_name) = filters.given_name.as_deref() {
			let p = query.bind(QueryArg::Text(contains_pattern(given_name)));

			query.and(&format!("unaccent(a.given_name) ILIKE unaccent({p})"));
		}
		if let Some(surname) = filters.surname.as_deref() {
			let p = query.bind(QueryArg::Text(contains_pattern(surname)));

			query.and(&format!("unaccent(a.surname) ILIKE unaccent({p})"));
		}

		query.sql.push_str(ORDER_BY_RATING);

		query
	}

	pub async fn fetch_all(&self, conn: &mut PgConnection) -> Result<Vec<ProviderRow>> {
		let mut query = sqlx::query_as::<_, ProviderRow>(&self.sql);

		for arg in &self.args {
			query = match arg {
				QueryArg::Text(value) => query.bind(value.as_str()),
				QueryArg::Int(value) => query.bind(*value),
				QueryArg::Float(value) => query.bind(*value),
			};
		}

		Ok(query.fetch_all(conn).await?)
	}

	fn bind(&mut self, arg: QueryArg) -> String {
		self.args.push(arg);

		format!("${}", self.args.len())
	}

	fn and(&mut self, predicate: &str) {
		self.sql.push_str("\n\tAND ");
		self.sql.push_str(predicate);
	}
}

/// Runs one directory search on a connection taken from the pool for this call only.
pub async fn search_providers(db: &Db, filters: &SearchFilters) -> Result<Vec<ProviderRecord>> {
	let query = DirectoryQuery::for_filters(filters);
	let mut conn = db.pool.acquire().await?;
	let rows = query.fetch_all(&mut conn).await?;

	Ok(rows.into_iter().map(ProviderRecord::from).collect())
}

fn contains_pattern(value: &str) -> String {
	format!("%{}%", escape_like(value))
}

fn escape_like(value: &str) -> String {
	let mut out = String::with_capacity(value.len());

	for ch in value.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
