use chambee_config::Postgres;
use chambee_domain::{Gender, SearchFilters};
use chambee_storage::{db::Db, directory};
use chambee_testkit::TestDatabase;

const SEED_SQL: &str = "\
INSERT INTO accounts (account_id, given_name, surname, role_id, status, birth_date, gender, completed_jobs) VALUES
	(1, 'José', 'Muñoz', 2, 'active', CURRENT_DATE - INTERVAL '40 years', 'male', 12),
	(2, 'Ana', 'Pérez', 3, 'active', CURRENT_DATE - INTERVAL '29 years', 'female', 3),
	(3, 'Luis', 'Soto', 2, 'active', NULL, 'male', 30),
	(4, 'Rosa', 'Díaz', 2, 'inactive', CURRENT_DATE - INTERVAL '35 years', 'female', 50),
	(5, 'Pedro', 'Lagos', 1, 'active', CURRENT_DATE - INTERVAL '33 years', 'male', 8),
	(6, 'Marta', 'Vera', 2, 'active', CURRENT_DATE - INTERVAL '45 years', 'female', 0);
INSERT INTO professions (account_id, profession_name) VALUES
	(1, 'Electricidad'),
	(1, 'Gasfitería'),
	(2, 'Electricidad'),
	(3, 'Electricidad'),
	(4, 'Electricidad'),
	(5, 'Electricidad'),
	(6, 'Pintura');
INSERT INTO profiles (account_id, photo_url, professional_summary) VALUES
	(1, 'https://cdn.example.com/1.jpg', 'Instalaciones domiciliarias.'),
	(2, NULL, NULL);
INSERT INTO ratings (target_account_id, author_role, score) VALUES
	(1, 'client', 5),
	(1, 'client', 4),
	(1, 'provider', 1),
	(2, 'client', 5),
	(3, 'client', 3),
	(4, 'client', 5),
	(5, 'client', 5);";

async fn seeded_db(test_db: &TestDatabase) -> Db {
	test_db.load_directory_schema().await.expect("Failed to load directory schema.");

	let mut conn = test_db.connect().await.expect("Failed to connect to test database.");

	sqlx::raw_sql(SEED_SQL).execute(&mut conn).await.expect("Failed to seed directory.");

	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2, acquire_timeout_ms: 5_000 };

	Db::connect(&cfg).await.expect("Failed to connect to Postgres.")
}

#[tokio::test]
#[ignore = "Requires external Postgres with the unaccent extension. Set CHAMBEE_PG_DSN to run."]
async fn profession_search_orders_by_client_rating() {
	let Some(base_dsn) = chambee_testkit::env_dsn() else {
		eprintln!(
			"Skipping profession_search_orders_by_client_rating; set CHAMBEE_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let filters = SearchFilters { profession: Some("electricidad".to_string()), ..Default::default() };
	let records = directory::search_providers(&db, &filters).await.expect("Search failed.");
	let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();

	// Inactive accounts and clients are excluded. Provider-authored ratings do not count.
	assert_eq!(ids, vec!["2", "1", "3"]);
	assert_eq!(records[1].rating, 4.5);
	assert_eq!(records[1].professions, vec!["Electricidad".to_string(), "Gasfitería".to_string()]);
	assert_eq!(records[1].photo_url.as_deref(), Some("https://cdn.example.com/1.jpg"));
	assert_eq!(records[0].summary, None);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with the unaccent extension. Set CHAMBEE_PG_DSN to run."]
async fn accent_insensitive_filters_combine() {
	let Some(base_dsn) = chambee_testkit::env_dsn() else {
		eprintln!("Skipping accent_insensitive_filters_combine; set CHAMBEE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let by_surname = SearchFilters {
		profession: Some("gasfiteria".to_string()),
		surname: Some("munoz".to_string()),
		..Default::default()
	};
	let records = directory::search_providers(&db, &by_surname).await.expect("Search failed.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].given_name, "José");

	let by_age = SearchFilters {
		profession: Some("electricidad".to_string()),
		gender: Some(Gender::Male),
		min_age: Some(30),
		max_age: Some(45),
		min_rating: Some(4.0),
		..Default::default()
	};
	let records = directory::search_providers(&db, &by_age).await.expect("Search failed.");
	let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();

	assert_eq!(ids, vec!["1"]);

	let hostile = SearchFilters {
		profession: Some("%' OR '1'='1".to_string()),
		..Default::default()
	};
	let records = directory::search_providers(&db, &hostile).await.expect("Search failed.");

	assert!(records.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres with the unaccent extension. Set CHAMBEE_PG_DSN to run."]
async fn empty_filters_list_every_active_provider() {
	let Some(base_dsn) = chambee_testkit::env_dsn() else {
		eprintln!(
			"Skipping empty_filters_list_every_active_provider; set CHAMBEE_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = seeded_db(&test_db).await;
	let records =
		directory::search_providers(&db, &SearchFilters::default()).await.expect("Search failed.");
	let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();

	// Marta has no ratings and sorts last at 0.0.
	assert_eq!(ids, vec!["2", "1", "3", "6"]);
	assert_eq!(records[3].rating, 0.0);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
