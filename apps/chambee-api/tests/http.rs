use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use chambee_api::{routes, state::AppState};
use chambee_config::{
	API_STYLE_OPENAI_CHAT, CompletionProviderConfig, Config, Conversation, Postgres, Providers,
	Service, Storage,
};
use chambee_domain::{ConversationTurn, ProviderRecord, SearchFilters};
use chambee_service::{BoxFuture, ChambeeService, CompletionProvider, DirectoryStore};

fn test_config(cors_allowed_origins: Vec<String>) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			cors_allowed_origins,
		},
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://localhost/chambee".to_string(),
				pool_max_conns: 1,
				acquire_timeout_ms: 1_000,
			},
		},
		providers: Providers {
			completion: CompletionProviderConfig {
				provider_id: "test".to_string(),
				api_style: API_STYLE_OPENAI_CHAT.to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				api_key_env: None,
				path: "/v1/chat/completions".to_string(),
				models_path: "/v1/models".to_string(),
				model: "test-model".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		conversation: Conversation { max_message_chars: 500 },
	}
}

struct CannedCompletion {
	reply: String,
}
impl CompletionProvider for CannedCompletion {
	fn complete<'a>(
		&'a self,
		_cfg: &'a CompletionProviderConfig,
		_turns: &'a [ConversationTurn],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(self.reply.clone()) })
	}
}

struct StaticDirectory {
	calls: AtomicUsize,
}
impl DirectoryStore for StaticDirectory {
	fn search_providers<'a>(
		&'a self,
		_filters: &'a SearchFilters,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ProviderRecord>>> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			Ok(vec![ProviderRecord {
				id: "12".to_string(),
				given_name: "Camila".to_string(),
				surname: "Fuentes".to_string(),
				photo_url: Some("https://cdn.example.com/12.jpg".to_string()),
				professions: vec!["Gasfitería".to_string()],
				summary: Some("Reparaciones y mantención.".to_string()),
				rating: 4.9,
			}])
		})
	}
}

fn app_with(reply: &str, cors_allowed_origins: Vec<String>) -> (Router, Arc<StaticDirectory>) {
	let directory = Arc::new(StaticDirectory { calls: AtomicUsize::new(0) });
	let service = ChambeeService::with_parts(
		test_config(cors_allowed_origins),
		directory.clone(),
		chambee_service::Providers::new(Arc::new(CannedCompletion { reply: reply.to_string() })),
	);

	(routes::router(AppState::from_service(service)), directory)
}

async fn read_json(response: axum::response::Response) -> Value {
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	serde_json::from_slice(&body).expect("Failed to parse response.")
}

fn post_chat(payload: Value) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/api/chatbot/query")
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let (app, _) = app_with("{}", Vec::new());
	let response = app
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_reports_status_message() {
	let (app, _) = app_with("{}", Vec::new());
	let response = app
		.oneshot(Request::builder().uri("/").body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = read_json(response).await;

	assert!(json["message"].as_str().is_some_and(|message| !message.is_empty()));
}

#[tokio::test]
async fn chat_query_returns_results_and_history() {
	let reply = serde_json::json!({
		"respuesta_texto": "Buscando gasfíteres.",
		"intent": "search_provider",
		"data": { "oficio": "Gasfitería" }
	})
	.to_string();
	let (app, directory) = app_with(&reply, Vec::new());
	let response = app
		.oneshot(post_chat(serde_json::json!({
			"mensaje": "necesito un gasfíter",
			"session_id": "abc",
			"history": [{ "role": "model", "parts": [{ "text": "" }] }]
		})))
		.await
		.expect("Failed to call chat query.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = read_json(response).await;

	assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
	assert_eq!(json["intent"], "search_provider");
	assert_eq!(json["filters"]["profession"], "gasfiteria");
	assert_eq!(json["results"][0]["id"], "12");
	assert_eq!(json["results"][0]["rating"], 4.9);
	assert_eq!(json["history"].as_array().map(Vec::len), Some(2));
	assert_eq!(json["history"][0]["role"], "user");
	assert_eq!(json["history"][1]["role"], "assistant");
	assert_eq!(json["history"][1]["parts"][0]["text"], "Buscando gasfíteres.");
}

#[tokio::test]
async fn blank_message_is_unprocessable() {
	let (app, directory) = app_with("{}", Vec::new());
	let response = app
		.oneshot(post_chat(serde_json::json!({ "message": "   " })))
		.await
		.expect("Failed to call chat query.");

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

	let json = read_json(response).await;

	assert_eq!(json["error_code"], "INVALID_REQUEST");
	assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cors_allows_configured_origin() {
	let (app, _) = app_with("{}", vec!["https://chambee.example".to_string()]);
	let response = app
		.oneshot(
			Request::builder()
				.method("OPTIONS")
				.uri("/api/chatbot/query")
				.header("origin", "https://chambee.example")
				.header("access-control-request-method", "POST")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to send preflight.");

	assert_eq!(
		response.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
		Some("https://chambee.example")
	);
}
