use axum::{
	Json, Router,
	extract::State,
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};

use chambee_service::{ChatRequest, ChatResponse, Error};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_allowed_origins);

	Router::new()
		.route("/", get(root))
		.route("/health", get(health))
		.route("/api/chatbot/query", post(chat_query))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
	let origins: Vec<HeaderValue> =
		allowed_origins.iter().filter_map(|origin| origin.parse().ok()).collect();
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

	if origins.is_empty() { layer.allow_origin(Any) } else { layer.allow_origin(origins) }
}

async fn root() -> Json<Value> {
	Json(json!({ "message": "Chambee chatbot gateway is running." }))
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat_query(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state.service.chat(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, serde::Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } => ApiError::new(
				StatusCode::UNPROCESSABLE_ENTITY,
				"INVALID_REQUEST",
				message,
				Some(vec!["$.message".to_string()]),
			),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
