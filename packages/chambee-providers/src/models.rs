use serde_json::Value;

use chambee_config::CompletionProviderConfig;

use crate::{ApiStyle, Error, Result};

const GEMINI_GENERATE_METHOD: &str = "generateContent";
const MAX_PAGES: usize = 20;

/// Lists model names the configured endpoint can use for text generation.
pub async fn list_models(cfg: &CompletionProviderConfig) -> Result<Vec<String>> {
	let style = ApiStyle::from_config(cfg)?;
	let client = crate::http_client(cfg)?;
	let url = crate::endpoint(cfg, &cfg.models_path);
	let headers = style.headers(&cfg.api_key, &cfg.default_headers)?;
	let mut names = Vec::new();
	let mut page_token: Option<String> = None;

	for _ in 0..MAX_PAGES {
		let mut request = client.get(&url).headers(headers.clone());

		if let Some(token) = page_token.as_deref() {
			request = request.query(&[("pageToken", token)]);
		}

		let json: Value = request.send().await?.error_for_status()?.json().await?;
		let page = parse_models_page(style, &json)?;

		names.extend(page.names);

		match page.next_page_token {
			Some(token) => page_token = Some(token),
			None => break,
		}
	}

	Ok(names)
}

#[derive(Debug, Default, PartialEq)]
pub struct ModelsPage {
	pub names: Vec<String>,
	pub next_page_token: Option<String>,
}

pub fn parse_models_page(style: ApiStyle, json: &Value) -> Result<ModelsPage> {
	match style {
		ApiStyle::OpenAiChat => {
			let data = json.get("data").and_then(Value::as_array).ok_or_else(|| {
				Error::InvalidResponse { message: "Models response is missing data array.".to_string() }
			})?;
			let names = data
				.iter()
				.filter_map(|model| model.get("id").and_then(Value::as_str))
				.map(str::to_string)
				.collect();

			Ok(ModelsPage { names, next_page_token: None })
		},
		ApiStyle::Gemini => {
			let models = json.get("models").and_then(Value::as_array).ok_or_else(|| {
				Error::InvalidResponse {
					message: "Models response is missing models array.".to_string(),
				}
			})?;
			let names = models
				.iter()
				.filter(|model| supports_generation(model))
				.filter_map(|model| model.get("name").and_then(Value::as_str))
				.map(str::to_string)
				.collect();
			let next_page_token = json
				.get("nextPageToken")
				.and_then(Value::as_str)
				.filter(|token| !token.is_empty())
				.map(str::to_string);

			Ok(ModelsPage { names, next_page_token })
		},
	}
}

fn supports_generation(model: &Value) -> bool {
	model
		.get("supportedGenerationMethods")
		.and_then(Value::as_array)
		.map(|methods| methods.iter().any(|method| method.as_str() == Some(GEMINI_GENERATE_METHOD)))
		.unwrap_or(false)
}
