pub mod completion;
pub mod models;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

use chambee_config::{API_STYLE_GEMINI, API_STYLE_OPENAI_CHAT, CompletionProviderConfig};

const GOOGLE_API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiStyle {
	OpenAiChat,
	Gemini,
}
impl ApiStyle {
	pub fn from_config(cfg: &CompletionProviderConfig) -> Result<Self> {
		match cfg.api_style.as_str() {
			API_STYLE_OPENAI_CHAT => Ok(Self::OpenAiChat),
			API_STYLE_GEMINI => Ok(Self::Gemini),
			other => Err(Error::InvalidConfig {
				message: format!("Unsupported completion api_style {other:?}."),
			}),
		}
	}

	pub fn headers(self, api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
		match self {
			Self::OpenAiChat => auth_headers(api_key, default_headers),
			Self::Gemini => google_headers(api_key, default_headers),
		}
	}
}

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	extend_default_headers(&mut headers, default_headers)?;

	Ok(headers)
}

pub fn google_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_static(GOOGLE_API_KEY_HEADER), api_key.parse()?);
	extend_default_headers(&mut headers, default_headers)?;

	Ok(headers)
}

fn extend_default_headers(
	headers: &mut HeaderMap,
	default_headers: &Map<String, Value>,
) -> Result<()> {
	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(())
}

pub(crate) fn http_client(cfg: &CompletionProviderConfig) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?)
}

pub(crate) fn endpoint(cfg: &CompletionProviderConfig, path: &str) -> String {
	format!("{}{}", cfg.api_base.trim_end_matches('/'), path)
}
