pub mod chat;

mod error;

pub use chat::{ChatRequest, ChatResponse};
pub use error::Error;

use std::{future::Future, pin::Pin, sync::Arc};

use chambee_config::{CompletionProviderConfig, Config};
use chambee_domain::{ConversationTurn, ProviderRecord, SearchFilters};
use chambee_providers::completion;
use chambee_storage::{db::Db, directory};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		turns: &'a [ConversationTurn],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait DirectoryStore
where
	Self: Send + Sync,
{
	fn search_providers<'a>(
		&'a self,
		filters: &'a SearchFilters,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ProviderRecord>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
		Self { completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { completion: Arc::new(DefaultProviders) }
	}
}

struct DefaultProviders;
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		turns: &'a [ConversationTurn],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(completion::complete(cfg, turns).await?) })
	}
}

impl DirectoryStore for Db {
	fn search_providers<'a>(
		&'a self,
		filters: &'a SearchFilters,
	) -> BoxFuture<'a, color_eyre::Result<Vec<ProviderRecord>>> {
		Box::pin(async move { Ok(directory::search_providers(self, filters).await?) })
	}
}

pub struct ChambeeService {
	pub cfg: Config,
	pub directory: Arc<dyn DirectoryStore>,
	pub providers: Providers,
}
impl ChambeeService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, directory: Arc::new(db), providers: Providers::default() }
	}

	pub fn with_parts(
		cfg: Config,
		directory: Arc<dyn DirectoryStore>,
		providers: Providers,
	) -> Self {
		Self { cfg, directory, providers }
	}
}
