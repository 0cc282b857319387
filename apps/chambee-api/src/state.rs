use std::sync::Arc;

use chambee_config::Config;
use chambee_service::ChambeeService;
use chambee_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ChambeeService>,
}
impl AppState {
	/// The pool connects lazily: an unreachable directory degrades chat replies instead of
	/// blocking startup.
	pub fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect_lazy(&config.storage.postgres)?;

		Ok(Self::from_service(ChambeeService::new(config, db)))
	}

	pub fn from_service(service: ChambeeService) -> Self {
		Self { service: Arc::new(service) }
	}
}
