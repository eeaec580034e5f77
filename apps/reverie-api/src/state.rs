use std::sync::Arc;

use reverie_service::ReverieService;
use reverie_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ReverieService>,
}
impl AppState {
	pub async fn new(config: reverie_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(ReverieService::new(config, db)))
	}

	pub fn from_service(service: ReverieService) -> Self {
		Self { service: Arc::new(service) }
	}
}
