use std::sync::Arc;

use amo_service::AnalyticsService;

#[derive(Clone)]
pub struct AppState {
	/// `None` when the search integration is disabled.
	pub service: Option<Arc<AnalyticsService>>,
}
impl AppState {
	pub fn new(config: &amo_config::Config) -> color_eyre::Result<Self> {
		if !config.search.enabled {
			tracing::warn!("Search integration is disabled; AIP endpoints will answer 503.");

			return Ok(Self { service: None });
		}

		let service = AnalyticsService::new(config.search.clone())?;

		Ok(Self { service: Some(Arc::new(service)) })
	}

	pub fn with_service(service: Option<Arc<AnalyticsService>>) -> Self {
		Self { service }
	}
}
