pub mod listing;
pub mod probe;
pub mod signal;
pub mod stats;
pub mod status;

mod error;

use std::{future::Future, pin::Pin, sync::Arc, time::Instant};

use serde_json::Value;

pub use error::{Error, Result};
pub use listing::{ArtifactListEntry, ListRequest, ListResponse};
pub use probe::{Probe, ProbeRecorder, TracingProbes};
pub use signal::ScanSignal;
pub use stats::StatsRequest;
pub use status::{TransferRequest, TransferResponse};

use amo_search::{SearchClient, SearchResponse, ServiceStats, TransferLookup};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The search-index operations the service issues.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, amo_search::Result<SearchResponse>>;

	fn search_transfer<'a>(
		&'a self,
		transfer_uuid: &'a str,
		limit: u32,
	) -> BoxFuture<'a, amo_search::Result<TransferLookup>>;

	fn service_stats(&self) -> BoxFuture<'_, amo_search::Result<ServiceStats>>;
}
impl SearchBackend for SearchClient {
	fn search<'a>(
		&'a self,
		index: &'a str,
		body: &'a Value,
	) -> BoxFuture<'a, amo_search::Result<SearchResponse>> {
		Box::pin(SearchClient::search(self, index, body))
	}

	fn search_transfer<'a>(
		&'a self,
		transfer_uuid: &'a str,
		limit: u32,
	) -> BoxFuture<'a, amo_search::Result<TransferLookup>> {
		Box::pin(SearchClient::search_transfer(self, transfer_uuid, limit))
	}

	fn service_stats(&self) -> BoxFuture<'_, amo_search::Result<ServiceStats>> {
		Box::pin(SearchClient::service_stats(self))
	}
}

pub struct AnalyticsService {
	pub cfg: amo_config::Search,
	pub backend: Arc<dyn SearchBackend>,
	pub probes: Arc<dyn ProbeRecorder>,
}
impl AnalyticsService {
	pub fn new(cfg: amo_config::Search) -> Result<Self> {
		let client = SearchClient::new(&cfg)?;

		Ok(Self::with_backend(cfg, Arc::new(client)))
	}

	pub fn with_backend(cfg: amo_config::Search, backend: Arc<dyn SearchBackend>) -> Self {
		Self { cfg, backend, probes: Arc::new(TracingProbes) }
	}

	pub fn with_probes(mut self, probes: Arc<dyn ProbeRecorder>) -> Self {
		self.probes = probes;

		self
	}

	/// The requested index, or the configured one when blank.
	pub fn resolve_index<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
		match requested.map(str::trim) {
			Some(index) if !index.is_empty() => index,
			_ => &self.cfg.aip_index,
		}
	}

	pub(crate) async fn fetch_page(
		&self,
		signal: &ScanSignal,
		operation: &'static str,
		page: u32,
		index: &str,
		body: &Value,
	) -> Result<SearchResponse> {
		let started = Instant::now();
		let res = signal.guard(self.backend.search(index, body)).await;
		let (ok, hits) = match &res {
			Ok(Ok(page)) => (true, page.hits.len()),
			_ => (false, 0),
		};

		self.probes.record(Probe { operation, page, hits, elapsed: started.elapsed(), ok });

		Ok(res??)
	}
}
