use serde::Deserialize;

pub const DEFAULT_AIP_INDEX: &str = "aipfiles";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub enabled: bool,
	pub endpoint: String,
	pub timeout_ms: u64,
	#[serde(default = "default_aip_index")]
	pub aip_index: String,
	#[serde(default = "default_lookup_limit")]
	pub lookup_limit: u32,
	#[serde(default)]
	pub listing: Listing,
	#[serde(default)]
	pub scan: Scan,
}

/// Bounds for the distinct-AIP listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Listing {
	pub default_limit: u32,
	pub max_limit: u32,
	/// Page size is `limit * over_fetch_factor`, since many hits share one AIP.
	pub over_fetch_factor: u32,
	pub max_pages: u32,
}
impl Default for Listing {
	fn default() -> Self {
		Self { default_limit: 100, max_limit: 500, over_fetch_factor: 3, max_pages: 10 }
	}
}

/// Bounds for the per-AIP full scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scan {
	pub default_page_size: u32,
	pub max_page_size: u32,
	pub max_pages: u32,
	pub deadline_ms: Option<u64>,
}
impl Default for Scan {
	fn default() -> Self {
		Self { default_page_size: 500, max_page_size: 2_000, max_pages: 1_000, deadline_ms: None }
	}
}

fn default_aip_index() -> String {
	DEFAULT_AIP_INDEX.to_string()
}

fn default_lookup_limit() -> u32 {
	5
}
