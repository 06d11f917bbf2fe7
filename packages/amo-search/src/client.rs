use std::time::{Duration, Instant};

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

const ERROR_BODY_LIMIT: usize = 2_048;

/// One row of a `_search` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHit {
	#[serde(rename = "_index", default)]
	pub index: String,
	#[serde(rename = "_id", default)]
	pub id: String,
	#[serde(rename = "_score", default)]
	pub score: Option<f64>,
	#[serde(default)]
	pub sort: Vec<Value>,
	#[serde(rename = "_source", default)]
	pub source: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
	pub took_ms: i64,
	pub total_hits: i64,
	pub hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct RawResponse {
	#[serde(default)]
	took: i64,
	#[serde(default)]
	hits: RawHits,
}

#[derive(Default, Deserialize)]
struct RawHits {
	#[serde(default)]
	total: Option<RawTotal>,
	#[serde(default)]
	hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotal {
	Count(i64),
	Object { value: i64 },
}

/// Read-only HTTP client for an Elasticsearch-compatible index.
///
/// The underlying connection pool is shared by clones; no per-call state is kept.
#[derive(Debug, Clone)]
pub struct SearchClient {
	endpoint: String,
	http: Client,
}
impl SearchClient {
	pub fn new(cfg: &amo_config::Search) -> Result<Self> {
		let endpoint = cfg.endpoint.trim().trim_end_matches('/').to_string();

		if endpoint.is_empty() {
			return Err(Error::InvalidConfig {
				message: "Search endpoint must be non-empty.".to_string(),
			});
		}

		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { endpoint, http })
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// `POST {endpoint}/{index}/_search`.
	pub async fn search(&self, index: &str, body: &Value) -> Result<SearchResponse> {
		let path = format!("/{}/_search", index.trim().trim_matches('/'));

		self.post_search(&path, body).await
	}

	pub(crate) async fn post_search(&self, path: &str, body: &Value) -> Result<SearchResponse> {
		let url = format!("{}{path}", self.endpoint);
		let started = Instant::now();
		let res = self.http.post(&url).json(body).send().await?;
		let res = ensure_success(res).await?;
		let raw: RawResponse = res.json().await?;
		let total_hits = match raw.hits.total {
			Some(RawTotal::Count(value)) | Some(RawTotal::Object { value }) => value,
			None => raw.hits.hits.len() as i64,
		};

		tracing::debug!(
			%path,
			hits = raw.hits.hits.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Search page fetched."
		);

		Ok(SearchResponse { took_ms: raw.took, total_hits, hits: raw.hits.hits })
	}

	pub(crate) async fn get_json(&self, path: &str) -> Result<Value> {
		let url = format!("{}{path}", self.endpoint);
		let res = self.http.get(&url).send().await?;
		let res = ensure_success(res).await?;

		Ok(res.json().await?)
	}
}

async fn ensure_success(res: Response) -> Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();
	let excerpt = truncate_on_char_boundary(body.trim(), ERROR_BODY_LIMIT);

	tracing::warn!(status = status.as_u16(), "Search index returned an error status.");

	Err(Error::IndexUnavailable { message: format!("status={} body={excerpt}", status.as_u16()) })
}

fn truncate_on_char_boundary(text: &str, limit: usize) -> &str {
	if text.len() <= limit {
		return text;
	}

	let mut end = limit;

	while !text.is_char_boundary(end) {
		end -= 1;
	}

	&text[..end]
}
