use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use amo_search::{cursor, query};

use crate::{AnalyticsService, Result, ScanSignal};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRequest {
	pub index: Option<String>,
	pub limit: Option<i64>,
	pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactListEntry {
	pub aip_uuid: String,
	pub sip_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
	pub index: String,
	pub limit: u32,
	pub items: Vec<ArtifactListEntry>,
	pub next_cursor: Option<String>,
}

impl AnalyticsService {
	/// One page of distinct AIPs, ordered by AIP id.
	///
	/// Hits are file documents, so pages are over-fetched and collapsed by `AIPUUID`. The next
	/// cursor resumes after the last hit of the last fetched page.
	pub async fn list_artifacts(
		&self,
		req: ListRequest,
		signal: &ScanSignal,
	) -> Result<ListResponse> {
		let index = self.resolve_index(req.index.as_deref()).to_string();
		let limit = self.listing_limit(req.limit);
		let mut search_after = match req.cursor.as_deref() {
			Some(raw) => cursor::decode(raw)?,
			None => None,
		};
		let listing = &self.cfg.listing;
		let page_size = limit.saturating_mul(listing.over_fetch_factor.max(1));
		let mut items = Vec::with_capacity(limit as usize);
		let mut seen = HashSet::new();
		let mut next_sort: Vec<Value> = Vec::new();
		let mut page = 0;

		while page < listing.max_pages && items.len() < limit as usize {
			let body = query::listing_body(page_size, search_after.as_deref());
			let res = self.fetch_page(signal, "list_artifacts", page, &index, &body).await?;

			page += 1;

			let Some(last) = res.hits.last() else {
				next_sort.clear();

				break;
			};

			next_sort = last.sort.clone();

			for hit in &res.hits {
				let Some(aip_uuid) = text_field(hit.source.get(query::AIP_UUID_FIELD)) else {
					continue;
				};

				if !seen.insert(aip_uuid.clone()) {
					continue;
				}

				items.push(ArtifactListEntry {
					aip_uuid,
					sip_name: text_field(hit.source.get("sipName")).unwrap_or_default(),
				});

				if items.len() >= limit as usize {
					break;
				}
			}

			if next_sort.is_empty() {
				break;
			}

			search_after = Some(next_sort.clone());
		}

		let next_cursor = (!next_sort.is_empty()).then(|| cursor::encode(&next_sort));

		tracing::info!(%index, limit, pages = page, items = items.len(), "AIP listing completed.");

		Ok(ListResponse { index, limit, items, next_cursor })
	}

	fn listing_limit(&self, requested: Option<i64>) -> u32 {
		let listing = &self.cfg.listing;

		match requested {
			Some(limit) if limit > 0 => limit.min(i64::from(listing.max_limit)) as u32,
			_ => listing.default_limit.min(listing.max_limit),
		}
	}
}

pub(crate) fn text_field(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(text) => Some(text.trim()).filter(|text| !text.is_empty()).map(str::to_string),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}
