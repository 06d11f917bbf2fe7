use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Result, SearchClient, SearchHit, query};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferHit {
	pub index: String,
	pub id: String,
	pub score: f64,
	pub source: Map<String, Value>,
}
impl From<SearchHit> for TransferHit {
	fn from(hit: SearchHit) -> Self {
		Self {
			index: hit.index,
			id: hit.id,
			score: hit.score.unwrap_or_default(),
			source: hit.source,
		}
	}
}

/// Documents mentioning one transfer, SIP or AIP identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLookup {
	pub transfer_uuid: String,
	pub took_ms: i64,
	pub total_hits: i64,
	pub hits: Vec<TransferHit>,
}

impl SearchClient {
	/// Searches every index for `transfer_uuid`; `limit` is the number of hits returned.
	pub async fn search_transfer(&self, transfer_uuid: &str, limit: u32) -> Result<TransferLookup> {
		let transfer_uuid = transfer_uuid.trim();
		let body = query::transfer_body(transfer_uuid, limit.max(1));
		let res = self.post_search("/_search", &body).await?;

		Ok(TransferLookup {
			transfer_uuid: transfer_uuid.to_string(),
			took_ms: res.took_ms,
			total_hits: res.total_hits,
			hits: res.hits.into_iter().map(TransferHit::from).collect(),
		})
	}
}
