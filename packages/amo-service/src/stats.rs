use serde::{Deserialize, Serialize};
use serde_json::Value;

use amo_analytics::{ArtifactStats, StatsAccumulator};
use amo_search::query;

use crate::{AnalyticsService, Error, Result, ScanSignal};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsRequest {
	pub index: Option<String>,
	pub aip_uuid: String,
	pub page_size: Option<i64>,
}

impl AnalyticsService {
	/// Scans every file of one AIP and summarizes it.
	///
	/// Any failed page aborts the scan; no partial summary is returned.
	pub async fn artifact_stats(
		&self,
		req: StatsRequest,
		signal: &ScanSignal,
	) -> Result<ArtifactStats> {
		let aip_uuid = req.aip_uuid.trim();

		if aip_uuid.is_empty() {
			return Err(Error::InvalidIdentifier {
				message: "aip_uuid must be non-empty.".to_string(),
			});
		}

		let signal = signal.clone().or_timeout_ms(self.cfg.scan.deadline_ms);
		let index = self.resolve_index(req.index.as_deref()).to_string();
		let page_size = self.scan_page_size(req.page_size);
		let mut acc = StatsAccumulator::new(aip_uuid);
		let mut search_after: Option<Vec<Value>> = None;
		let mut page = 0;
		let mut exhausted = false;

		while page < self.cfg.scan.max_pages {
			let body = query::scan_body(aip_uuid, page_size, search_after.as_deref());
			let res = self.fetch_page(&signal, "artifact_stats", page, &index, &body).await?;

			page += 1;

			let Some(last) = res.hits.last() else {
				exhausted = true;

				break;
			};
			let next_sort = last.sort.clone();

			for hit in &res.hits {
				acc.observe_source(&hit.source);
			}

			if next_sort.is_empty() {
				exhausted = true;

				break;
			}

			search_after = Some(next_sort);
		}

		if !exhausted {
			tracing::warn!(%index, aip_uuid, pages = page, "AIP scan stopped at the page ceiling.");
		}

		tracing::info!(%index, aip_uuid, pages = page, files = acc.files_total(), "AIP scan completed.");

		Ok(acc.finish())
	}

	fn scan_page_size(&self, requested: Option<i64>) -> u32 {
		let scan = &self.cfg.scan;

		match requested {
			Some(size) if size > 0 => size.min(i64::from(scan.max_page_size)) as u32,
			_ => scan.default_page_size.min(scan.max_page_size),
		}
	}
}
