use serde::{Deserialize, Serialize};

use amo_search::{ServiceStats, TransferLookup};

use crate::{AnalyticsService, Error, Result, ScanSignal};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferRequest {
	pub transfer_uuid: String,
	pub limit: Option<i64>,
}

pub type TransferResponse = TransferLookup;

impl AnalyticsService {
	pub async fn search_transfer(
		&self,
		req: TransferRequest,
		signal: &ScanSignal,
	) -> Result<TransferResponse> {
		let transfer_uuid = req.transfer_uuid.trim();

		if transfer_uuid.is_empty() {
			return Err(Error::InvalidIdentifier {
				message: "transfer_uuid must be non-empty.".to_string(),
			});
		}

		let limit = match req.limit {
			Some(limit) if limit > 0 => u32::try_from(limit).unwrap_or(u32::MAX),
			_ => self.cfg.lookup_limit.max(1),
		};

		Ok(signal.guard(self.backend.search_transfer(transfer_uuid, limit)).await??)
	}

	pub async fn service_stats(&self, signal: &ScanSignal) -> Result<ServiceStats> {
		Ok(signal.guard(self.backend.service_stats()).await??)
	}
}
