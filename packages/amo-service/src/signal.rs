use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Caller-owned stop conditions, observed at every page fetch of a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSignal {
	cancel: CancellationToken,
	deadline: Option<Instant>,
}
impl ScanSignal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_cancel(cancel: CancellationToken) -> Self {
		Self { cancel, deadline: None }
	}

	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		self.deadline = Some(deadline);

		self
	}

	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Applies `timeout_ms` only when no deadline was set by the caller.
	pub fn or_timeout_ms(self, timeout_ms: Option<u64>) -> Self {
		match (self.deadline, timeout_ms) {
			(None, Some(ms)) => self.with_timeout(Duration::from_millis(ms)),
			_ => self,
		}
	}

	pub fn cancel_token(&self) -> &CancellationToken {
		&self.cancel
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn check(&self) -> Result<()> {
		if self.cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}
		if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
			return Err(Error::DeadlineExceeded);
		}

		Ok(())
	}

	/// Runs `fut` unless the scan is cancelled or its deadline passes first.
	pub async fn guard<F, T>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = T>,
	{
		self.check()?;

		let expired = async {
			match self.deadline {
				Some(deadline) => tokio::time::sleep_until(deadline).await,
				None => std::future::pending::<()>().await,
			}
		};

		tokio::select! {
			biased;
			_ = self.cancel.cancelled() => Err(Error::Cancelled),
			_ = expired => Err(Error::DeadlineExceeded),
			out = fut => Ok(out),
		}
	}
}
