use std::time::Duration;

/// One timed call to the search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
	pub operation: &'static str,
	pub page: u32,
	pub hits: usize,
	pub elapsed: Duration,
	pub ok: bool,
}

pub trait ProbeRecorder
where
	Self: Send + Sync,
{
	fn record(&self, probe: Probe);
}

/// Emits each probe as a debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProbes;
impl ProbeRecorder for TracingProbes {
	fn record(&self, probe: Probe) {
		if probe.ok {
			tracing::debug!(
				operation = probe.operation,
				page = probe.page,
				hits = probe.hits,
				elapsed_ms = probe.elapsed.as_millis() as u64,
				"Search probe completed."
			);
		} else {
			tracing::warn!(
				operation = probe.operation,
				page = probe.page,
				elapsed_ms = probe.elapsed.as_millis() as u64,
				"Search probe failed."
			);
		}
	}
}
