use std::{
	cmp::Ordering,
	collections::{BTreeMap, HashMap, HashSet},
};

use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::{
	assemble,
	extract::FileRecord,
	formats,
	stats::{ArtifactStats, FileSample},
	topk::{BoundedTopK, LARGEST_FILES_CAPACITY},
};

pub(crate) type Counter = HashMap<String, u64>;
pub(crate) type FormatSignature = (String, String, String);

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TimeRange {
	pub(crate) min: Option<OffsetDateTime>,
	pub(crate) max: Option<OffsetDateTime>,
}
impl TimeRange {
	fn observe(&mut self, value: OffsetDateTime) {
		if self.min.is_none_or(|min| value < min) {
			self.min = Some(value);
		}
		if self.max.is_none_or(|max| value > max) {
			self.max = Some(value);
		}
	}
}

/// Running state for one AIP scan. Each hit is folded in once, in O(1) amortized time.
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
	pub(crate) aip_uuid: String,
	pub(crate) files_total: u64,
	pub(crate) total_bytes: i64,
	pub(crate) originals_with_normalized: u64,
	pub(crate) originals_without_normalized: u64,
	pub(crate) normalized_refs_total: u64,
	pub(crate) missing_identifiers: u64,
	pub(crate) unknown_formats: u64,
	pub(crate) missing_created_by_app_date: u64,
	pub(crate) extension_format_mismatch: u64,
	pub(crate) sip_names: HashSet<String>,
	pub(crate) file_uuids: HashSet<String>,
	pub(crate) normalized_object_ids: HashSet<String>,
	pub(crate) status: Counter,
	pub(crate) origin: Counter,
	pub(crate) accession_id: Counter,
	pub(crate) is_part_of: Counter,
	pub(crate) archivematica_version: Counter,
	pub(crate) format_registry: Counter,
	pub(crate) format_name: Counter,
	/// Keys double as the distinct format-signature set.
	pub(crate) format_versions: HashMap<FormatSignature, u64>,
	pub(crate) event_type: Counter,
	pub(crate) event_outcome: Counter,
	pub(crate) event_tool: Counter,
	pub(crate) basenames: Counter,
	pub(crate) raw_extensions: BTreeMap<String, u64>,
	pub(crate) indexed_at: TimeRange,
	pub(crate) created_by_app: TimeRange,
	pub(crate) event_dates: TimeRange,
	pub(crate) lag_seconds: Vec<i64>,
	pub(crate) largest_files: BoundedTopK<FileSample>,
}
impl StatsAccumulator {
	pub fn new(aip_uuid: impl Into<String>) -> Self {
		Self {
			aip_uuid: aip_uuid.into(),
			files_total: 0,
			total_bytes: 0,
			originals_with_normalized: 0,
			originals_without_normalized: 0,
			normalized_refs_total: 0,
			missing_identifiers: 0,
			unknown_formats: 0,
			missing_created_by_app_date: 0,
			extension_format_mismatch: 0,
			sip_names: HashSet::new(),
			file_uuids: HashSet::new(),
			normalized_object_ids: HashSet::new(),
			status: Counter::new(),
			origin: Counter::new(),
			accession_id: Counter::new(),
			is_part_of: Counter::new(),
			archivematica_version: Counter::new(),
			format_registry: Counter::new(),
			format_name: Counter::new(),
			format_versions: HashMap::new(),
			event_type: Counter::new(),
			event_outcome: Counter::new(),
			event_tool: Counter::new(),
			basenames: Counter::new(),
			raw_extensions: BTreeMap::new(),
			indexed_at: TimeRange::default(),
			created_by_app: TimeRange::default(),
			event_dates: TimeRange::default(),
			lag_seconds: Vec::new(),
			largest_files: BoundedTopK::new(LARGEST_FILES_CAPACITY, largest_first),
		}
	}

	pub fn files_total(&self) -> u64 {
		self.files_total
	}

	pub fn observe_source(&mut self, source: &Map<String, Value>) {
		self.observe(FileRecord::from_source(source));
	}

	pub fn observe(&mut self, record: FileRecord) {
		self.files_total += 1;

		if let Some(sip_name) = &record.sip_name {
			self.sip_names.insert(sip_name.clone());
		}
		if let Some(file_uuid) = &record.file_uuid {
			self.file_uuids.insert(file_uuid.clone());
		}

		bump(&mut self.status, record.status.as_deref());
		bump(&mut self.origin, record.origin.as_deref());
		bump(&mut self.accession_id, record.accession_id.as_deref());
		bump(&mut self.archivematica_version, record.archivematica_version.as_deref());

		for unit in &record.is_part_of {
			bump(&mut self.is_part_of, Some(unit.as_str()));
		}

		if record.identifiers_missing {
			self.missing_identifiers += 1;
		}

		*self.raw_extensions.entry(record.extension.clone()).or_default() += 1;

		if let Some(basename) = &record.basename {
			*self.basenames.entry(basename.to_lowercase()).or_default() += 1;
		}
		if let Some(indexed_at) = record.indexed_at {
			self.indexed_at.observe(indexed_at);
		}

		let meta = &record.metadata;
		let format = &meta.format;

		bump(&mut self.format_registry, format.registry_key.as_deref());
		bump(&mut self.format_name, format.name.as_deref());

		if format.is_unknown() {
			self.unknown_formats += 1;
		}
		if let Some(signature) = format.signature() {
			*self.format_versions.entry(signature).or_default() += 1;
		}

		match meta.created_by_application {
			Some(created) => {
				self.created_by_app.observe(created);

				if let Some(indexed_at) = record.indexed_at
					&& indexed_at > created
				{
					self.lag_seconds.push((indexed_at - created).whole_seconds());
				}
			},
			None => self.missing_created_by_app_date += 1,
		}

		if formats::is_extension_mismatch(
			format.registry_key.as_deref(),
			format.name.as_deref(),
			record.effective_extension(),
		) {
			self.extension_format_mismatch += 1;
		}

		for date in &meta.event_dates {
			self.event_dates.observe(*date);
		}
		for event in &meta.events {
			bump(&mut self.event_type, event.event_type.as_deref());
			bump(&mut self.event_outcome, event.outcome.as_deref());
			bump(&mut self.event_tool, event.tool_version.as_deref());
		}

		if meta.normalized_object_ids.is_empty() {
			self.originals_without_normalized += 1;
		} else {
			self.originals_with_normalized += 1;
			self.normalized_refs_total += meta.normalized_object_ids.len() as u64;
			self.normalized_object_ids.extend(meta.normalized_object_ids.iter().cloned());
		}

		if let Some(size) = record.size {
			self.total_bytes = self.total_bytes.saturating_add(size);
			self.largest_files.push(FileSample {
				file_path: record.file_path.clone().unwrap_or_default(),
				file_uuid: record.file_uuid.clone().unwrap_or_default(),
				bytes: size,
				extension: record.extension.clone(),
				format_registry_key: format.registry_key.clone().unwrap_or_default(),
				format_name: format.name.clone().unwrap_or_default(),
				status: record.status.clone().unwrap_or_default(),
				created_by_app_date: meta.created_by_application,
				indexed_at: record.indexed_at,
			});
		}
	}

	pub fn finish(self) -> ArtifactStats {
		assemble::assemble(self)
	}
}

fn bump(counter: &mut Counter, key: Option<&str>) {
	if let Some(key) = key {
		*counter.entry(key.to_string()).or_default() += 1;
	}
}

fn largest_first(lhs: &FileSample, rhs: &FileSample) -> Ordering {
	rhs.bytes.cmp(&lhs.bytes).then_with(|| lhs.file_path.cmp(&rhs.file_path))
}
