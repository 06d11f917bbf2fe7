use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCount {
	pub key: String,
	pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatVersionCount {
	pub format_registry_key: String,
	pub format_name: String,
	pub format_version: String,
	pub count: u64,
}

/// A representative file row, used for the largest-files list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSample {
	pub file_path: String,
	pub file_uuid: String,
	pub bytes: i64,
	pub extension: String,
	pub format_registry_key: String,
	pub format_name: String,
	pub status: String,
	#[serde(with = "crate::time_serde", default)]
	pub created_by_app_date: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde", default)]
	pub indexed_at: Option<OffsetDateTime>,
}

/// File, format and normalization summary for one AIP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactStats {
	pub aip_uuid: String,
	pub sip_names: Vec<String>,
	pub files_total: u64,
	pub unique_file_uuids: u64,
	pub originals_with_normalized: u64,
	pub originals_without_normalized: u64,
	pub normalized_refs_total: u64,
	pub unique_normalized_object_ids: u64,
	pub normalized_by_original_avg: f64,
	pub total_bytes: i64,
	pub average_bytes: f64,
	#[serde(with = "crate::time_serde", default)]
	pub min_indexed_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde", default)]
	pub max_indexed_at: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde", default)]
	pub min_created_by_app_date: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde", default)]
	pub max_created_by_app_date: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde", default)]
	pub first_event_date: Option<OffsetDateTime>,
	#[serde(with = "crate::time_serde", default)]
	pub last_event_date: Option<OffsetDateTime>,
	pub status_counts: Vec<KeyCount>,
	pub origin_counts: Vec<KeyCount>,
	pub accession_id_counts: Vec<KeyCount>,
	pub is_part_of_counts: Vec<KeyCount>,
	pub archivematica_version_counts: Vec<KeyCount>,
	pub format_registry_counts: Vec<KeyCount>,
	pub format_name_counts: Vec<KeyCount>,
	pub format_version_counts: Vec<FormatVersionCount>,
	pub premis_event_type_counts: Vec<KeyCount>,
	pub premis_event_outcome_counts: Vec<KeyCount>,
	pub premis_tool_counts: Vec<KeyCount>,
	pub missing_identifiers: u64,
	pub unknown_formats: u64,
	pub missing_created_by_app_date: u64,
	pub extension_format_mismatch: u64,
	pub duplicate_filename_groups: u64,
	pub duplicate_filename_candidates: u64,
	pub unique_format_signatures: u64,
	pub format_diversity_ratio: f64,
	pub indexed_lag_avg_seconds: f64,
	pub indexed_lag_p95_seconds: i64,
	pub largest_files: Vec<FileSample>,
	pub extension_counts: Vec<KeyCount>,
	pub raw_extension_counts: BTreeMap<String, u64>,
}
