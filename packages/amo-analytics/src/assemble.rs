use std::collections::HashMap;

use crate::{
	aggregate::{Counter, FormatSignature, StatsAccumulator},
	stats::{ArtifactStats, FormatVersionCount, KeyCount},
	timestamp::whole_seconds,
};

pub const GENERAL_CAP: usize = 20;
pub const FORMAT_CAP: usize = 50;
pub const EXTENSION_CAP: usize = 30;
pub const LAG_PERCENTILE: i32 = 95;

/// Nearest-rank percentile over an ascending slice, truncating the rank. Empty input yields 0.
pub fn percentile(sorted: &[i64], p: i32) -> i64 {
	let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
		return 0;
	};

	if p <= 0 {
		return *first;
	}
	if p >= 100 {
		return *last;
	}

	let rank = (sorted.len() - 1) * p as usize / 100;

	sorted[rank]
}

pub fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

/// Count descending, key ascending, at most `cap` entries.
pub fn ranked<'a, I>(counts: I, cap: usize) -> Vec<KeyCount>
where
	I: IntoIterator<Item = (&'a String, &'a u64)>,
{
	let mut out: Vec<KeyCount> =
		counts.into_iter().map(|(key, count)| KeyCount { key: key.clone(), count: *count }).collect();

	out.sort_by(|lhs, rhs| rhs.count.cmp(&lhs.count).then_with(|| lhs.key.cmp(&rhs.key)));
	out.truncate(cap);

	out
}

pub fn ranked_format_versions(
	counts: &HashMap<FormatSignature, u64>,
	cap: usize,
) -> Vec<FormatVersionCount> {
	let mut out: Vec<FormatVersionCount> = counts
		.iter()
		.map(|((key, name, version), count)| FormatVersionCount {
			format_registry_key: key.clone(),
			format_name: name.clone(),
			format_version: version.clone(),
			count: *count,
		})
		.collect();

	out.sort_by(|lhs, rhs| {
		rhs.count
			.cmp(&lhs.count)
			.then_with(|| lhs.format_registry_key.cmp(&rhs.format_registry_key))
			.then_with(|| lhs.format_name.cmp(&rhs.format_name))
			.then_with(|| lhs.format_version.cmp(&rhs.format_version))
	});
	out.truncate(cap);

	out
}

fn ratio(numerator: f64, files_total: u64) -> f64 {
	if files_total == 0 {
		return 0.0;
	}

	round2(numerator / files_total as f64)
}

/// Summed in `i128`; an `i64` total can overflow.
fn mean_seconds(samples: &[i64]) -> f64 {
	if samples.is_empty() {
		return 0.0;
	}

	let total: i128 = samples.iter().map(|seconds| i128::from(*seconds)).sum();

	round2(total as f64 / samples.len() as f64)
}

fn duplicate_filenames(basenames: &Counter) -> (u64, u64) {
	basenames.values().filter(|count| **count > 1).fold((0, 0), |(groups, candidates), count| {
		(groups + 1, candidates + count)
	})
}

pub(crate) fn assemble(acc: StatsAccumulator) -> ArtifactStats {
	let files_total = acc.files_total;
	let (duplicate_filename_groups, duplicate_filename_candidates) =
		duplicate_filenames(&acc.basenames);
	let mut lag = acc.lag_seconds;

	lag.sort_unstable();

	let indexed_lag_avg_seconds = mean_seconds(&lag);
	let mut sip_names: Vec<String> = acc.sip_names.into_iter().collect();

	sip_names.sort();

	let largest_files = acc
		.largest_files
		.into_vec()
		.into_iter()
		.map(|mut sample| {
			sample.created_by_app_date = sample.created_by_app_date.map(whole_seconds);
			sample.indexed_at = sample.indexed_at.map(whole_seconds);

			sample
		})
		.collect();

	ArtifactStats {
		aip_uuid: acc.aip_uuid,
		sip_names,
		files_total,
		unique_file_uuids: acc.file_uuids.len() as u64,
		originals_with_normalized: acc.originals_with_normalized,
		originals_without_normalized: acc.originals_without_normalized,
		normalized_refs_total: acc.normalized_refs_total,
		unique_normalized_object_ids: acc.normalized_object_ids.len() as u64,
		normalized_by_original_avg: ratio(acc.normalized_refs_total as f64, files_total),
		total_bytes: acc.total_bytes,
		average_bytes: ratio(acc.total_bytes as f64, files_total),
		min_indexed_at: acc.indexed_at.min.map(whole_seconds),
		max_indexed_at: acc.indexed_at.max.map(whole_seconds),
		min_created_by_app_date: acc.created_by_app.min.map(whole_seconds),
		max_created_by_app_date: acc.created_by_app.max.map(whole_seconds),
		first_event_date: acc.event_dates.min.map(whole_seconds),
		last_event_date: acc.event_dates.max.map(whole_seconds),
		status_counts: ranked(&acc.status, GENERAL_CAP),
		origin_counts: ranked(&acc.origin, GENERAL_CAP),
		accession_id_counts: ranked(&acc.accession_id, GENERAL_CAP),
		is_part_of_counts: ranked(&acc.is_part_of, GENERAL_CAP),
		archivematica_version_counts: ranked(&acc.archivematica_version, GENERAL_CAP),
		format_registry_counts: ranked(&acc.format_registry, FORMAT_CAP),
		format_name_counts: ranked(&acc.format_name, FORMAT_CAP),
		format_version_counts: ranked_format_versions(&acc.format_versions, FORMAT_CAP),
		premis_event_type_counts: ranked(&acc.event_type, FORMAT_CAP),
		premis_event_outcome_counts: ranked(&acc.event_outcome, FORMAT_CAP),
		premis_tool_counts: ranked(&acc.event_tool, FORMAT_CAP),
		missing_identifiers: acc.missing_identifiers,
		unknown_formats: acc.unknown_formats,
		missing_created_by_app_date: acc.missing_created_by_app_date,
		extension_format_mismatch: acc.extension_format_mismatch,
		duplicate_filename_groups,
		duplicate_filename_candidates,
		unique_format_signatures: acc.format_versions.len() as u64,
		format_diversity_ratio: ratio(acc.format_versions.len() as f64, files_total),
		indexed_lag_avg_seconds,
		indexed_lag_p95_seconds: percentile(&lag, LAG_PERCENTILE),
		largest_files,
		extension_counts: ranked(&acc.raw_extensions, EXTENSION_CAP),
		raw_extension_counts: acc.raw_extensions,
	}
}
