use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::{
	node::Node,
	timestamp::{from_epoch_seconds, parse_timestamp},
};

pub const UNKNOWN_EXTENSION: &str = "unknown";

const AMD_SEC: [&str; 2] = ["amdSec", "mets:amdSec_dict"];
const OBJECT: [&str; 4] =
	["mets:techMD_dict", "mets:mdWrap_dict", "mets:xmlData_dict", "premis:object_dict"];
const EVENT: [&str; 3] = ["mets:mdWrap_dict", "mets:xmlData_dict", "premis:event_dict"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatIdentity {
	pub registry_key: Option<String>,
	pub name: Option<String>,
	pub version: Option<String>,
}
impl FormatIdentity {
	pub fn is_unknown(&self) -> bool {
		self.registry_key.is_none() && self.name.is_none()
	}

	/// `(registry key, name, version)` when any part is present.
	pub fn signature(&self) -> Option<(String, String, String)> {
		if self.is_unknown() && self.version.is_none() {
			return None;
		}

		let part = |value: &Option<String>| value.clone().unwrap_or_default();

		Some((part(&self.registry_key), part(&self.name), part(&self.version)))
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvenanceEvent {
	pub event_type: Option<String>,
	pub outcome: Option<String>,
	pub tool_version: Option<String>,
}

/// What one PREMIS object record says about a file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMetadata {
	pub size: Option<i64>,
	pub format: FormatIdentity,
	pub created_by_application: Option<OffsetDateTime>,
	pub normalized_object_ids: Vec<String>,
	pub events: Vec<ProvenanceEvent>,
	pub event_dates: Vec<OffsetDateTime>,
}

pub fn extract_object_metadata(mets: Node<'_>) -> ObjectMetadata {
	let amd = mets.path(&AMD_SEC);
	let object = amd.path(&OBJECT);
	let characteristics = object.get("premis:objectCharacteristics_dict");
	let format = characteristics.get("premis:format_dict");
	let designation = format.get("premis:formatDesignation_dict");
	let mut meta = ObjectMetadata {
		size: positive_size(characteristics.get("premis:size")),
		format: FormatIdentity {
			registry_key: format
				.path(&["premis:formatRegistry_dict", "premis:formatRegistryKey"])
				.owned_text(),
			name: designation.get("premis:formatName").owned_text(),
			version: designation.get("premis:formatVersion").owned_text(),
		},
		created_by_application: characteristics
			.path(&["premis:creatingApplication_dict", "premis:dateCreatedByApplication"])
			.text()
			.and_then(parse_timestamp),
		normalized_object_ids: normalized_object_ids(object),
		..Default::default()
	};

	for wrapper in amd.get("mets:digiprovMD_dict").as_list() {
		let event = wrapper.path(&EVENT);

		if let Some(date) = event.get("premis:eventDateTime").text().and_then(parse_timestamp) {
			meta.event_dates.push(date);
		}

		let parsed = ProvenanceEvent {
			event_type: event.get("premis:eventType").owned_text(),
			outcome: event
				.path(&["premis:eventOutcomeInformation_dict", "premis:eventOutcome"])
				.owned_text(),
			tool_version: event
				.path(&["premis:eventDetailInformation_dict", "premis:eventDetail"])
				.text()
				.and_then(parse_tool_version),
		};

		if parsed != ProvenanceEvent::default() {
			meta.events.push(parsed);
		}
	}

	meta
}

fn normalized_object_ids(object: Node<'_>) -> Vec<String> {
	let mut ids: Vec<String> = object
		.get("premis:relationship_dict")
		.as_list()
		.into_iter()
		.filter_map(|relationship| {
			relationship
				.path(&["premis:relatedObjectIdentifier_dict", "premis:relatedObjectIdentifierValue"])
				.owned_text()
		})
		.collect();

	ids.sort();
	ids.dedup();

	ids
}

/// `program=X;version=Y` into `"X Y"`, or whichever half is present.
pub fn parse_tool_version(detail: &str) -> Option<String> {
	let mut program = "";
	let mut version = "";

	for part in detail.split(';').map(str::trim) {
		if let Some(value) = part.strip_prefix("program=") {
			program = value.trim_matches('"');
		}
		if let Some(value) = part.strip_prefix("version=") {
			version = value.trim_matches('"');
		}
	}

	match (program.is_empty(), version.is_empty()) {
		(true, true) => None,
		(false, true) => Some(program.to_string()),
		(true, false) => Some(version.to_string()),
		(false, false) => Some(format!("{program} {version}")),
	}
}

fn positive_size(node: Node<'_>) -> Option<i64> {
	node.number().map(|value| value as i64).filter(|size| *size > 0)
}

/// One search hit flattened into the fields the aggregator reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRecord {
	pub aip_uuid: Option<String>,
	pub sip_name: Option<String>,
	pub file_uuid: Option<String>,
	pub file_path: Option<String>,
	/// From the file path, lower-cased; `unknown` when there is none.
	pub extension: String,
	/// The indexed `fileExtension` field, lower-cased without a leading dot.
	pub raw_extension: Option<String>,
	pub basename: Option<String>,
	pub status: Option<String>,
	pub origin: Option<String>,
	pub accession_id: Option<String>,
	pub is_part_of: Vec<String>,
	pub archivematica_version: Option<String>,
	pub identifiers_missing: bool,
	pub indexed_at: Option<OffsetDateTime>,
	pub size: Option<i64>,
	pub metadata: ObjectMetadata,
}
impl FileRecord {
	pub fn from_source(source: &Map<String, Value>) -> Self {
		let root = Node::root(source);
		let file_path = root.get("filePath").owned_text();
		let mut metadata = extract_object_metadata(root.get("METS"));
		let size = metadata
			.size
			.take()
			.or_else(|| positive_size(root.get("size")))
			.or_else(|| positive_size(root.get("FileSize")));

		Self {
			aip_uuid: root.get("AIPUUID").owned_text(),
			sip_name: root.get("sipName").owned_text(),
			file_uuid: root.get("FILEUUID").owned_text(),
			extension: extension_from_path(file_path.as_deref().unwrap_or_default()),
			basename: basename(file_path.as_deref().unwrap_or_default()).map(str::to_string),
			file_path,
			raw_extension: root
				.get("fileExtension")
				.text()
				.map(|ext| ext.trim_start_matches('.').to_lowercase())
				.filter(|ext| !ext.is_empty()),
			status: root.get("status").owned_text(),
			origin: root.get("origin").owned_text(),
			accession_id: root.get("accessionid").owned_text(),
			is_part_of: root
				.get("isPartOf")
				.as_list()
				.into_iter()
				.filter_map(Node::owned_text)
				.collect(),
			archivematica_version: root.get("archivematicaVersion").owned_text(),
			identifiers_missing: root.get("identifiers").item_count() == 0,
			indexed_at: root.get("indexedAt").number().and_then(from_epoch_seconds),
			size,
			metadata,
		}
	}

	/// The extension compared against the format: the indexed field, else the path suffix.
	pub fn effective_extension(&self) -> &str {
		self.raw_extension.as_deref().unwrap_or(&self.extension)
	}
}

pub fn basename(path: &str) -> Option<&str> {
	let path = path.trim();
	let name = path.rsplit(['/', '\\']).next().unwrap_or(path).trim();

	Some(name).filter(|name| !name.is_empty())
}

pub fn extension_from_path(path: &str) -> String {
	basename(path)
		.and_then(|name| name.rsplit_once('.'))
		.map(|(_, ext)| ext.trim().to_lowercase())
		.filter(|ext| !ext.is_empty())
		.unwrap_or_else(|| UNKNOWN_EXTENSION.to_string())
}

#[cfg(test)]
mod tests {
	use amo_testkit::FileDoc;
	use serde_json::json;
	use time::macros::datetime;

	use super::*;

	fn record(doc: Value) -> FileRecord {
		FileRecord::from_source(doc.as_object().expect("fixture must be an object"))
	}

	#[test]
	fn tool_version_joins_program_and_version() {
		assert_eq!(
			parse_tool_version("program=\"Fido\"; version=\"1.4.1\""),
			Some("Fido 1.4.1".to_string())
		);
		assert_eq!(parse_tool_version("program=ffmpeg"), Some("ffmpeg".to_string()));
		assert_eq!(parse_tool_version("version=2.0"), Some("2.0".to_string()));
		assert_eq!(parse_tool_version("description=checksum"), None);
		assert_eq!(parse_tool_version(""), None);
	}

	#[test]
	fn path_helpers_handle_both_separators() {
		assert_eq!(extension_from_path("objects/Photo.JPG"), "jpg");
		assert_eq!(extension_from_path("C:\\scans\\page.Tiff"), "tiff");
		assert_eq!(extension_from_path("objects/README"), UNKNOWN_EXTENSION);
		assert_eq!(extension_from_path("objects/trailing."), UNKNOWN_EXTENSION);
		assert_eq!(extension_from_path(""), UNKNOWN_EXTENSION);
		assert_eq!(basename("a/b\\c.txt"), Some("c.txt"));
		assert_eq!(basename("dir/"), None);
	}

	#[test]
	fn extracts_format_size_and_dates() {
		let doc = FileDoc::new("aip", "f1", "objects/a.tif")
			.size(2_048)
			.format("fmt/353", "Tagged Image File Format", "6.0")
			.created_by_application("2021-02-03T04:05:06Z")
			.event("ingestion", "", "", "2021-02-04T00:00:00Z")
			.event("format identification", "Positive", "program=\"Siegfried\"; version=\"1.9\"", "")
			.build();
		let rec = record(doc);

		assert_eq!(rec.size, Some(2_048));
		assert_eq!(rec.metadata.format.registry_key.as_deref(), Some("fmt/353"));
		assert_eq!(rec.metadata.format.version.as_deref(), Some("6.0"));
		assert_eq!(rec.metadata.created_by_application, Some(datetime!(2021-02-03 04:05:06 UTC)));
		assert_eq!(rec.metadata.event_dates, vec![datetime!(2021-02-04 00:00:00 UTC)]);
		assert_eq!(rec.metadata.events.len(), 2);
		assert_eq!(rec.metadata.events[1].tool_version.as_deref(), Some("Siegfried 1.9"));
		assert_eq!(rec.metadata.events[1].outcome.as_deref(), Some("Positive"));
	}

	#[test]
	fn single_object_encodings_match_list_encodings() {
		let single = FileDoc::new("aip", "f1", "objects/a.tif")
			.normalized(&["n-1"])
			.single_relationship_object()
			.event("normalization", "", "", "2020-01-01T00:00:00Z")
			.single_event_object()
			.build();
		let listed = FileDoc::new("aip", "f1", "objects/a.tif")
			.normalized(&["n-1"])
			.event("normalization", "", "", "2020-01-01T00:00:00Z")
			.build();

		assert_eq!(record(single).metadata, record(listed).metadata);
	}

	#[test]
	fn normalized_ids_are_distinct_and_sorted() {
		let rec = record(
			FileDoc::new("aip", "f1", "objects/a.tif").normalized(&["z", "a", "z", " "]).build(),
		);

		assert_eq!(rec.metadata.normalized_object_ids, vec!["a".to_string(), "z".to_string()]);
	}

	#[test]
	fn size_falls_back_to_top_level_fields() {
		let premis_zero = FileDoc::new("aip", "f1", "a.bin")
			.raw_size(json!("0"))
			.field("size", json!(-1))
			.field("FileSize", json!(77))
			.build();
		let premis_text = FileDoc::new("aip", "f1", "a.bin").raw_size(json!("512")).build();
		let nothing = FileDoc::new("aip", "f1", "a.bin").build();

		assert_eq!(record(premis_zero).size, Some(77));
		assert_eq!(record(premis_text).size, Some(512));
		assert_eq!(record(nothing).size, None);
	}

	#[test]
	fn top_level_fields_are_trimmed_and_normalized() {
		let rec = record(
			FileDoc::new("aip", "f1", " objects/Scan.PNG ")
				.extension(".JPG")
				.field("isPartOf", json!("acc-1"))
				.field("identifiers", json!([]))
				.indexed_at(1_600_000_000.0)
				.build(),
		);

		assert_eq!(rec.extension, "png");
		assert_eq!(rec.raw_extension.as_deref(), Some("jpg"));
		assert_eq!(rec.effective_extension(), "jpg");
		assert_eq!(rec.basename.as_deref(), Some("Scan.PNG"));
		assert_eq!(rec.is_part_of, vec!["acc-1".to_string()]);
		assert!(rec.identifiers_missing);
		assert_eq!(rec.indexed_at.map(OffsetDateTime::unix_timestamp), Some(1_600_000_000));
	}

	#[test]
	fn non_object_mets_yields_empty_metadata() {
		let rec = record(FileDoc::new("aip", "f1", "a.bin").build());
		let broken = record(json!({ "METS": "not-a-tree", "filePath": "a.bin" }));

		assert!(rec.metadata.format.is_unknown());
		assert_eq!(broken.metadata, ObjectMetadata::default());
	}
}
