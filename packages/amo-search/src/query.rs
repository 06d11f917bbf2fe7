use serde_json::{Map, Value, json};

pub const AIP_UUID_FIELD: &str = "AIPUUID";
pub const FILE_UUID_FIELD: &str = "FILEUUID";
pub const FILE_PATH_SORT_FIELD: &str = "filePath.raw";

pub const LISTING_SOURCE_FIELDS: [&str; 2] = ["AIPUUID", "sipName"];
pub const SCAN_SOURCE_FIELDS: [&str; 15] = [
	"AIPUUID",
	"sipName",
	"FILEUUID",
	"filePath",
	"fileExtension",
	"status",
	"indexedAt",
	"size",
	"FileSize",
	"origin",
	"accessionid",
	"isPartOf",
	"identifiers",
	"archivematicaVersion",
	"METS",
];

/// Every AIP file, ordered so that hits of one AIP are contiguous.
pub fn listing_body(size: u32, search_after: Option<&[Value]>) -> Value {
	let mut body = json!({
		"size": size,
		"_source": LISTING_SOURCE_FIELDS,
		"sort": [
			{ AIP_UUID_FIELD: "asc" },
			{ FILE_UUID_FIELD: "asc" },
		],
	});

	attach_search_after(&mut body, search_after);

	body
}

/// All files of one AIP, matched on both the keyword and the analyzed field.
pub fn scan_body(aip_uuid: &str, size: u32, search_after: Option<&[Value]>) -> Value {
	let mut body = json!({
		"size": size,
		"_source": SCAN_SOURCE_FIELDS,
		"query": any_term(&[AIP_UUID_FIELD], aip_uuid),
		"sort": [
			{ FILE_UUID_FIELD: "asc" },
			{ FILE_PATH_SORT_FIELD: "asc" },
		],
	});

	attach_search_after(&mut body, search_after);

	body
}

pub fn transfer_body(transfer_uuid: &str, limit: u32) -> Value {
	let mut query = any_term(&["transferUUID", "SIPUUID", AIP_UUID_FIELD], transfer_uuid);

	if let Some(should) =
		query.pointer_mut("/bool/should").and_then(|should| should.as_array_mut())
	{
		should.push(json!({ "query_string": { "query": format!("\"{transfer_uuid}\"") } }));
	}

	json!({ "size": limit, "query": query })
}

fn any_term(fields: &[&str], value: &str) -> Value {
	let mut should = Vec::with_capacity(fields.len() * 2);

	for field in fields {
		should.push(json!({ "term": { format!("{field}.keyword"): value } }));
		should.push(json!({ "term": { *field: value } }));
	}

	json!({ "bool": { "should": should, "minimum_should_match": 1 } })
}

fn attach_search_after(body: &mut Value, search_after: Option<&[Value]>) {
	let Some(values) = search_after.filter(|values| !values.is_empty()) else { return };

	if let Some(object) = body.as_object_mut() {
		object.insert("search_after".to_string(), Value::Array(values.to_vec()));
	}
}

pub fn sort_fields(body: &Value) -> Vec<String> {
	body.get("sort")
		.and_then(Value::as_array)
		.map(|entries| {
			entries
				.iter()
				.filter_map(Value::as_object)
				.filter_map(|entry: &Map<String, Value>| entry.keys().next().cloned())
				.collect()
		})
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn listing_sorts_by_aip_then_file() {
		let body = listing_body(30, None);

		assert_eq!(body["size"], 30);
		assert_eq!(sort_fields(&body), vec!["AIPUUID".to_string(), "FILEUUID".to_string()]);
		assert!(body.get("search_after").is_none());
		assert!(body.get("query").is_none());
	}

	#[test]
	fn scan_filters_on_keyword_and_analyzed_field() {
		let after = [json!("file-1"), json!("a/b.tif")];
		let body = scan_body("aip-1", 500, Some(&after));
		let should = body
			.pointer("/query/bool/should")
			.and_then(Value::as_array)
			.expect("scan query must have should clauses");

		assert_eq!(should.len(), 2);
		assert_eq!(should[0]["term"]["AIPUUID.keyword"], "aip-1");
		assert_eq!(should[1]["term"]["AIPUUID"], "aip-1");
		assert_eq!(body["query"]["bool"]["minimum_should_match"], 1);
		assert_eq!(body["search_after"], json!(["file-1", "a/b.tif"]));
		assert_eq!(sort_fields(&body), vec!["FILEUUID".to_string(), "filePath.raw".to_string()]);
	}

	#[test]
	fn empty_search_after_is_omitted() {
		let body = scan_body("aip-1", 10, Some(&[]));

		assert!(body.get("search_after").is_none());
	}

	#[test]
	fn transfer_lookup_matches_every_identifier_field() {
		let body = transfer_body("t-1", 5);
		let should = body
			.pointer("/query/bool/should")
			.and_then(Value::as_array)
			.expect("transfer query must have should clauses");

		assert_eq!(should.len(), 7);
		assert_eq!(should[6]["query_string"]["query"], "\"t-1\"");
	}
}
