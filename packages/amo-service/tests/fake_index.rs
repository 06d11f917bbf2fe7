use std::collections::HashSet;

use serde_json::{Value, json};

use amo_service::{AnalyticsService, Error, ListRequest, ScanSignal, StatsRequest};
use amo_testkit::{FakeSearchIndex, FileDoc, image_docs};

fn search_config(endpoint: &str) -> amo_config::Search {
	amo_config::Search {
		enabled: true,
		endpoint: endpoint.to_string(),
		timeout_ms: 2_000,
		aip_index: "aipfiles".to_string(),
		lookup_limit: 5,
		listing: Default::default(),
		scan: Default::default(),
	}
}

fn corpus() -> Vec<Value> {
	let mut docs = image_docs("aip-7", 7);

	docs.extend(image_docs("aip-2", 2));
	docs.extend(image_docs("aip-4", 4));
	docs.push(FileDoc::new("aip-9", "aip-9-file", "objects/readme.txt").sip_name("aip-9-sip").build());

	docs
}

#[tokio::test]
async fn seven_hits_scan_to_seven_files() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let svc = AnalyticsService::new(search_config(index.endpoint())).expect("service");
	let stats = svc
		.artifact_stats(
			StatsRequest { aip_uuid: "aip-7".to_string(), page_size: Some(3), ..Default::default() },
			&ScanSignal::new(),
		)
		.await
		.expect("stats");

	assert_eq!(stats.files_total, 7);
	assert_eq!(stats.unique_file_uuids, 7);
	assert_eq!(stats.sip_names, vec!["aip-7-sip".to_string()]);
	assert_eq!(stats.largest_files[0].bytes, 1_006);

	let requests = index.requests();

	assert_eq!(requests.len(), 4);
	assert!(requests.iter().all(|body| body["_path"] == "/aipfiles/_search"));
	assert!(requests[0].get("search_after").is_none());
	assert_eq!(requests[0]["size"], json!(3));
}

#[tokio::test]
async fn listing_pages_cover_distinct_aips() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let svc = AnalyticsService::new(search_config(index.endpoint())).expect("service");
	let first = svc
		.list_artifacts(ListRequest { limit: Some(1), ..Default::default() }, &ScanSignal::new())
		.await
		.expect("first page");

	assert_eq!(first.items.len(), 1);
	assert_eq!(first.items[0].aip_uuid, "aip-2");

	let mut seen: HashSet<String> = first.items.iter().map(|item| item.aip_uuid.clone()).collect();
	let second = svc
		.list_artifacts(
			ListRequest { limit: Some(50), cursor: first.next_cursor.clone(), ..Default::default() },
			&ScanSignal::new(),
		)
		.await
		.expect("second page");

	for item in &second.items {
		assert!(seen.insert(item.aip_uuid.clone()), "{} listed twice", item.aip_uuid);
	}

	assert!(seen.contains("aip-9"));
	assert_eq!(second.next_cursor, None);
}

#[tokio::test]
async fn index_failure_mid_scan_returns_no_summary() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");

	index.fail_from_request(1);

	let svc = AnalyticsService::new(search_config(index.endpoint())).expect("service");
	let err = svc
		.artifact_stats(
			StatsRequest { aip_uuid: "aip-7".to_string(), page_size: Some(3), ..Default::default() },
			&ScanSignal::new(),
		)
		.await
		.expect_err("scan must fail");

	assert!(matches!(err, Error::IndexUnavailable { .. }));
}
