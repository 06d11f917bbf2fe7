use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use amo_api::{routes, state::AppState};
use amo_config::{Config, Search, Service};
use amo_service::AnalyticsService;
use amo_testkit::{FakeSearchIndex, FileDoc, image_docs};

fn test_config(endpoint: &str, enabled: bool) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		search: Search {
			enabled,
			endpoint: endpoint.to_string(),
			timeout_ms: 2_000,
			aip_index: "aipfiles".to_string(),
			lookup_limit: 5,
			listing: Default::default(),
			scan: Default::default(),
		},
	}
}

fn corpus() -> Vec<Value> {
	let mut docs = image_docs("aip-7", 7);

	docs.extend(image_docs("aip-3", 3));
	docs.push(
		FileDoc::new("aip-1", "aip-1-file", "objects/note.txt")
			.sip_name("aip-1-sip")
			.field("transferUUID", Value::String("tr-1".to_string()))
			.build(),
	);

	docs
}

fn app(index: &FakeSearchIndex) -> Router {
	let state = AppState::new(&test_config(index.endpoint(), true)).expect("Failed to build state.");

	routes::router(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
	let response = app
		.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if body.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&body).expect("Failed to parse response.")
	};

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let index = FakeSearchIndex::start(Vec::new()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/health").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn lists_distinct_aips_in_an_envelope() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/api/v1/aips?limit=10").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["meta"]["index"], "aipfiles");
	assert_eq!(json["meta"]["limit"], 10);
	assert_eq!(json["meta"]["count"], 3);
	assert_eq!(json["meta"]["next_cursor"], Value::Null);
	assert_eq!(json["data"][0]["aip_uuid"], "aip-1");
	assert_eq!(json["data"][0]["sip_name"], "aip-1-sip");
}

#[tokio::test]
async fn out_of_range_limits_use_the_default() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");

	for uri in ["/api/v1/aips?limit=5000", "/api/v1/aips?limit=0", "/api/v1/aips?limit=abc"] {
		let (status, json) = get(app(&index), uri).await;

		assert_eq!(status, StatusCode::OK, "{uri}");
		assert_eq!(json["meta"]["limit"], 100, "{uri}");
	}
}

#[tokio::test]
async fn stats_endpoint_scans_the_whole_aip() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/api/v1/aips/aip-7/stats?limit=2").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["meta"]["aip_uuid"], "aip-7");
	assert_eq!(json["data"]["files_total"], 7);
	assert_eq!(json["data"]["largest_files"].as_array().map(Vec::len), Some(7));
	assert_eq!(json["data"]["min_created_by_app_date"], Value::Null);
	assert_eq!(index.requests()[0]["size"], 2);
}

#[tokio::test]
async fn malformed_cursor_is_a_bad_request() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/api/v1/aips?cursor=***").await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "malformed_cursor");
	assert!(index.requests().is_empty());
}

#[tokio::test]
async fn blank_aip_id_is_a_bad_request() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/api/v1/aips/%20/stats").await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_identifier");
}

#[tokio::test]
async fn index_failure_is_a_bad_gateway() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");

	index.fail_from_request(0);

	let (status, json) = get(app(&index), "/api/v1/aips/aip-7/stats").await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "index_unavailable");
}

#[tokio::test]
async fn disabled_search_answers_service_unavailable() {
	let state = AppState::new(&test_config("http://127.0.0.1:9", false)).expect("state");
	let app = routes::router(state);
	let (status, json) = get(app.clone(), "/api/v1/aips").await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(json["error_code"], "search_disabled");

	let (status, json) = get(app, "/api/v1/status/search").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["enabled"], false);
	assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn search_status_reports_cluster_health() {
	let index = FakeSearchIndex::start(Vec::new()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/api/v1/status/search").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["ok"], true);
	assert_eq!(json["stats"]["cluster_name"], "fake-cluster");
	assert_eq!(json["stats"]["cluster_status"], "green");
}

#[tokio::test]
async fn transfer_search_returns_matching_documents() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let (status, json) = get(app(&index), "/api/v1/transfers/tr-1/search").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["transfer_uuid"], "tr-1");
	assert_eq!(json["hits"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["hits"][0]["source"]["AIPUUID"], "aip-1");
	assert_eq!(index.requests()[0]["_path"], "/_search");
}

#[tokio::test]
async fn injected_service_is_served() {
	let index = FakeSearchIndex::start(corpus()).await.expect("Failed to start fake index.");
	let service = AnalyticsService::new(test_config(index.endpoint(), true).search).expect("service");
	let app = routes::router(AppState::with_service(Some(Arc::new(service))));
	let (status, json) = get(app, "/ready").await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["search_enabled"], true);
}
