use std::sync::Arc;

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use amo_analytics::ArtifactStats;
use amo_search::ServiceStats;
use amo_service::{
	AnalyticsService, ArtifactListEntry, Error, ListRequest, ScanSignal, StatsRequest,
	TransferRequest, TransferResponse,
};

use crate::state::AppState;

/// Largest `limit` query value honored; anything else falls back to the configured default.
pub const MAX_QUERY_LIMIT: i64 = 1_000;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/ready", get(ready))
		.route("/api/v1/aips", get(list_aips))
		.route("/api/v1/aips/{aip_uuid}/stats", get(aip_stats))
		.route("/api/v1/transfers/{transfer_uuid}/search", get(transfer_search))
		.route("/api/v1/status/search", get(search_status))
		.with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
	pub limit: Option<String>,
	pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<M, D> {
	pub meta: M,
	pub data: D,
}

#[derive(Debug, Serialize)]
pub struct ListMeta {
	pub index: String,
	pub limit: u32,
	pub count: usize,
	pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsMeta {
	pub index: String,
	pub aip_uuid: String,
}

#[derive(Debug, Serialize)]
pub struct SearchStatus {
	pub enabled: bool,
	pub ok: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stats: Option<ServiceStats>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

async fn health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
	Json(serde_json::json!({ "ready": true, "search_enabled": state.service.is_some() }))
}

async fn list_aips(
	State(state): State<AppState>,
	Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<ListMeta, Vec<ArtifactListEntry>>>, ApiError> {
	let service = enabled(&state)?;
	let req =
		ListRequest { index: None, limit: parse_limit(query.limit.as_deref()), cursor: query.cursor };
	let res = service.list_artifacts(req, &ScanSignal::new()).await?;
	let meta = ListMeta {
		index: res.index,
		limit: res.limit,
		count: res.items.len(),
		next_cursor: res.next_cursor,
	};

	Ok(Json(Envelope { meta, data: res.items }))
}

async fn aip_stats(
	State(state): State<AppState>,
	Path(aip_uuid): Path<String>,
	Query(query): Query<PageQuery>,
) -> Result<Json<Envelope<StatsMeta, ArtifactStats>>, ApiError> {
	let service = enabled(&state)?;
	let req = StatsRequest {
		index: None,
		aip_uuid: aip_uuid.clone(),
		page_size: parse_limit(query.limit.as_deref()),
	};
	let stats = service.artifact_stats(req, &ScanSignal::new()).await?;
	let meta = StatsMeta {
		index: service.resolve_index(None).to_string(),
		aip_uuid: aip_uuid.trim().to_string(),
	};

	Ok(Json(Envelope { meta, data: stats }))
}

async fn transfer_search(
	State(state): State<AppState>,
	Path(transfer_uuid): Path<String>,
	Query(query): Query<PageQuery>,
) -> Result<Json<TransferResponse>, ApiError> {
	let service = enabled(&state)?;
	let req = TransferRequest { transfer_uuid, limit: parse_limit(query.limit.as_deref()) };

	Ok(Json(service.search_transfer(req, &ScanSignal::new()).await?))
}

async fn search_status(State(state): State<AppState>) -> Json<SearchStatus> {
	let Some(service) = state.service.as_ref() else {
		return Json(SearchStatus { enabled: false, ok: false, stats: None, error: None });
	};

	match service.service_stats(&ScanSignal::new()).await {
		Ok(stats) => Json(SearchStatus { enabled: true, ok: true, stats: Some(stats), error: None }),
		Err(err) => {
			tracing::warn!(error = %err, "Search status probe failed.");

			Json(SearchStatus { enabled: true, ok: false, stats: None, error: Some(err.to_string()) })
		},
	}
}

fn enabled(state: &AppState) -> Result<&Arc<AnalyticsService>, ApiError> {
	state.service.as_ref().ok_or_else(|| {
		ApiError::new(
			StatusCode::SERVICE_UNAVAILABLE,
			"search_disabled",
			"Search integration is disabled.",
		)
	})
}

/// `Some` only for integers in `1..=MAX_QUERY_LIMIT`.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
	raw?.trim().parse::<i64>().ok().filter(|limit| (1..=MAX_QUERY_LIMIT).contains(limit))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let (status, code) = match &err {
			Error::InvalidIdentifier { .. } => (StatusCode::BAD_REQUEST, "invalid_identifier"),
			Error::MalformedCursor { .. } => (StatusCode::BAD_REQUEST, "malformed_cursor"),
			Error::IndexUnavailable { .. } => (StatusCode::BAD_GATEWAY, "index_unavailable"),
			Error::InvalidConfig { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "invalid_config"),
			Error::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, "cancelled"),
			Error::DeadlineExceeded => (StatusCode::GATEWAY_TIMEOUT, "deadline_exceeded"),
		};

		if status.is_server_error() {
			tracing::warn!(error = %err, error_code = code, "Request failed.");
		}

		Self::new(status, code, err.to_string())
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
