pub mod fixtures;

mod error;

pub use error::{Error, Result};
pub use fixtures::{FileDoc, image_docs};

use std::{
	cmp::Ordering as CmpOrdering,
	future::IntoFuture,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing,
};
use serde_json::{Map, Value, json};
use tokio::{net::TcpListener, sync::oneshot};

/// In-process stand-in for an Elasticsearch node.
///
/// Serves `_search` with `term`/`query_string` filtering, multi-field ascending sort,
/// `search_after` and `_source` filtering, plus the cluster endpoints read by the status probe.
pub struct FakeSearchIndex {
	endpoint: String,
	state: Arc<FakeState>,
	shutdown: Option<oneshot::Sender<()>>,
}
impl FakeSearchIndex {
	pub async fn start(documents: Vec<Value>) -> Result<Self> {
		let state = Arc::new(FakeState {
			documents,
			requests: Mutex::new(Vec::new()),
			served: AtomicUsize::new(0),
			fail_from: AtomicUsize::new(usize::MAX),
		});
		let app = Router::new()
			.route("/", routing::get(root))
			.route("/_cluster/health", routing::get(cluster_health))
			.route("/_nodes/stats/jvm", routing::get(node_stats))
			.route("/_search", routing::post(search_all))
			.route("/{index}/_search", routing::post(search_index))
			.with_state(state.clone());
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let (tx, rx) = oneshot::channel();
		let server = axum::serve(listener, app).with_graceful_shutdown(async move {
			let _ = rx.await;
		});

		tokio::spawn(async move {
			let _ = server.into_future().await;
		});

		Ok(Self { endpoint: format!("http://{addr}"), state, shutdown: Some(tx) })
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Every `_search` body received so far, with the requested path under `"_path"`.
	pub fn requests(&self) -> Vec<Value> {
		self.state.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	/// Answers `503` to the `n`-th search request (zero-based) and every one after it.
	pub fn fail_from_request(&self, n: usize) {
		self.state.fail_from.store(n, Ordering::SeqCst);
	}
}
impl Drop for FakeSearchIndex {
	fn drop(&mut self) {
		if let Some(tx) = self.shutdown.take() {
			let _ = tx.send(());
		}
	}
}

struct FakeState {
	documents: Vec<Value>,
	requests: Mutex<Vec<Value>>,
	served: AtomicUsize,
	fail_from: AtomicUsize,
}
impl FakeState {
	fn record(&self, path: String, body: &Value) -> bool {
		let mut recorded = body.clone();

		if let Some(object) = recorded.as_object_mut() {
			object.insert("_path".to_string(), Value::String(path));
		}

		self.requests.lock().unwrap_or_else(|err| err.into_inner()).push(recorded);

		let ordinal = self.served.fetch_add(1, Ordering::SeqCst);

		ordinal < self.fail_from.load(Ordering::SeqCst)
	}

	fn search(&self, index: &str, body: &Value) -> Value {
		let sort_fields = sort_fields(body);
		let mut matched: Vec<(usize, &Value, Vec<Value>)> = self
			.documents
			.iter()
			.enumerate()
			.filter(|(_, doc)| matches_query(doc, body.get("query")))
			.map(|(ordinal, doc)| (ordinal, doc, sort_key(doc, &sort_fields)))
			.collect();
		let total = matched.len();

		matched.sort_by(|lhs, rhs| compare_keys(&lhs.2, &rhs.2).then(lhs.0.cmp(&rhs.0)));

		if let Some(after) = body.get("search_after").and_then(Value::as_array) {
			matched.retain(|(_, _, key)| compare_keys(key, after) == CmpOrdering::Greater);
		}

		let size = body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;
		let source_fields = body.get("_source").and_then(Value::as_array);
		let hits: Vec<Value> = matched
			.into_iter()
			.take(size)
			.map(|(ordinal, doc, key)| {
				let mut hit = json!({
					"_index": index,
					"_id": format!("doc-{ordinal}"),
					"_score": if sort_fields.is_empty() { json!(1.0) } else { Value::Null },
					"_source": project_source(doc, source_fields),
				});

				if !sort_fields.is_empty()
					&& let Some(object) = hit.as_object_mut()
				{
					object.insert("sort".to_string(), Value::Array(key));
				}

				hit
			})
			.collect();

		json!({ "took": 1, "hits": { "total": { "value": total, "relation": "eq" }, "hits": hits } })
	}
}

async fn search_index(
	State(state): State<Arc<FakeState>>,
	Path(index): Path<String>,
	Json(body): Json<Value>,
) -> Response {
	if !state.record(format!("/{index}/_search"), &body) {
		return unavailable();
	}

	(StatusCode::OK, Json(state.search(&index, &body))).into_response()
}

async fn search_all(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
	if !state.record("/_search".to_string(), &body) {
		return unavailable();
	}

	(StatusCode::OK, Json(state.search("aipfiles", &body))).into_response()
}

async fn root() -> Json<Value> {
	Json(json!({ "name": "fake-node", "version": { "number": "6.8.23" } }))
}

async fn cluster_health() -> Json<Value> {
	Json(json!({
		"cluster_name": "fake-cluster",
		"status": "green",
		"number_of_nodes": 1,
		"number_of_data_nodes": 1,
		"active_shards": 5,
		"unassigned_shards": 0,
		"number_of_pending_tasks": 0
	}))
}

async fn node_stats() -> Json<Value> {
	Json(json!({ "nodes": { "n1": { "name": "fake-node", "jvm": { "uptime_in_millis": 61_000 } } } }))
}

fn unavailable() -> Response {
	(StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": "fake index unavailable" })))
		.into_response()
}

fn sort_fields(body: &Value) -> Vec<String> {
	body.get("sort")
		.and_then(Value::as_array)
		.map(|entries| {
			entries
				.iter()
				.filter_map(Value::as_object)
				.filter_map(|entry| entry.keys().next().cloned())
				.collect()
		})
		.unwrap_or_default()
}

fn base_field(field: &str) -> &str {
	field.trim_end_matches(".keyword").trim_end_matches(".raw")
}

fn sort_key(doc: &Value, fields: &[String]) -> Vec<Value> {
	fields
		.iter()
		.map(|field| match doc.get(base_field(field)) {
			Some(Value::String(text)) => Value::String(text.clone()),
			Some(Value::Number(number)) => Value::String(number.to_string()),
			_ => Value::String(String::new()),
		})
		.collect()
}

fn compare_keys(lhs: &[Value], rhs: &[Value]) -> CmpOrdering {
	for (l, r) in lhs.iter().zip(rhs.iter()) {
		let ordering = l.as_str().unwrap_or_default().cmp(r.as_str().unwrap_or_default());

		if ordering != CmpOrdering::Equal {
			return ordering;
		}
	}

	lhs.len().cmp(&rhs.len())
}

fn matches_query(doc: &Value, query: Option<&Value>) -> bool {
	let Some(should) = query.and_then(|query| query.pointer("/bool/should")).and_then(Value::as_array)
	else {
		return true;
	};

	should.iter().any(|clause| {
		if let Some(term) = clause.get("term").and_then(Value::as_object) {
			return term.iter().any(|(field, expected)| {
				doc.get(base_field(field)).is_some_and(|actual| actual == expected)
			});
		}
		if let Some(raw) = clause.pointer("/query_string/query").and_then(Value::as_str) {
			let needle = raw.trim_matches('"');

			return doc
				.as_object()
				.is_some_and(|fields| fields.values().any(|value| value.as_str() == Some(needle)));
		}

		false
	})
}

fn project_source(doc: &Value, fields: Option<&Vec<Value>>) -> Value {
	let Some(fields) = fields else { return doc.clone() };
	let Some(object) = doc.as_object() else { return doc.clone() };
	let projected: Map<String, Value> = object
		.iter()
		.filter(|(key, _)| fields.iter().any(|field| field.as_str() == Some(key.as_str())))
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect();

	Value::Object(projected)
}
