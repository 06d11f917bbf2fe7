use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, SearchClient};

/// Reachability, cluster health and node uptime summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStats {
	pub ping_ms: i64,
	pub version: String,
	pub cluster_name: String,
	pub cluster_status: String,
	pub node_count: i64,
	pub data_node_count: i64,
	pub active_shards: i64,
	pub unassigned_shards: i64,
	pub pending_tasks: i64,
	pub node_uptime_seconds: i64,
	pub node_names: Vec<String>,
}

impl SearchClient {
	pub async fn service_stats(&self) -> Result<ServiceStats> {
		let started = Instant::now();
		let root = self.get_json("/").await?;
		let ping_ms = started.elapsed().as_millis() as i64;
		let health = self.get_json("/_cluster/health").await?;
		let nodes = self.get_json("/_nodes/stats/jvm").await?;

		Ok(parse_service_stats(ping_ms, &root, &health, &nodes))
	}
}

fn parse_service_stats(ping_ms: i64, root: &Value, health: &Value, nodes: &Value) -> ServiceStats {
	let text = |value: Option<&Value>| value.and_then(Value::as_str).unwrap_or_default().to_string();
	let number = |key: &str| health.get(key).map(as_number).unwrap_or_default() as i64;
	let mut node_names = Vec::new();
	let mut max_uptime_ms = 0_i64;

	if let Some(entries) = nodes.get("nodes").and_then(Value::as_object) {
		for node in entries.values() {
			if let Some(name) = node.get("name").and_then(Value::as_str)
				&& !name.is_empty()
			{
				node_names.push(name.to_string());
			}

			let uptime_ms =
				node.pointer("/jvm/uptime_in_millis").map(as_number).unwrap_or_default() as i64;

			max_uptime_ms = max_uptime_ms.max(uptime_ms);
		}
	}

	node_names.sort();

	ServiceStats {
		ping_ms,
		version: text(root.pointer("/version/number")),
		cluster_name: text(health.get("cluster_name")),
		cluster_status: text(health.get("status")),
		node_count: number("number_of_nodes"),
		data_node_count: number("number_of_data_nodes"),
		active_shards: number("active_shards"),
		unassigned_shards: number("unassigned_shards"),
		pending_tasks: number("number_of_pending_tasks"),
		node_uptime_seconds: max_uptime_ms / 1_000,
		node_names,
	}
}

fn as_number(value: &Value) -> f64 {
	match value {
		Value::Number(number) => number.as_f64().unwrap_or_default(),
		Value::String(raw) => raw.trim().parse().unwrap_or_default(),
		_ => 0.0,
	}
}
