use serde_json::{Map, Value, json};

/// Builds one `aipfiles` document with an embedded METS/PREMIS tree.
#[derive(Debug, Clone, Default)]
pub struct FileDoc {
	top: Map<String, Value>,
	size: Option<Value>,
	registry_key: Option<String>,
	format_name: Option<String>,
	format_version: Option<String>,
	created_by_application: Option<String>,
	relationships: Vec<String>,
	single_relationship: bool,
	events: Vec<Value>,
	single_event: bool,
}
impl FileDoc {
	pub fn new(aip_uuid: &str, file_uuid: &str, file_path: &str) -> Self {
		let mut doc = Self::default();

		doc.top.insert("AIPUUID".to_string(), json!(aip_uuid));
		doc.top.insert("FILEUUID".to_string(), json!(file_uuid));
		doc.top.insert("filePath".to_string(), json!(file_path));
		doc.top.insert("identifiers".to_string(), json!([{ "value": file_uuid }]));

		doc
	}

	/// Sets or overrides any top-level field.
	pub fn field(mut self, key: &str, value: Value) -> Self {
		self.top.insert(key.to_string(), value);

		self
	}

	pub fn without(mut self, key: &str) -> Self {
		self.top.remove(key);

		self
	}

	pub fn sip_name(self, name: &str) -> Self {
		self.field("sipName", json!(name))
	}

	pub fn status(self, status: &str) -> Self {
		self.field("status", json!(status))
	}

	pub fn extension(self, extension: &str) -> Self {
		self.field("fileExtension", json!(extension))
	}

	pub fn indexed_at(self, epoch_seconds: f64) -> Self {
		self.field("indexedAt", json!(epoch_seconds))
	}

	/// PREMIS object-characteristics size.
	pub fn size(mut self, bytes: i64) -> Self {
		self.size = Some(json!(bytes));

		self
	}

	pub fn raw_size(mut self, value: Value) -> Self {
		self.size = Some(value);

		self
	}

	pub fn format(mut self, registry_key: &str, name: &str, version: &str) -> Self {
		let keep = |value: &str| (!value.is_empty()).then(|| value.to_string());

		self.registry_key = keep(registry_key);
		self.format_name = keep(name);
		self.format_version = keep(version);

		self
	}

	pub fn created_by_application(mut self, timestamp: &str) -> Self {
		self.created_by_application = Some(timestamp.to_string());

		self
	}

	pub fn normalized(mut self, related_ids: &[&str]) -> Self {
		self.relationships = related_ids.iter().map(|id| id.to_string()).collect();

		self
	}

	/// Encodes a lone relationship as an object instead of a one-element list.
	pub fn single_relationship_object(mut self) -> Self {
		self.single_relationship = true;

		self
	}

	pub fn event(mut self, event_type: &str, outcome: &str, detail: &str, date: &str) -> Self {
		let mut event = Map::new();

		if !event_type.is_empty() {
			event.insert("premis:eventType".to_string(), json!(event_type));
		}
		if !date.is_empty() {
			event.insert("premis:eventDateTime".to_string(), json!(date));
		}
		if !outcome.is_empty() {
			event.insert(
				"premis:eventOutcomeInformation_dict".to_string(),
				json!({ "premis:eventOutcome": outcome }),
			);
		}
		if !detail.is_empty() {
			event.insert(
				"premis:eventDetailInformation_dict".to_string(),
				json!({ "premis:eventDetail": detail }),
			);
		}

		self.events.push(json!({
			"mets:mdWrap_dict": { "mets:xmlData_dict": { "premis:event_dict": event } }
		}));

		self
	}

	/// Encodes a lone event as an object instead of a one-element list.
	pub fn single_event_object(mut self) -> Self {
		self.single_event = true;

		self
	}

	pub fn build(self) -> Value {
		let mut characteristics = Map::new();

		if let Some(size) = self.size {
			characteristics.insert("premis:size".to_string(), size);
		}

		let mut designation = Map::new();

		if let Some(name) = self.format_name {
			designation.insert("premis:formatName".to_string(), json!(name));
		}
		if let Some(version) = self.format_version {
			designation.insert("premis:formatVersion".to_string(), json!(version));
		}

		let mut format = Map::new();

		if !designation.is_empty() {
			format.insert("premis:formatDesignation_dict".to_string(), Value::Object(designation));
		}
		if let Some(key) = self.registry_key {
			format.insert(
				"premis:formatRegistry_dict".to_string(),
				json!({ "premis:formatRegistryKey": key }),
			);
		}
		if !format.is_empty() {
			characteristics.insert("premis:format_dict".to_string(), Value::Object(format));
		}
		if let Some(created) = self.created_by_application {
			characteristics.insert(
				"premis:creatingApplication_dict".to_string(),
				json!({ "premis:dateCreatedByApplication": created }),
			);
		}

		let mut object = Map::new();

		object.insert(
			"premis:objectCharacteristics_dict".to_string(),
			Value::Object(characteristics),
		);

		let relationships: Vec<Value> = self
			.relationships
			.iter()
			.map(|id| {
				json!({
					"premis:relationshipType": "derivation",
					"premis:relatedObjectIdentifier_dict": {
						"premis:relatedObjectIdentifierType": "UUID",
						"premis:relatedObjectIdentifierValue": id
					}
				})
			})
			.collect();

		if let Some(encoded) = maybe_single(relationships, self.single_relationship) {
			object.insert("premis:relationship_dict".to_string(), encoded);
		}

		let mut amd = Map::new();

		amd.insert(
			"mets:techMD_dict".to_string(),
			json!({ "mets:mdWrap_dict": { "mets:xmlData_dict": { "premis:object_dict": object } } }),
		);

		if let Some(encoded) = maybe_single(self.events, self.single_event) {
			amd.insert("mets:digiprovMD_dict".to_string(), encoded);
		}

		let mut top = self.top;

		top.insert("METS".to_string(), json!({ "amdSec": { "mets:amdSec_dict": amd } }));

		Value::Object(top)
	}
}

fn maybe_single(mut items: Vec<Value>, single: bool) -> Option<Value> {
	match items.len() {
		0 => None,
		1 if single => items.pop(),
		_ => Some(Value::Array(items)),
	}
}

/// `count` image files for one AIP, each with a distinct size.
pub fn image_docs(aip_uuid: &str, count: usize) -> Vec<Value> {
	(0..count)
		.map(|n| {
			FileDoc::new(aip_uuid, &format!("{aip_uuid}-file-{n:04}"), &format!("objects/img-{n}.tif"))
				.sip_name(&format!("{aip_uuid}-sip"))
				.status("UPLOADED")
				.extension("tif")
				.size(1_000 + n as i64)
				.format("fmt/353", "Tagged Image File Format", "")
				.build()
		})
		.collect()
}
