//! Expected file extensions for the formats the pipeline identifies most often.

static BY_REGISTRY_KEY: [(&str, &[&str]); 7] = [
	("fmt/353", &["tif", "tiff"]),
	("fmt/11", &["png"]),
	("fmt/4", &["gif"]),
	("fmt/91", &["svg"]),
	("fmt/43", &["jpg", "jpeg"]),
	("fmt/402", &["tga"]),
	("x-fmt/392", &["jp2", "j2k", "jpf"]),
];

// Checked in order; the first description contained in the format name wins.
static BY_FORMAT_NAME: [(&str, &[&str]); 5] = [
	("portable network graphics", &["png"]),
	("graphics interchange format", &["gif"]),
	("scalable vector graphics", &["svg"]),
	("jpeg", &["jpg", "jpeg"]),
	("tiff", &["tif", "tiff"]),
];

pub fn expected_extensions(
	registry_key: Option<&str>,
	format_name: Option<&str>,
) -> Option<&'static [&'static str]> {
	let key = registry_key.map(|key| key.trim().to_lowercase()).unwrap_or_default();

	if let Some((_, extensions)) = BY_REGISTRY_KEY.iter().find(|(known, _)| *known == key) {
		return Some(*extensions);
	}

	let name = format_name.map(|name| name.trim().to_lowercase()).unwrap_or_default();

	if name.is_empty() {
		return None;
	}

	BY_FORMAT_NAME
		.iter()
		.find(|(description, _)| name.contains(description))
		.map(|(_, extensions)| *extensions)
}

/// Whether `extension` contradicts the identified format.
///
/// A format with no known expectation never mismatches, and neither does an empty extension.
pub fn is_extension_mismatch(
	registry_key: Option<&str>,
	format_name: Option<&str>,
	extension: &str,
) -> bool {
	let extension = extension.trim().trim_start_matches('.').to_lowercase();

	if extension.is_empty() {
		return false;
	}

	match expected_extensions(registry_key, format_name) {
		Some(expected) => !expected.contains(&extension.as_str()),
		None => false,
	}
}
