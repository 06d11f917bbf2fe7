mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, DEFAULT_AIP_INDEX, Listing, Scan, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.search.enabled && cfg.search.endpoint.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.endpoint must be non-empty when search is enabled.".to_string(),
		});
	}
	if cfg.search.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.lookup_limit == 0 {
		return Err(Error::Validation {
			message: "search.lookup_limit must be greater than zero.".to_string(),
		});
	}

	let listing = &cfg.search.listing;

	if listing.max_limit == 0 {
		return Err(Error::Validation {
			message: "search.listing.max_limit must be greater than zero.".to_string(),
		});
	}
	if listing.default_limit == 0 || listing.default_limit > listing.max_limit {
		return Err(Error::Validation {
			message: "search.listing.default_limit must be in the range 1-max_limit.".to_string(),
		});
	}
	if listing.over_fetch_factor == 0 {
		return Err(Error::Validation {
			message: "search.listing.over_fetch_factor must be greater than zero.".to_string(),
		});
	}
	if listing.max_pages == 0 {
		return Err(Error::Validation {
			message: "search.listing.max_pages must be greater than zero.".to_string(),
		});
	}

	let scan = &cfg.search.scan;

	if scan.max_page_size == 0 {
		return Err(Error::Validation {
			message: "search.scan.max_page_size must be greater than zero.".to_string(),
		});
	}
	if scan.default_page_size == 0 || scan.default_page_size > scan.max_page_size {
		return Err(Error::Validation {
			message: "search.scan.default_page_size must be in the range 1-max_page_size."
				.to_string(),
		});
	}
	if scan.max_pages == 0 {
		return Err(Error::Validation {
			message: "search.scan.max_pages must be greater than zero.".to_string(),
		});
	}

	if let Some(deadline_ms) = scan.deadline_ms
		&& deadline_ms == 0
	{
		return Err(Error::Validation {
			message: "search.scan.deadline_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.endpoint = cfg.search.endpoint.trim().trim_end_matches('/').to_string();

	if cfg.search.aip_index.trim().is_empty() {
		cfg.search.aip_index = DEFAULT_AIP_INDEX.to_string();
	} else {
		cfg.search.aip_index = cfg.search.aip_index.trim().trim_matches('/').to_string();
	}
}
