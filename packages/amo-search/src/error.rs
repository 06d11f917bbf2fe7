pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Malformed cursor: {message}")]
	MalformedCursor { message: String },
	#[error("{message}")]
	InvalidConfig { message: String },
}
impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::IndexUnavailable { message: err.to_string() }
	}
}
