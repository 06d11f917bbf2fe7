pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Malformed cursor: {message}")]
	MalformedCursor { message: String },
	#[error("Invalid identifier: {message}")]
	InvalidIdentifier { message: String },
	#[error("Invalid configuration: {message}")]
	InvalidConfig { message: String },
	#[error("Scan was cancelled.")]
	Cancelled,
	#[error("Scan deadline exceeded.")]
	DeadlineExceeded,
}
impl From<amo_search::Error> for Error {
	fn from(err: amo_search::Error) -> Self {
		match err {
			amo_search::Error::IndexUnavailable { message } => Self::IndexUnavailable { message },
			amo_search::Error::MalformedCursor { message } => Self::MalformedCursor { message },
			amo_search::Error::InvalidConfig { message } => Self::InvalidConfig { message },
		}
	}
}
