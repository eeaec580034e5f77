pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<reverie_storage::Error> for Error {
	fn from(err: reverie_storage::Error) -> Self {
		match err {
			reverie_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			reverie_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			reverie_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<reverie_providers::Error> for Error {
	fn from(err: reverie_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<reverie_domain::Error> for Error {
	fn from(err: reverie_domain::Error) -> Self {
		match err {
			reverie_domain::Error::UnknownTimeZone { .. } =>
				Self::InvalidRequest { message: err.to_string() },
			// Moods, entry kinds and timestamps only reach the domain layer from stored rows.
			_ => Self::Storage { message: err.to_string() },
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
