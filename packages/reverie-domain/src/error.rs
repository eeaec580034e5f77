pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{zone:?} is not a recognized IANA time zone.")]
	UnknownTimeZone { zone: String },
	#[error("{value:?} is not a known mood.")]
	UnknownMood { value: String },
	#[error("{value:?} is not a known entry type.")]
	UnknownEntryKind { value: String },
	#[error("Timestamp is outside the supported range.")]
	TimestampOutOfRange,
}
