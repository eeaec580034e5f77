use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
	Calm,
	Happy,
	Anxious,
	Sad,
	Grateful,
	Reflective,
}
impl Mood {
	pub const ALL: [Self; 6] =
		[Self::Calm, Self::Happy, Self::Anxious, Self::Sad, Self::Grateful, Self::Reflective];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Calm => "calm",
			Self::Happy => "happy",
			Self::Anxious => "anxious",
			Self::Sad => "sad",
			Self::Grateful => "grateful",
			Self::Reflective => "reflective",
		}
	}
}
impl fmt::Display for Mood {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Mood {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|mood| mood.as_str() == value)
			.ok_or_else(|| Error::UnknownMood { value: value.to_string() })
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
	Regular,
	Chat,
}
impl EntryKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Regular => "regular",
			Self::Chat => "chat",
		}
	}
}
impl FromStr for EntryKind {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"regular" => Ok(Self::Regular),
			"chat" => Ok(Self::Chat),
			other => Err(Error::UnknownEntryKind { value: other.to_string() }),
		}
	}
}

/// Read-only projection of a stored entry, used only to ground a model call.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryContextItem {
	pub content: String,
	pub created_at: OffsetDateTime,
	pub title: Option<String>,
	pub mood: Option<Mood>,
}
