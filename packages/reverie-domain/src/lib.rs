pub mod chat;
pub mod entry;
pub mod grounding;
pub mod prompts;
pub mod timezone;
pub mod transcript;

mod error;

pub use chat::{ChatTurn, Role};
pub use entry::{EntryContextItem, EntryKind, Mood};
pub use error::{Error, Result};
