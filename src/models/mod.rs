//! Records exchanged with the remote library API

pub mod book;
pub mod dashboard;
pub mod lending;
pub mod reader;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use dashboard::DashboardData;
pub use lending::{
    BookSummary, LendingPopulated, LendingRecord, LendingStatus, NewLending, ReaderSummary,
};
pub use reader::{NewReader, Reader};

use serde::{Deserialize, Deserializer};

/// `{ "data": ... }` wrapper used by the single-record endpoints
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Accept a JSON string or number and keep it as text.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
