//! Log domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message the log host sends as the last record of a finished stream
pub const END_OF_STREAM: &str = "PSEOF";

/// One record of a job's log stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    /// Position in the stream; doubles as the resume cursor
    pub line: u64,
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LogLine {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            extra: Map::new(),
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.message == END_OF_STREAM
    }
}
