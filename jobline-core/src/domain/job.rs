//! Job domain types

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Snapshot of a remote job
///
/// A payload is a job when it carries a readable `state`; the service reports
/// failures as arbitrary JSON bodies. Descriptive fields of an unexpected
/// shape are dropped rather than rejecting the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Empty when the reply did not repeat it
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    pub state: JobState,
    /// Only meaningful once the job is terminal and not in `Error`
    #[serde(
        default,
        deserialize_with = "lenient_exit_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub exit_code: Option<i64>,
    /// Present when the job is in `Error`
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub project: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub machine_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub container: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub command: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub dt_created: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub dt_started: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub dt_finished: Option<DateTime<Utc>>,
    /// Every other field the service sent, kept so snapshots re-print losslessly
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Decode a service payload into a job snapshot
    ///
    /// Hands the payload back untouched when it has no string `state`, so
    /// callers can surface exactly what the service said.
    pub fn decode(payload: Value) -> Result<Self, Value> {
        if !payload.get("state").is_some_and(Value::is_string) {
            return Err(payload);
        }
        serde_json::from_value(payload.clone()).map_err(|_| payload)
    }

    /// Decode the reply to a creation request, which must name the new job
    pub fn decode_created(payload: Value) -> Result<Self, Value> {
        let has_id = payload
            .get("id")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            return Err(payload);
        }
        Self::decode(payload)
    }
}

/// Job lifecycle state, as spelled on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Pending,
    Running,
    Stopped,
    Error,
    Failed,
    /// Any state the service introduces that this client does not know
    Other(String),
}

impl JobState {
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "Pending",
            JobState::Running => "Running",
            JobState::Stopped => "Stopped",
            JobState::Error => "Error",
            JobState::Failed => "Failed",
            JobState::Other(state) => state,
        }
    }

    /// No further transitions happen after a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Stopped | JobState::Error | JobState::Failed)
    }
}

impl From<String> for JobState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "Pending" => JobState::Pending,
            "Running" => JobState::Running,
            "Stopped" => JobState::Stopped,
            "Error" => JobState::Error,
            "Failed" => JobState::Failed,
            _ => JobState::Other(state),
        }
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        match state {
            JobState::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for JobState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JobState::from(s.to_string()))
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional fields of an unexpected shape read as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_default())
}

/// Exit codes sometimes arrive as numeric strings
fn lenient_exit_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Timestamps the service sends in a format we can't read are dropped, not fatal
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
