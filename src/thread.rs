//! Thread snapshot data as returned by the server

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key naming the graph that produced a thread
pub const GRAPH_ID_KEY: &str = "graph_id";

/// A thread as fetched from the server
///
/// Only the fields the cleanup tool looks at are modelled; anything else in
/// the payload is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Thread {
    /// Unique thread identifier; empty when the server omitted it
    #[serde(default)]
    pub thread_id: String,

    /// Creation timestamp (ISO-8601)
    #[serde(default)]
    pub created_at: Option<String>,

    /// Status tag ("idle", "busy", "interrupted", ...)
    #[serde(default)]
    pub status: Option<String>,

    /// Run records; only their number matters
    #[serde(default)]
    pub runs: Option<Vec<Value>>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl Thread {
    /// Status tag, `"unknown"` when the server omitted it
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn run_count(&self) -> usize {
        self.runs.as_ref().map_or(0, Vec::len)
    }

    /// Graph identifier from metadata, if present and non-empty
    pub fn graph_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .get(GRAPH_ID_KEY)?
            .as_str()
            .filter(|id| !id.is_empty())
    }

    /// Creation time normalized to UTC
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created_at.as_deref()?)
    }

    /// Multi-line detail block used by preview and review listings
    pub fn summary(&self) -> String {
        let created = match (&self.created_at, self.created_at_utc()) {
            (_, Some(dt)) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            (Some(raw), None) => raw.clone(),
            (None, None) => "Unknown".to_string(),
        };
        let metadata = match &self.metadata {
            Some(map) if !map.is_empty() => {
                serde_json::to_string(map).unwrap_or_else(|_| "None".to_string())
            }
            _ => "None".to_string(),
        };

        format!(
            "  ID: {}\n  Created: {}\n  Status: {}\n  Runs: {}\n  Metadata: {}",
            self.thread_id,
            created,
            self.status(),
            self.run_count(),
            metadata
        )
    }
}

/// Parse an ISO-8601 timestamp; values without an offset are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
