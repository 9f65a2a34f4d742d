use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::time::SECONDS_PER_HOUR;

use super::{
    codec::{format_instant, parse_instant},
    error::{FormatError, IntegrityError, LogError},
};

/// Wire literal marking a session that hasn't ended yet.
pub const OPEN_SESSION_MARKER: &str = "undefined";

/// How a session ends. The open marker only exists on the wire; inside the crate an open session
/// is always [SessionEnd::Open].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Open,
    Closed(DateTime<Utc>),
}

impl SessionEnd {
    pub fn closed(&self) -> Option<DateTime<Utc>> {
        match self {
            SessionEnd::Open => None,
            SessionEnd::Closed(end) => Some(*end),
        }
    }
}

/// `null` while open, the end instant otherwise.
impl Serialize for SessionEnd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.closed().serialize(serializer)
    }
}

/// One recorded activity session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    start: DateTime<Utc>,
    end: SessionEnd,
    pub sector: Arc<str>,
    pub project: Arc<str>,
    pub note: Arc<str>,
    /// Hours, cached when the entry is closed.
    duration: Option<f64>,
}

impl Entry {
    pub fn open(
        start: DateTime<Utc>,
        sector: impl Into<Arc<str>>,
        project: impl Into<Arc<str>>,
        note: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            start,
            end: SessionEnd::Open,
            sector: sector.into(),
            project: project.into(),
            note: note.into(),
            duration: None,
        }
    }

    /// Creates a closed entry. `index` is only used for error reporting.
    pub fn closed(
        index: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sector: impl Into<Arc<str>>,
        project: impl Into<Arc<str>>,
        note: impl Into<Arc<str>>,
    ) -> Result<Self, IntegrityError> {
        Entry::open(start, sector, project, note).close_at(index, end)
    }

    pub(super) fn close_at(mut self, index: usize, end: DateTime<Utc>) -> Result<Self, IntegrityError> {
        if end < self.start {
            return Err(IntegrityError::EndBeforeStart {
                index,
                start: self.start.timestamp(),
                end: end.timestamp(),
            });
        }
        self.end = SessionEnd::Closed(end);
        self.duration = Some((end - self.start).num_seconds() as f64 / SECONDS_PER_HOUR);
        Ok(self)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> SessionEnd {
        self.end
    }

    pub fn is_open(&self) -> bool {
        self.end == SessionEnd::Open
    }

    /// Duration in hours. `None` while the session is open.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Length of a closed entry in whole seconds.
    pub fn seconds(&self) -> Option<i64> {
        self.end.closed().map(|end| (end - self.start).num_seconds())
    }
}

/// Persisted shape of an [Entry].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub s: String,
    pub e: String,
    #[serde(default)]
    pub c: String,
    #[serde(default)]
    pub t: String,
    #[serde(default)]
    pub d: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dur: Option<f64>,
}

impl EntryRecord {
    /// Decodes the record. The cached `dur` on disk is ignored and recomputed from the
    /// timestamps.
    pub fn decode(&self, index: usize) -> Result<Entry, LogError> {
        let format = |source| LogError::Format { index, source };
        let start = parse_instant(&self.s).map_err(format)?;
        let entry = Entry::open(start, self.c.as_str(), self.t.as_str(), self.d.as_str());
        if self.e == OPEN_SESSION_MARKER {
            return Ok(entry);
        }
        let end = parse_instant(&self.e).map_err(format)?;
        Ok(entry.close_at(index, end)?)
    }
}

impl TryFrom<&Entry> for EntryRecord {
    type Error = FormatError;

    fn try_from(entry: &Entry) -> Result<Self, Self::Error> {
        Ok(EntryRecord {
            s: format_instant(entry.start)?,
            e: match entry.end {
                SessionEnd::Open => OPEN_SESSION_MARKER.to_string(),
                SessionEnd::Closed(end) => format_instant(end)?,
            },
            c: entry.sector.to_string(),
            t: entry.project.to_string(),
            d: entry.note.to_string(),
            dur: entry.duration,
        })
    }
}
