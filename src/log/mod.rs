//! The entry log and everything derived from it.
//!  - [entry::Entry] is a single session, decoded from the hex wire format by [codec].
//!  - [EntryLog] keeps entries in start order and enforces the session invariants.
//!  - [derived::DerivedState] is recomputed from the log whenever its revision changes.
//!  - [aggregate] builds the inputs the layout engine consumes.

pub mod aggregate;
pub mod codec;
pub mod derived;
pub mod entry;
pub mod error;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use tracing::debug;

use codec::format_instant;
use entry::{Entry, EntryRecord};
use error::{IntegrityError, LogError};

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Ordered, validated sequence of entries. At most one entry is open and if so it is the last
/// one. Sessions are started and stopped strictly in sequence.
#[derive(Debug, Clone)]
pub struct EntryLog {
    entries: Vec<Entry>,
    revision: u64,
}

impl Default for EntryLog {
    fn default() -> Self {
        Self {
            entries: vec![],
            revision: next_revision(),
        }
    }
}

impl EntryLog {
    pub fn from_records(records: &[EntryRecord]) -> Result<Self, LogError> {
        let entries = records
            .iter()
            .enumerate()
            .map(|(index, record)| record.decode(index))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, LogError> {
        validate(&entries)?;
        debug!("Loaded log with {} entries", entries.len());
        Ok(Self {
            entries,
            revision: next_revision(),
        })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Changes on every successful mutation. No two logs share a revision, so derived state can
    /// be keyed on it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when a session is in progress.
    pub fn status(&self) -> bool {
        self.open_session().is_some()
    }

    pub fn open_session(&self) -> Option<&Entry> {
        self.entries.last().filter(|v| v.is_open())
    }

    pub fn start_session(
        &mut self,
        start: DateTime<Utc>,
        sector: impl Into<Arc<str>>,
        project: impl Into<Arc<str>>,
        note: impl Into<Arc<str>>,
    ) -> Result<(), LogError> {
        if self.status() {
            return Err(IntegrityError::SessionAlreadyOpen.into());
        }
        let index = self.entries.len();
        if let Some(last_end) = self.entries.last().and_then(|v| v.end().closed()) {
            if start < last_end {
                return Err(IntegrityError::OutOfOrder { index }.into());
            }
        }
        // the wire format starts at the epoch
        format_instant(start).map_err(|source| LogError::Format { index, source })?;
        self.entries.push(Entry::open(start, sector, project, note));
        self.revision = next_revision();
        Ok(())
    }

    pub fn close_session(&mut self, end: DateTime<Utc>) -> Result<(), IntegrityError> {
        if !self.status() {
            return Err(IntegrityError::NoOpenSession);
        }
        let index = self.entries.len() - 1;
        let Some(open) = self.entries.pop() else {
            return Err(IntegrityError::NoOpenSession);
        };
        match open.clone().close_at(index, end) {
            Ok(closed) => {
                self.entries.push(closed);
                self.revision = next_revision();
                Ok(())
            }
            Err(e) => {
                self.entries.push(open);
                Err(e)
            }
        }
    }

    /// Replaces the whole log. The current log is kept when the import doesn't validate.
    pub fn import(&mut self, records: &[EntryRecord]) -> Result<(), LogError> {
        let imported = Self::from_records(records)?;
        self.entries = imported.entries;
        self.revision = next_revision();
        Ok(())
    }

    pub fn to_records(&self) -> Result<Vec<EntryRecord>, LogError> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                EntryRecord::try_from(entry).map_err(|source| LogError::Format { index, source })
            })
            .collect()
    }
}

fn validate(entries: &[Entry]) -> Result<(), IntegrityError> {
    let last = entries.len().saturating_sub(1);
    for (index, entry) in entries.iter().enumerate() {
        if entry.is_open() && index != last {
            return Err(IntegrityError::OpenNotLast { index });
        }
        if index > 0 && entry.start() < entries[index - 1].start() {
            return Err(IntegrityError::OutOfOrder { index });
        }
    }
    Ok(())
}
