use std::{collections::BTreeMap, sync::Arc};

use chrono::{NaiveDate, TimeZone};
use tracing::debug;

use super::{
    aggregate::{group_by_date, peak_days, peak_hours, DAYS_IN_WEEK, HOURS_IN_DAY},
    entry::Entry,
    EntryLog,
};

/// Everything the views need from the whole log, computed in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedState {
    /// Revision of the log this state was computed from.
    pub revision: u64,
    pub by_date: BTreeMap<NaiveDate, Vec<Entry>>,
    pub sectors: Vec<Arc<str>>,
    pub projects: Vec<Arc<str>>,
    pub peak_hours: [f64; HOURS_IN_DAY],
    pub peak_days: [f64; DAYS_IN_WEEK],
    /// Hours of every closed entry, in log order.
    pub durations: Vec<f64>,
}

impl DerivedState {
    pub fn compute<Tz: TimeZone>(log: &EntryLog, tz: &Tz) -> Self {
        let entries = log.entries();
        let by_date = group_by_date(entries, tz)
            .into_iter()
            .map(|(date, day)| (date, day.into_iter().cloned().collect()))
            .collect();

        Self {
            revision: log.revision(),
            by_date,
            sectors: distinct(entries.iter().map(|v| &v.sector)),
            projects: distinct(entries.iter().map(|v| &v.project)),
            peak_hours: peak_hours(entries, tz),
            peak_days: peak_days(entries, tz),
            durations: entries.iter().filter_map(Entry::duration).collect(),
        }
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[Entry] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Sorted, deduplicated, empty names dropped.
fn distinct<'a>(names: impl Iterator<Item = &'a Arc<str>>) -> Vec<Arc<str>> {
    let mut names = names.filter(|v| !v.is_empty()).cloned().collect::<Vec<_>>();
    names.sort();
    names.dedup();
    names
}

/// Holds the state derived from the most recently seen log revision, grouped in one time zone.
/// A new log revision or a new zone are the only invalidation points.
#[derive(Debug)]
pub struct DerivedCache<Tz: TimeZone> {
    tz: Tz,
    state: Option<DerivedState>,
}

impl<Tz: TimeZone> DerivedCache<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz, state: None }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Switches the zone dates and hours are grouped in. The cached state is dropped.
    pub fn set_timezone(&mut self, tz: Tz) {
        self.tz = tz;
        self.invalidate();
    }

    pub fn get(&mut self, log: &EntryLog) -> &DerivedState {
        let stale = self
            .state
            .as_ref()
            .is_none_or(|v| v.revision != log.revision());
        if stale {
            debug!("Recomputing derived state for revision {}", log.revision());
            self.state = Some(DerivedState::compute(log, &self.tz));
        }
        self.state
            .get_or_insert_with(|| DerivedState::compute(log, &self.tz))
    }

    pub fn invalidate(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::{Duration, FixedOffset, Utc};

    use super::{DerivedCache, DerivedState};
    use crate::log::{
        test_support::{at, closed, TEST_DATE},
        EntryLog,
    };

    fn log() -> Result<EntryLog> {
        Ok(EntryLog::from_entries(vec![
            closed(TEST_DATE - Duration::days(1), (9, 0), (10, 0), "Read"),
            closed(TEST_DATE, (9, 0), (11, 0), "Code"),
            closed(TEST_DATE, (12, 0), (12, 30), "Read"),
        ])?)
    }

    #[test]
    fn compute_groups_and_lists() -> Result<()> {
        let state = DerivedState::compute(&log()?, &Utc);
        assert_eq!(state.by_date.len(), 2);
        assert_eq!(state.entries_on(TEST_DATE).len(), 2);
        assert!(state.entries_on(TEST_DATE + Duration::days(3)).is_empty());
        assert_eq!(state.sectors, vec![Arc::<str>::from("Code"), Arc::from("Read")]);
        assert_eq!(state.durations, vec![1., 2., 0.5]);
        assert_eq!(state.peak_hours[9], 3.);
        Ok(())
    }

    #[test]
    fn cache_recomputes_after_mutation() -> Result<()> {
        let mut log = log()?;
        let mut cache = DerivedCache::new(Utc);

        let first = cache.get(&log).revision;
        assert_eq!(cache.get(&log).revision, first);

        log.start_session(at(TEST_DATE, 13, 0), "Code", "Code project", "")?;
        log.close_session(at(TEST_DATE, 14, 0))?;

        let state = cache.get(&log);
        assert_ne!(state.revision, first);
        assert_eq!(state.entries_on(TEST_DATE).len(), 3);
        Ok(())
    }

    #[test]
    fn cache_follows_its_time_zone() -> Result<()> {
        let log = EntryLog::from_entries(vec![closed(TEST_DATE, (23, 0), (23, 30), "Sleep")])?;
        let mut cache = DerivedCache::new(FixedOffset::east_opt(0).unwrap());
        assert_eq!(cache.get(&log).peak_hours[23], 0.5);
        assert_eq!(cache.get(&log).by_date.keys().collect::<Vec<_>>(), vec![&TEST_DATE]);

        // 23:00 UTC is 01:00 of the next day at +02:00
        cache.set_timezone(FixedOffset::east_opt(2 * 3600).unwrap());
        let state = cache.get(&log);
        assert_eq!(state.peak_hours[23], 0.);
        assert_eq!(state.peak_hours[1], 0.5);
        let next_day = TEST_DATE + Duration::days(1);
        assert_eq!(state.by_date.keys().collect::<Vec<_>>(), vec![&next_day]);
        Ok(())
    }
}
