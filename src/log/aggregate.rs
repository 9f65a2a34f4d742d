//! Grouping of entries into the shapes the layout engine consumes. Nothing here computes
//! statistics beyond plain sums.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
    sync::Arc,
};

use chrono::{Datelike, NaiveDate, TimeZone, Timelike};
use clap::ValueEnum;
use serde::Serialize;

use crate::utils::time::{local_date, trailing_dates};

use super::entry::Entry;

pub const HOURS_IN_DAY: usize = 24;
pub const DAYS_IN_WEEK: usize = 7;

/// The entries whose start falls on one local calendar date, in start order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntries<'a> {
    pub date: NaiveDate,
    pub entries: Vec<&'a Entry>,
}

/// Which of the two classification tags an aggregation groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Sector,
    Project,
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Sector => write!(f, "sector"),
            GroupKey::Project => write!(f, "project"),
        }
    }
}

impl GroupKey {
    pub fn of<'a>(&self, entry: &'a Entry) -> &'a Arc<str> {
        match self {
            GroupKey::Sector => &entry.sector,
            GroupKey::Project => &entry.project,
        }
    }
}

/// Summed closed hours of one group within a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: Arc<str>,
    pub hours: f64,
}

impl GroupTotal {
    pub fn new(key: impl Into<Arc<str>>, hours: f64) -> Self {
        Self {
            key: key.into(),
            hours,
        }
    }
}

/// Groups entries by the local date of their start. Entries crossing midnight belong to the day
/// they started on.
pub fn group_by_date<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    tz: &Tz,
) -> BTreeMap<NaiveDate, Vec<&'a Entry>> {
    let mut days = BTreeMap::<NaiveDate, Vec<&Entry>>::new();
    for entry in entries {
        days.entry(local_date(entry.start(), tz))
            .or_default()
            .push(entry);
    }
    days
}

pub fn entries_on<'a, Tz: TimeZone>(
    entries: &'a [Entry],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|v| local_date(v.start(), tz) == date)
        .collect()
}

/// `days` consecutive dates ending with `today`, oldest first. Dates without entries are kept
/// with an empty entry list.
pub fn recent_days<'a, Tz: TimeZone>(
    entries: &'a [Entry],
    today: NaiveDate,
    days: usize,
    tz: &Tz,
) -> Vec<DayEntries<'a>> {
    let mut by_date = group_by_date(entries, tz);
    trailing_dates(today, days)
        .into_iter()
        .map(|date| DayEntries {
            date,
            entries: by_date.remove(&date).unwrap_or_default(),
        })
        .collect()
}

/// Sums closed hours per group. Groups come out in order of first appearance.
pub fn group_totals<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    key: GroupKey,
) -> Vec<GroupTotal> {
    let mut index = HashMap::<Arc<str>, usize>::new();
    let mut totals: Vec<GroupTotal> = vec![];
    for entry in entries {
        let Some(hours) = entry.duration() else {
            continue;
        };
        let name = key.of(entry);
        match index.get(name) {
            Some(&i) => totals[i].hours += hours,
            None => {
                index.insert(name.clone(), totals.len());
                totals.push(GroupTotal::new(name.clone(), hours));
            }
        }
    }
    totals
}

/// Closed hours summed by the local hour the entry started in.
pub fn peak_hours<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    tz: &Tz,
) -> [f64; HOURS_IN_DAY] {
    let mut hours = [0.; HOURS_IN_DAY];
    for entry in entries {
        if let Some(duration) = entry.duration() {
            hours[entry.start().with_timezone(tz).hour() as usize] += duration;
        }
    }
    hours
}

/// Closed hours summed by the local weekday the entry started on, Sunday first.
pub fn peak_days<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    tz: &Tz,
) -> [f64; DAYS_IN_WEEK] {
    let mut days = [0.; DAYS_IN_WEEK];
    for entry in entries {
        if let Some(duration) = entry.duration() {
            let weekday = entry.start().with_timezone(tz).weekday();
            days[weekday.num_days_from_sunday() as usize] += duration;
        }
    }
    days
}

pub fn filter_by<'a>(entries: &'a [Entry], key: GroupKey, name: &str) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|v| key.of(v).as_ref() == name)
        .collect()
}
