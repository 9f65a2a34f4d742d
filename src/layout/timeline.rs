use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use tracing::instrument;

use crate::log::{aggregate::DayEntries, error::IntegrityError};

use super::{colouring::Colouring, day_packer::pack_day, primitives::TimelineSegment};

/// One day of a stacked timeline. A row without segments is a day with nothing recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub date: NaiveDate,
    pub segments: Vec<TimelineSegment>,
}

/// Packs every day of the window into its own row, keeping the order of `days` (oldest first
/// when the window comes from [recent_days](crate::log::aggregate::recent_days)).
#[instrument(skip_all, fields(days = days.len()))]
pub fn compose_timeline<Tz: TimeZone>(
    days: &[DayEntries<'_>],
    tz: &Tz,
    colouring: &Colouring,
) -> Result<Vec<TimelineRow>, IntegrityError> {
    days.iter()
        .map(|day| {
            Ok(TimelineRow {
                date: day.date,
                segments: pack_day(day.entries.iter().copied(), tz, colouring)?,
            })
        })
        .collect()
}
