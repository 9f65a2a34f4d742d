use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    log::aggregate::{group_totals, DayEntries, GroupKey, GroupTotal},
    utils::percentage::Percentage,
};

use super::{
    colouring::Colouring,
    primitives::{BarSegment, Labelled},
};

/// One bucket of a bar chart. A column without segments had nothing recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarColumn {
    pub date: NaiveDate,
    pub segments: Vec<Labelled<BarSegment>>,
}

/// Stacks groups bottom-up in the given order. Each segment's height is its share of the bucket
/// total and it starts where the previous one ended, so the heights of a non-empty column add up
/// to 100.
///
/// Returns no segments when the groups add up to zero hours.
pub fn stack_column(
    groups: &[GroupTotal],
    key: GroupKey,
    colouring: &Colouring,
) -> Vec<Labelled<BarSegment>> {
    let total: f64 = groups.iter().map(|v| v.hours).sum();
    if total <= 0. || !total.is_finite() {
        return vec![];
    }

    groups
        .iter()
        .scan(0., |offset: &mut f64, group| {
            let height = group.hours / total * 100.;
            let position = *offset;
            *offset += height;
            Some(Labelled {
                label: group.key.clone(),
                segment: BarSegment {
                    colour: colouring.group(key, &group.key),
                    height: Percentage::new_opt(height).unwrap_or(Percentage::ZERO),
                    position: Percentage::new_opt(position).unwrap_or(Percentage::ZERO),
                },
            })
        })
        .collect()
}

/// Builds one column per bucket, grouping each bucket's closed entries by `key`.
#[instrument(skip_all, fields(buckets = buckets.len(), key = ?key))]
pub fn compose_bars(
    buckets: &[DayEntries<'_>],
    key: GroupKey,
    colouring: &Colouring,
) -> Vec<BarColumn> {
    buckets
        .iter()
        .map(|bucket| {
            let groups = group_totals(bucket.entries.iter().copied(), key);
            debug!("Bucket {} has {} groups", bucket.date, groups.len());
            BarColumn {
                date: bucket.date,
                segments: stack_column(&groups, key, colouring),
            }
        })
        .collect()
}
