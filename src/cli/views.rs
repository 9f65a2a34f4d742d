//! Builds the primitives behind every command. Views only read the log; the derived cache is
//! the one thing they may refresh.

use std::fmt::Display;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};
use serde::Serialize;
use tracing::instrument;

use crate::{
    layout::{
        colouring::Colouring,
        day_packer::pack_day,
        histogram::{HourHistogram, WeekdayHistogram},
        period_bar::{compose_bars, BarColumn},
        primitives::{ColourRef, Labelled, TimelineSegment},
        share_bar::share_bar,
        timeline::{compose_timeline, TimelineRow},
    },
    log::{
        aggregate::{filter_by, group_totals, peak_days, peak_hours, recent_days, GroupKey},
        derived::{DerivedCache, DerivedState},
        entry::Entry,
        EntryLog,
    },
    session::{elapsed_display, IDLE_DISPLAY},
    store::UserData,
};

/// Loaded user data with the log decoded once. Dates and hours are local to `Tz`.
pub struct Workspace<Tz: TimeZone> {
    pub data: UserData,
    pub log: EntryLog,
    pub colouring: Colouring,
    cache: DerivedCache<Tz>,
}

impl<Tz: TimeZone> Workspace<Tz> {
    pub fn new(data: UserData, tz: Tz) -> anyhow::Result<Self> {
        let log = data.entry_log()?;
        let colouring = data.colouring();
        Ok(Self {
            data,
            log,
            colouring,
            cache: DerivedCache::new(tz),
        })
    }

    pub fn timezone(&self) -> &Tz {
        self.cache.timezone()
    }

    pub fn derived(&mut self) -> &DerivedState {
        self.cache.get(&self.log)
    }

    fn local_now<Other: TimeZone>(&self, now: &DateTime<Other>) -> DateTime<Tz> {
        now.with_timezone(self.timezone())
    }
}

/// Journal view of a single date.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub row: TimelineRow,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PeakMode {
    Hours,
    Days,
}

impl Display for PeakMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeakMode::Hours => write!(f, "hours"),
            PeakMode::Days => write!(f, "days"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PeakChart {
    Hours(HourHistogram),
    Days(WeekdayHistogram),
}

/// A peak chart with the colours its buckets are painted in.
#[derive(Debug, Serialize)]
pub struct PeakView {
    pub chart: PeakChart,
    #[serde(rename = "colorRef")]
    pub colour: ColourRef,
    #[serde(rename = "accentRef")]
    pub accent: ColourRef,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub in_progress: bool,
    pub elapsed: String,
}

#[instrument(skip(workspace))]
pub fn line_view<Tz: TimeZone>(
    workspace: &Workspace<Tz>,
    days: usize,
    now: &DateTime<Tz>,
) -> anyhow::Result<Vec<TimelineRow>> {
    let tz = workspace.timezone();
    let today = workspace.local_now(now).date_naive();
    let window = recent_days(workspace.log.entries(), today, days, tz);
    Ok(compose_timeline(&window, tz, &workspace.colouring)?)
}

pub fn day_view<Tz: TimeZone>(
    workspace: &mut Workspace<Tz>,
    date: NaiveDate,
) -> anyhow::Result<DayView> {
    let entries = workspace.derived().entries_on(date).to_vec();
    let segments: Vec<TimelineSegment> =
        pack_day(&entries, workspace.timezone(), &workspace.colouring)?;
    Ok(DayView {
        row: TimelineRow { date, segments },
        entries,
    })
}

#[instrument(skip(workspace))]
pub fn bars_view<Tz: TimeZone>(
    workspace: &Workspace<Tz>,
    days: usize,
    key: GroupKey,
    now: &DateTime<Tz>,
) -> Vec<BarColumn> {
    let today = workspace.local_now(now).date_naive();
    let window = recent_days(workspace.log.entries(), today, days, workspace.timezone());
    compose_bars(&window, key, &workspace.colouring)
}

/// `None` when there is nothing recorded to chart, as opposed to a chart of zeros.
pub fn peaks_view<Tz: TimeZone>(
    workspace: &mut Workspace<Tz>,
    mode: PeakMode,
    filter: Option<(GroupKey, &str)>,
    now: &DateTime<Tz>,
) -> anyhow::Result<Option<PeakView>> {
    let now = workspace.local_now(now);
    let (hours, days) = match filter {
        Some((key, name)) => {
            let entries = filter_by(workspace.log.entries(), key, name);
            if entries.iter().all(|v| v.is_open()) {
                return Ok(None);
            }
            let tz = workspace.timezone();
            (
                peak_hours(entries.iter().copied(), tz),
                peak_days(entries.iter().copied(), tz),
            )
        }
        None => {
            let derived = workspace.derived();
            if derived.durations.is_empty() {
                return Ok(None);
            }
            (derived.peak_hours, derived.peak_days)
        }
    };

    let chart = match mode {
        PeakMode::Hours => PeakChart::Hours(HourHistogram::from_frequencies(
            &hours,
            now.hour() as usize,
        )?),
        PeakMode::Days => PeakChart::Days(WeekdayHistogram::from_frequencies(
            &days,
            now.weekday().num_days_from_sunday() as usize,
        )?),
    };
    Ok(Some(PeakView {
        chart,
        colour: workspace.colouring.bucket(false),
        accent: workspace.colouring.bucket(true),
    }))
}

pub fn focus_view<Tz: TimeZone>(
    workspace: &Workspace<Tz>,
    key: GroupKey,
) -> Vec<Labelled<TimelineSegment>> {
    let totals = group_totals(workspace.log.entries(), key);
    share_bar(&totals, key, &workspace.colouring)
}

pub fn status_view<Tz: TimeZone>(workspace: &Workspace<Tz>, now: &DateTime<Tz>) -> StatusView {
    match workspace.log.open_session() {
        Some(open) => StatusView {
            in_progress: true,
            elapsed: elapsed_display(open.start(), now.to_utc()),
        },
        None => StatusView {
            in_progress: false,
            elapsed: IDLE_DISPLAY.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    use super::{
        bars_view, day_view, focus_view, line_view, peaks_view, status_view, PeakChart, PeakMode,
        Workspace,
    };
    use crate::{
        log::{
            aggregate::GroupKey,
            entry::{Entry, EntryRecord},
            test_support::{at, closed, TEST_DATE},
        },
        store::UserData,
    };

    fn workspace(open: bool) -> Result<Workspace<Utc>> {
        let yesterday = TEST_DATE - Duration::days(1);
        let mut entries = vec![
            closed(yesterday, (9, 0), (12, 0), "Code"),
            closed(yesterday, (13, 0), (14, 0), "Read"),
            closed(TEST_DATE, (9, 0), (10, 0), "Read"),
        ];
        if open {
            entries.push(Entry::open(at(TEST_DATE, 11, 0), "Code", "Code project", ""));
        }
        let data = UserData {
            log: entries
                .iter()
                .map(EntryRecord::try_from)
                .collect::<Result<_, _>>()?,
            ..Default::default()
        };
        Workspace::new(data, Utc)
    }

    #[test]
    fn line_and_bars_cover_the_window() -> Result<()> {
        let workspace = workspace(true)?;
        let now = Utc.with_ymd_and_hms(2024, 4, 5, 12, 0, 0).unwrap();

        let rows = line_view(&workspace, 3, &now)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].segments.len(), 2);
        assert_eq!(rows[2].segments.len(), 1);

        let columns = bars_view(&workspace, 3, GroupKey::Sector, &now);
        assert_eq!(columns.len(), 3);
        assert_eq!(*columns[1].segments[0].segment.height, 75.);
        Ok(())
    }

    #[test]
    fn day_view_lists_all_entries_but_packs_closed_ones() -> Result<()> {
        let mut workspace = workspace(true)?;
        let view = day_view(&mut workspace, TEST_DATE)?;
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.row.segments.len(), 1);

        let json = serde_json::to_value(&view)?;
        assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["entries"][1]["sector"], "Code");
        assert!(json["entries"][1]["end"].is_null());
        Ok(())
    }

    #[test]
    fn peaks_highlight_now_and_signal_no_data() -> Result<()> {
        let mut workspace = workspace(false)?;
        let now = Utc.with_ymd_and_hms(2024, 4, 5, 13, 30, 0).unwrap();

        let Some(view) = peaks_view(&mut workspace, PeakMode::Hours, None, &now)? else {
            panic!("expected a chart");
        };
        assert_eq!(view.colour.as_str(), "#ccc");
        assert_eq!(view.accent.as_str(), "#eb4e32");
        let PeakChart::Hours(hours) = view.chart else {
            panic!("expected an hour chart");
        };
        assert_eq!(hours.highlight, Some(13));
        assert_eq!(*hours.values[9], 100.);
        assert!((*hours.values[13] - 100. / 4.).abs() < 1e-9);

        let Some(PeakChart::Days(days)) =
            peaks_view(&mut workspace, PeakMode::Days, None, &now)?.map(|v| v.chart)
        else {
            panic!("expected a weekday chart");
        };
        assert_eq!(days.highlight, Some(5));

        let filtered =
            peaks_view(&mut workspace, PeakMode::Hours, Some((GroupKey::Sector, "Sleep")), &now)?;
        assert!(filtered.is_none());

        let mut empty = Workspace::new(UserData::default(), Utc)?;
        assert!(peaks_view(&mut empty, PeakMode::Days, None, &now)?.is_none());
        Ok(())
    }

    #[test]
    fn focus_splits_by_hours() -> Result<()> {
        let workspace = workspace(true)?;
        let bar = focus_view(&workspace, GroupKey::Sector);
        assert_eq!(bar.len(), 2);
        assert_eq!(&*bar[0].label, "Code");
        assert_eq!(*bar[0].segment.width, 60.);
        assert_eq!(&*bar[1].label, "Read");
        assert_eq!(*bar[1].segment.width, 40.);
        Ok(())
    }

    #[test]
    fn status_reports_open_session() -> Result<()> {
        let now = Utc.with_ymd_and_hms(2024, 4, 5, 12, 1, 1).unwrap();
        let status = status_view(&workspace(true)?, &now);
        assert!(status.in_progress);
        assert_eq!(status.elapsed, "01:01:01");

        let status = status_view(&workspace(false)?, &now);
        assert!(!status.in_progress);
        assert_eq!(status.elapsed, "00:00:00");
        assert_eq!(
            serde_json::to_value(&status)?,
            serde_json::json!({"inProgress": false, "elapsed": "00:00:00"})
        );
        Ok(())
    }

    #[test]
    fn windows_and_peaks_are_local_to_the_workspace_zone() -> Result<()> {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let data = UserData {
            log: vec![EntryRecord::try_from(&closed(TEST_DATE, (23, 0), (23, 30), "Sleep"))?],
            ..Default::default()
        };
        let mut workspace = Workspace::new(data, plus_two)?;
        // 00:30 on the 6th at +02:00
        let now = Utc
            .with_ymd_and_hms(2024, 4, 5, 22, 30, 0)
            .unwrap()
            .with_timezone(&plus_two);

        let rows = line_view(&workspace, 2, &now)?;
        assert_eq!(rows[1].date, TEST_DATE + Duration::days(1));
        assert_eq!(rows[1].segments.len(), 1);
        assert!(day_view(&mut workspace, TEST_DATE)?.entries.is_empty());

        let Some(PeakChart::Hours(hours)) =
            peaks_view(&mut workspace, PeakMode::Hours, None, &now)?.map(|v| v.chart)
        else {
            panic!("expected an hour chart");
        };
        assert_eq!(*hours.values[1], 100.);
        assert_eq!(hours.highlight, Some(0));
        Ok(())
    }
}
