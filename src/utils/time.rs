use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub const SECONDS_PER_DAY: f64 = 86_400.;
pub const SECONDS_PER_HOUR: f64 = 3_600.;

/// This is the standard way of converting a date to a string in daylog.
pub fn date_to_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Local calendar date of an instant.
pub fn local_date<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Returns `count` consecutive dates ending with `last` (inclusive), oldest first. Stops early at
/// the first representable date.
pub fn trailing_dates(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates = std::iter::successors(Some(last), NaiveDate::pred_opt)
        .take(count)
        .collect::<Vec<_>>();
    dates.reverse();
    dates
}
