use chrono::TimeZone;
use tracing::{trace, warn};

use crate::{
    log::{codec::day_fraction, entry::Entry, error::IntegrityError},
    utils::{percentage::Percentage, time::SECONDS_PER_DAY},
};

use super::{colouring::Colouring, primitives::TimelineSegment};

/// Rounding noise allowed when one block ends exactly where the next one starts.
const MARGIN_TOLERANCE: f64 = 1e-9;

/// End of the previously packed block, carried from one entry to the next.
#[derive(Debug, Clone, Copy, Default)]
struct PackState {
    last_width: f64,
    last_position: f64,
}

/// Packs the entries of a single day onto a 0-100 axis spanning 24 hours. Entries must already be
/// sorted by start, they are not reordered here. Open sessions produce no block.
///
/// Overlapping entries would need a negative margin; that is reported as
/// [IntegrityError::Overlap] instead of being clamped.
pub fn pack_day<'a, Tz: TimeZone>(
    entries: impl IntoIterator<Item = &'a Entry>,
    tz: &Tz,
    colouring: &Colouring,
) -> Result<Vec<TimelineSegment>, IntegrityError> {
    let mut segments = vec![];
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| entry.seconds().map(|seconds| (index, entry, seconds)))
        .try_fold(PackState::default(), |state, (index, entry, seconds)| {
            let position = day_fraction(entry.start(), tz);
            let width = seconds as f64 / SECONDS_PER_DAY * 100.;
            let margin = position - (state.last_width + state.last_position);
            trace!("Packing entry {index}: position {position} width {width} margin {margin}");

            let margin = match margin {
                m if m.abs() < MARGIN_TOLERANCE => 0.,
                m if m >= 0. => m,
                m => {
                    warn!("Entry {index} overlaps the previous block");
                    return Err(IntegrityError::Overlap {
                        index,
                        overlap: -m,
                    });
                }
            };

            segments.push(TimelineSegment {
                colour: colouring.entry(entry),
                width: percentage(width),
                margin: percentage(margin),
            });
            Ok(PackState {
                last_width: width,
                last_position: position,
            })
        })?;
    Ok(segments)
}

// Closed entries never have a negative length and margins are checked above.
fn percentage(value: f64) -> Percentage {
    Percentage::new_opt(value).unwrap_or(Percentage::ZERO)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, FixedOffset, Utc};

    use super::pack_day;
    use crate::{
        layout::colouring::Colouring,
        log::{
            entry::Entry,
            error::IntegrityError,
            test_support::{at, closed, TEST_DATE},
        },
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn two_blocks_with_gaps() -> Result<()> {
        let entries = [
            closed(TEST_DATE, (9, 0), (10, 0), "Code"),
            closed(TEST_DATE, (11, 0), (11, 30), "Code"),
        ];
        let segments = pack_day(&entries, &Utc, &Colouring::plain("#fff"))?;

        assert_eq!(segments.len(), 2);
        assert!(close(*segments[0].width, 4.1667));
        assert!(close(*segments[0].margin, 37.5));
        assert!(close(*segments[1].width, 2.0833));
        // 10:00 -> 11:00 is 1/24 of the day
        assert!(close(*segments[1].margin, 4.1667));
        Ok(())
    }

    #[test]
    fn adjacent_blocks_have_zero_margin() -> Result<()> {
        let entries = [
            closed(TEST_DATE, (9, 0), (10, 0), "Code"),
            closed(TEST_DATE, (10, 0), (10, 20), "Code"),
            closed(TEST_DATE, (10, 20), (13, 0), "Code"),
        ];
        let segments = pack_day(&entries, &Utc, &Colouring::plain("#fff"))?;
        assert_eq!(*segments[1].margin, 0.);
        assert_eq!(*segments[2].margin, 0.);
        Ok(())
    }

    #[test]
    fn rounding_noise_between_adjacent_blocks_is_dropped() -> Result<()> {
        // 10:20 and 13:00 as day fractions don't add up exactly in binary floating point
        let entries = [
            closed(TEST_DATE, (10, 0), (10, 20), "Code"),
            closed(TEST_DATE, (10, 20), (13, 0), "Read"),
            closed(TEST_DATE, (13, 0), (13, 7), "Code"),
            closed(TEST_DATE, (13, 7), (17, 41), "Read"),
        ];
        let segments = pack_day(&entries, &Utc, &Colouring::plain("#fff"))?;
        assert!(close(*segments[0].margin, 41.6667));
        assert!(segments[1..].iter().all(|v| *v.margin == 0.));
        Ok(())
    }

    #[test]
    fn open_session_is_skipped() -> Result<()> {
        let entries = [
            closed(TEST_DATE, (9, 0), (10, 0), "Code"),
            Entry::open(at(TEST_DATE, 12, 0), "Code", "daylog", ""),
        ];
        let segments = pack_day(&entries, &Utc, &Colouring::plain("#fff"))?;
        assert_eq!(segments.len(), 1);

        let only_open = [Entry::open(at(TEST_DATE, 12, 0), "Code", "daylog", "")];
        assert!(pack_day(&only_open, &Utc, &Colouring::plain("#fff"))?.is_empty());
        Ok(())
    }

    #[test]
    fn empty_day_is_empty_row() -> Result<()> {
        let entries: [Entry; 0] = [];
        assert!(pack_day(&entries, &Utc, &Colouring::plain("#fff"))?.is_empty());
        Ok(())
    }

    #[test]
    fn overlap_is_reported() {
        let entries = [
            closed(TEST_DATE, (9, 0), (11, 0), "Code"),
            closed(TEST_DATE, (10, 0), (10, 30), "Code"),
        ];
        let err = pack_day(&entries, &Utc, &Colouring::plain("#fff")).unwrap_err();
        assert!(matches!(err, IntegrityError::Overlap { index: 1, .. }));
    }

    #[test]
    fn positions_use_local_time() -> Result<()> {
        let minus_three = FixedOffset::west_opt(3 * 3600).unwrap();
        // 12:00 UTC is 09:00 at -03:00
        let entries = [closed(TEST_DATE, (12, 0), (13, 0), "Code")];
        let segments = pack_day(&entries, &minus_three, &Colouring::plain("#fff"))?;
        assert!(close(*segments[0].margin, 37.5));
        Ok(())
    }

    #[test]
    fn entry_running_past_midnight_keeps_full_width() -> Result<()> {
        let start = at(TEST_DATE, 23, 0);
        let entries = [Entry::closed(0, start, start + Duration::hours(2), "Sleep", "", "")?];
        let segments = pack_day(&entries, &Utc, &Colouring::plain("#fff"))?;
        assert!(close(*segments[0].width, 8.3333));
        Ok(())
    }
}
