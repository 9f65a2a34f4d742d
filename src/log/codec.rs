//! Encoding of entry timestamps. On the wire an instant is the number of whole seconds since
//! the Unix epoch written in base 16, e.g. `5e0be100` for 2020-01-01 00:00:00 UTC.

use chrono::{DateTime, TimeZone, Timelike, Utc};

use crate::utils::time::SECONDS_PER_DAY;

use super::error::FormatError;

/// Parses a base-16 timestamp into epoch seconds. Only ASCII hex digits are accepted, so signs,
/// whitespace and `0x` prefixes are rejected.
pub fn decode(hex: &str) -> Result<u64, FormatError> {
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FormatError::NotHex(hex.to_string()));
    }
    u64::from_str_radix(hex, 16).map_err(|_| FormatError::Overflow(hex.to_string()))
}

pub fn encode(epoch_seconds: u64) -> String {
    format!("{epoch_seconds:x}")
}

pub fn to_instant(epoch_seconds: u64) -> Result<DateTime<Utc>, FormatError> {
    i64::try_from(epoch_seconds)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(FormatError::OutOfRange(epoch_seconds))
}

/// Decodes straight into an instant.
pub fn parse_instant(hex: &str) -> Result<DateTime<Utc>, FormatError> {
    to_instant(decode(hex)?)
}

/// Encodes an instant. Sub-second precision is dropped.
pub fn format_instant(instant: DateTime<Utc>) -> Result<String, FormatError> {
    let seconds = instant.timestamp();
    u64::try_from(seconds)
        .map(encode)
        .map_err(|_| FormatError::BeforeEpoch(seconds))
}

/// Share of the local calendar day that has elapsed at `instant`, in `[0, 100)`. Only the
/// wall-clock time in `tz` matters, never the date.
pub fn day_fraction<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> f64 {
    let local = instant.with_timezone(tz);
    local.num_seconds_from_midnight() as f64 / SECONDS_PER_DAY * 100.
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::{day_fraction, decode, encode, format_instant, parse_instant, to_instant};
    use crate::log::error::FormatError;

    #[test]
    fn decode_known_values() {
        assert_eq!(decode("0"), Ok(0));
        assert_eq!(decode("ff"), Ok(255));
        assert_eq!(decode("5E0BE100"), Ok(1_577_836_800));
    }

    #[test]
    fn decode_rejects_garbage() {
        for bad in ["", "xyz", "+1f", " 1f", "0x1f", "undefined"] {
            assert!(
                matches!(decode(bad), Err(FormatError::NotHex(_))),
                "{bad} should be rejected"
            );
        }
        assert!(matches!(
            decode("1ffffffffffffffff"),
            Err(FormatError::Overflow(_))
        ));
    }

    #[test]
    fn encode_then_decode_is_identity() {
        for n in [0, 1, 15, 16, 1_577_836_800, u32::MAX as u64, u64::MAX] {
            assert_eq!(decode(&encode(n)), Ok(n));
        }
    }

    #[test]
    fn instant_matches_epoch_millis() {
        let instant = to_instant(1_577_836_800).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_577_836_800_000);
        assert!(matches!(
            to_instant(u64::MAX),
            Err(FormatError::OutOfRange(_))
        ));
    }

    #[test]
    fn instants_before_the_epoch_are_not_encoded() {
        let before = Utc.with_ymd_and_hms(1969, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(format_instant(before), Err(FormatError::BeforeEpoch(-3600)));
        assert_eq!(
            format_instant(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()),
            Ok("0".to_string())
        );
    }

    #[test]
    fn day_fraction_only_depends_on_time_of_day() {
        let nine = Utc.with_ymd_and_hms(2020, 1, 1, 9, 0, 0).unwrap();
        let nine_later = Utc.with_ymd_and_hms(2023, 7, 19, 9, 0, 0).unwrap();
        assert!((day_fraction(nine, &Utc) - 37.5).abs() < 1e-9);
        assert_eq!(day_fraction(nine, &Utc), day_fraction(nine_later, &Utc));
        assert_eq!(
            day_fraction(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(), &Utc),
            0.
        );
    }

    #[test]
    fn day_fraction_uses_local_wall_clock() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let instant = parse_instant(&encode(
            Utc.with_ymd_and_hms(2020, 1, 1, 22, 0, 0).unwrap().timestamp() as u64,
        ))
        .unwrap();
        // 22:00 UTC is midnight at +02:00
        assert_eq!(day_fraction(instant, &plus_two), 0.);
    }
}
