use crate::{
    log::{
        aggregate::{DAYS_IN_WEEK, HOURS_IN_DAY},
        error::IntegrityError,
    },
    utils::percentage::Percentage,
};

use super::primitives::Histogram;

pub type HourHistogram = Histogram<HOURS_IN_DAY>;
pub type WeekdayHistogram = Histogram<DAYS_IN_WEEK>;

/// Scales every bucket to a percentage of the largest one. All zero input stays all zero.
/// Negative and non-finite buckets are rejected.
pub fn normalize<const N: usize>(
    frequencies: &[f64; N],
) -> Result<[Percentage; N], IntegrityError> {
    if let Some((index, &value)) = frequencies
        .iter()
        .enumerate()
        .find(|(_, v)| **v < 0. || !v.is_finite())
    {
        return Err(IntegrityError::InvalidFrequency { index, value });
    }

    let max = frequencies.iter().copied().fold(0., f64::max);
    Ok(frequencies.map(|v| Percentage::of(v, max).unwrap_or(Percentage::ZERO)))
}

impl<const N: usize> Histogram<N> {
    /// `now` marks the bucket the renderer should highlight. Indices outside the histogram are
    /// dropped.
    pub fn from_frequencies(frequencies: &[f64; N], now: usize) -> Result<Self, IntegrityError> {
        Ok(Self {
            values: normalize(frequencies)?,
            highlight: (now < N).then_some(now),
        })
    }
}
