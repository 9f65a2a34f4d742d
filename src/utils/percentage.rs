use std::{fmt::Display, ops::Deref};

use serde::Serialize;

/// A non-negative share expressed in percent. Layout primitives carry their geometry as
/// percentages so that renderers can scale them to any surface.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}%", self.0)
    }
}

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.);
    pub const FULL: Percentage = Percentage(100.);

    /// Returns `None` for negative or non-finite values.
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. || !value.is_finite() {
            None
        } else {
            Some(Percentage(value))
        }
    }

    /// `value` as a share of `whole`. `None` when `whole` is not positive.
    pub fn of(value: f64, whole: f64) -> Option<Percentage> {
        if whole <= 0. {
            return None;
        }
        Percentage::new_opt(value / whole * 100.)
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
