//! Personal activity log. Sessions are recorded with a start, an optional end, a sector, a
//! project and a note; the layout engine turns them into percentage based primitives for
//! day timelines, stacked multi-day timelines, per-day bars and peak charts.
//!

pub mod cli;
pub mod layout;
pub mod log;
pub mod session;
pub mod store;
pub mod utils;
