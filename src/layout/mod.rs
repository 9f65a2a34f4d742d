//! The layout engine: pure functions turning entries and aggregates into percentage based
//! primitives. Nothing in here sorts, filters or talks to the outside world; inputs come from
//! [crate::log::aggregate].

pub mod colouring;
pub mod day_packer;
pub mod histogram;
pub mod period_bar;
pub mod primitives;
pub mod share_bar;
pub mod timeline;
