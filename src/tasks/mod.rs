//! Background Tasks Module
//!
//! Long-running tasks spawned alongside the control surface.

mod stats_reporter;

pub use stats_reporter::spawn_stats_reporter;
