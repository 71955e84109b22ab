//! Recurring-transaction catch-up.
//!
//! A template is a transaction flagged recurring. On every scheduler tick the
//! [`engine::CatchUpEngine`] walks each template forward from its watermark to
//! "today", creating one concrete occurrence per elapsed period and moving the
//! watermark past them, so repeated ticks never create the same occurrence twice.

pub mod clock;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod plan;
pub mod scheduler;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{CatchUpEngine, CatchUpReport, CommitMode};
pub use error::{RecurrenceError, Result};
pub use scheduler::RecurrenceScheduler;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Midnight of the given day, the resolution timestamps are stored at.
pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
