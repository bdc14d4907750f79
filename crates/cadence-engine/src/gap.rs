//! Find the earliest free interval of a given length across many occurrences.
//!
//! Starts and ends are sorted as two independent streams and swept together with
//! a counter of open occurrences. A point is covered while more starts than ends
//! have been consumed, so the occurrences never need to be paired or merged. A
//! start equal to an end counts as continuous coverage, and a gap exactly as
//! long as the requested duration is accepted.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::expander::Occurrence;

/// A half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// `[start, start + duration)`, or `None` when the end is past chrono's range.
    pub fn starting_at(start: NaiveDateTime, duration: Duration) -> Option<Self> {
        let end = start.checked_add_signed(duration)?;
        Some(Interval { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// True if the two intervals share any instant. Touching endpoints do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

/// Earliest interval of length `duration`, starting no earlier than `since`, that
/// overlaps none of `occurrences`.
///
/// Returns `None` when the only free intervals begin after `horizon_end`, or
/// would end past the last representable timestamp. The
/// caller bounds `duration` (at most one day in the scheduler) and fetches the
/// occurrences for `[since, horizon_end]`.
pub fn find_gap(
    occurrences: &[Occurrence],
    duration: Duration,
    since: NaiveDateTime,
    horizon_end: NaiveDateTime,
) -> Option<Interval> {
    // Anything over by `since` cannot block a slot that starts at `since` or later.
    let (mut starts, mut ends): (Vec<NaiveDateTime>, Vec<NaiveDateTime>) = occurrences
        .iter()
        .filter(|o| o.end_time > since)
        .map(|o| (o.start_time, o.end_time))
        .unzip();

    if ends.is_empty() {
        return Interval::starting_at(since, duration);
    }

    starts.sort_unstable();
    ends.sort_unstable();

    if let Some(slot) = fitting(since, duration, starts[0]) {
        return Some(slot);
    }

    let mut i = 0;
    let mut j = 0;
    let mut active = 0usize;
    while j < ends.len() {
        if i < starts.len() && starts[i] <= ends[j] {
            i += 1;
            active += 1;
            continue;
        }

        active -= 1;
        let candidate = ends[j];
        if candidate > horizon_end {
            trace!(%candidate, "sweep passed the horizon");
            return None;
        }
        if active == 0 && i < starts.len() {
            if let Some(slot) = fitting(candidate, duration, starts[i]) {
                return Some(slot);
            }
        }
        j += 1;
    }

    fitting(ends[ends.len() - 1], duration, horizon_end)
}

/// The slot starting at `start` if it ends no later than `limit`.
fn fitting(start: NaiveDateTime, duration: Duration, limit: NaiveDateTime) -> Option<Interval> {
    Interval::starting_at(start, duration).filter(|slot| slot.end <= limit)
}
