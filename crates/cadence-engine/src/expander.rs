//! Recurrence expansion: turns one event definition into the concrete occurrences
//! that fall inside a query window.
//!
//! Expansion is lazy: [`expand`] returns an [`Occurrences`] iterator that computes
//! each instance on demand, in ascending start order, and stops at the window end.

use std::collections::BTreeSet;
use std::iter::FusedIterator;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::definition::{EventDefinition, RepetitionRule, UserId};

/// A single materialized instance of an event definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub owner: UserId,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub participants: BTreeSet<UserId>,
}

impl Occurrence {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// Expand `definition` over the window `[since, till]`.
///
/// Every emitted occurrence starts at or before `till`. Non-repeating events are
/// additionally required to start at or after `since`. The definition is assumed
/// valid (see [`EventDefinition::validate`]); callers that read definitions from
/// storage should validate before expanding.
///
/// The sequence stops at the first occurrence whose end would fall past the last
/// representable timestamp.
pub fn expand(definition: &EventDefinition, since: NaiveDateTime, till: NaiveDateTime) -> Occurrences {
    let anchor = definition.anchor_start;

    let cursor = match definition.rule {
        RepetitionRule::None => Cursor::Single,
        RepetitionRule::Daily => Cursor::Daily {
            day: 0,
            days: (till - since).num_days(),
        },
        RepetitionRule::Weekly => Cursor::Weekly {
            next: first_weekly(anchor, since),
        },
        RepetitionRule::Monthly => {
            let origin = anchor.date().and_time(NaiveTime::MIN);
            Cursor::Stepped {
                step: Step::Month,
                index: calendar::months_between(since, origin),
                last: calendar::months_between(till, origin),
            }
        }
        RepetitionRule::Yearly => {
            let origin = anchor.date().and_time(NaiveTime::MIN);
            Cursor::Stepped {
                step: Step::Year,
                index: calendar::years_between(since, origin),
                last: calendar::years_between(till, origin),
            }
        }
    };

    Occurrences {
        owner: definition.owner.clone(),
        participants: definition.participants.clone(),
        anchor,
        duration: definition.duration(),
        since,
        till,
        cursor,
    }
}

/// Expand `definition` and collect the occurrences into a vector.
pub fn expand_all(
    definition: &EventDefinition,
    since: NaiveDateTime,
    till: NaiveDateTime,
) -> Vec<Occurrence> {
    expand(definition, since, till).collect()
}

/// First start on the anchor's weekday and clock time that is not before `since`.
fn first_weekly(anchor: NaiveDateTime, since: NaiveDateTime) -> Option<NaiveDateTime> {
    let offset = (7 + calendar::weekday_position(anchor) - calendar::weekday_position(since)) % 7;
    let first = since
        .date()
        .checked_add_signed(Duration::days(i64::from(offset)))?
        .and_time(anchor.time());
    if first < since {
        first.checked_add_signed(Duration::days(7))
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Month,
    Year,
}

#[derive(Debug, Clone)]
enum Cursor {
    Single,
    Daily { day: i64, days: i64 },
    Weekly { next: Option<NaiveDateTime> },
    Stepped { step: Step, index: i32, last: i32 },
    Done,
}

/// Lazy, single-pass sequence of occurrences produced by [`expand`].
#[derive(Debug, Clone)]
pub struct Occurrences {
    owner: UserId,
    participants: BTreeSet<UserId>,
    anchor: NaiveDateTime,
    duration: Duration,
    since: NaiveDateTime,
    till: NaiveDateTime,
    cursor: Cursor,
}

impl Occurrences {
    fn occurrence(&self, start_time: NaiveDateTime) -> Option<Occurrence> {
        Some(Occurrence {
            owner: self.owner.clone(),
            start_time,
            end_time: start_time.checked_add_signed(self.duration)?,
            participants: self.participants.clone(),
        })
    }

    fn next_start(&mut self) -> Option<NaiveDateTime> {
        loop {
            match &mut self.cursor {
                Cursor::Done => return None,
                Cursor::Single => {
                    self.cursor = Cursor::Done;
                    let start = self.anchor;
                    return (self.since <= start && start <= self.till).then_some(start);
                }
                Cursor::Daily { day, days } => {
                    if *day >= *days {
                        self.cursor = Cursor::Done;
                        return None;
                    }
                    let offset = Duration::days(*day);
                    *day += 1;
                    // The anchor's date is ignored; only its clock time carries over.
                    match self.since.date().checked_add_signed(offset) {
                        Some(date) => return Some(date.and_time(self.anchor.time())),
                        None => {
                            self.cursor = Cursor::Done;
                            return None;
                        }
                    }
                }
                Cursor::Weekly { next } => match *next {
                    Some(start) if start <= self.till => {
                        *next = start.checked_add_signed(Duration::days(7));
                        return Some(start);
                    }
                    _ => {
                        self.cursor = Cursor::Done;
                        return None;
                    }
                },
                Cursor::Stepped { step, index, last } => {
                    if *index > *last {
                        self.cursor = Cursor::Done;
                        return None;
                    }
                    let i = *index;
                    *index += 1;
                    let candidate = match step {
                        Step::Month => calendar::add_months(self.anchor, i),
                        Step::Year => calendar::add_years(self.anchor, i),
                    };
                    let Some(candidate) = candidate else {
                        continue;
                    };
                    // Clamping moved the date: this period has no matching day.
                    let same_day = match step {
                        Step::Month => candidate.day() == self.anchor.day(),
                        Step::Year => {
                            candidate.day() == self.anchor.day()
                                && candidate.month() == self.anchor.month()
                        }
                    };
                    if same_day && self.since <= candidate && candidate <= self.till {
                        return Some(candidate);
                    }
                }
            }
        }
    }
}

impl Iterator for Occurrences {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        let start = self.next_start()?;
        let occurrence = self.occurrence(start);
        // Starts only grow, so every later end would overflow too.
        if occurrence.is_none() {
            self.cursor = Cursor::Done;
        }
        occurrence
    }
}

impl FusedIterator for Occurrences {}
