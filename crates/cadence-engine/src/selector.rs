//! Cheap pre-filter deciding which definitions can contribute to a window.
//!
//! The test is over-approximate: a definition rejected here never has an
//! occurrence in the window, but an accepted one may still expand to nothing.
//! Skipping selection entirely changes throughput, not results.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::calendar;
use crate::definition::{EventDefinition, RepetitionRule};

/// Whether `definition` may have an occurrence in `[since, till]`.
pub fn is_candidate(definition: &EventDefinition, since: NaiveDateTime, till: NaiveDateTime) -> bool {
    let anchor = definition.anchor_start;
    match definition.rule {
        RepetitionRule::None => since <= anchor && anchor <= till,
        // Daily occurrences land on every day of the window regardless of the anchor.
        RepetitionRule::Daily => true,
        RepetitionRule::Weekly => {
            spans_full_period(RepetitionRule::Weekly, since, till)
                || calendar::in_cyclic_range(
                    calendar::weekday_position(anchor),
                    calendar::weekday_position(since),
                    calendar::weekday_position(till),
                )
        }
        RepetitionRule::Monthly => {
            spans_full_period(RepetitionRule::Monthly, since, till)
                || calendar::in_cyclic_range(
                    calendar::month_day_position(anchor),
                    calendar::month_day_position(since),
                    calendar::month_day_position(till),
                )
        }
        RepetitionRule::Yearly => {
            spans_full_period(RepetitionRule::Yearly, since, till)
                || calendar::in_cyclic_range(
                    calendar::year_day_position(anchor),
                    calendar::year_day_position(since),
                    calendar::year_day_position(till),
                )
        }
    }
}

/// Keep only the definitions that may contribute to `[since, till]`.
pub fn select<'a, I>(definitions: I, since: NaiveDateTime, till: NaiveDateTime) -> Vec<&'a EventDefinition>
where
    I: IntoIterator<Item = &'a EventDefinition>,
{
    definitions
        .into_iter()
        .filter(|definition| is_candidate(definition, since, till))
        .collect()
}

/// True when the window touches every position of one repetition period.
///
/// Compared on calendar dates: Monday 10:00 to the next Monday 09:00 is shorter
/// than a week but still touches all seven weekdays, and its position range would
/// collapse to a single day. Non-repeating and daily rules report `false`.
pub fn spans_full_period(rule: RepetitionRule, since: NaiveDateTime, till: NaiveDateTime) -> bool {
    let since = since.date().and_time(NaiveTime::MIN);
    let till = till.date().and_time(NaiveTime::MIN);
    let period_end = match rule {
        RepetitionRule::Weekly => since.checked_add_signed(Duration::days(7)),
        RepetitionRule::Monthly => calendar::add_months(since, 1),
        RepetitionRule::Yearly => calendar::add_years(since, 1),
        RepetitionRule::None | RepetitionRule::Daily => return false,
    };
    // A window reaching past chrono's range certainly covers a whole period.
    period_end.is_none_or(|end| end <= till)
}
