//! Civil-calendar arithmetic used by expansion and candidate selection.
//!
//! Month and year steps clamp to the last day of the target month: Jan 31 plus
//! one month is Feb 28 (or 29), never Mar 3. Distances between points are counted
//! in whole steps truncated toward zero.

use chrono::{Datelike, Months, NaiveDateTime};

/// Shift `dt` by a signed number of months, clamping the day of month.
///
/// Returns `None` if the result falls outside chrono's representable range.
pub fn add_months(dt: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    let step = Months::new(months.unsigned_abs());
    if months >= 0 {
        dt.checked_add_months(step)
    } else {
        dt.checked_sub_months(step)
    }
}

/// Shift `dt` by a signed number of years. Feb 29 clamps to Feb 28.
pub fn add_years(dt: NaiveDateTime, years: i32) -> Option<NaiveDateTime> {
    add_months(dt, years.checked_mul(12)?)
}

/// Signed number of whole months from `origin` to `target`.
///
/// The count is the largest `m` (toward zero) such that `origin + m months` does
/// not pass `target`, so `origin + months_between(target, origin)` lands on or
/// before `target` when `target >= origin` and on or after it otherwise.
pub fn months_between(target: NaiveDateTime, origin: NaiveDateTime) -> i32 {
    let mut months = (target.year() - origin.year()) * 12 + target.month() as i32
        - origin.month() as i32;

    if target >= origin {
        while months > 0 {
            match add_months(origin, months) {
                Some(shifted) if shifted > target => months -= 1,
                _ => break,
            }
        }
    } else {
        while months < 0 {
            match add_months(origin, months) {
                Some(shifted) if shifted < target => months += 1,
                _ => break,
            }
        }
    }

    months
}

/// Signed number of whole years from `origin` to `target`, truncated toward zero.
pub fn years_between(target: NaiveDateTime, origin: NaiveDateTime) -> i32 {
    months_between(target, origin) / 12
}

/// Weekday position, Monday = 0 through Sunday = 6.
pub fn weekday_position(dt: NaiveDateTime) -> u32 {
    dt.weekday().num_days_from_monday()
}

/// Day-of-month position, 1 through 31.
pub fn month_day_position(dt: NaiveDateTime) -> u32 {
    dt.day()
}

/// Day-of-year position as `(month, day)`.
///
/// Comparing this pair instead of the ordinal keeps a date at the same position
/// in leap and common years.
pub fn year_day_position(dt: NaiveDateTime) -> (u32, u32) {
    (dt.month(), dt.day())
}

/// Inclusive membership in a cyclic range that may wrap past the end of the period.
pub fn in_cyclic_range<T: PartialOrd>(value: T, from: T, to: T) -> bool {
    if from <= to {
        from <= value && value <= to
    } else {
        value >= from || value <= to
    }
}
