//! Tests for the endpoint sweep that finds the earliest common free interval.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use cadence_engine::gap::{find_gap, Interval};
use cadence_engine::Occurrence;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn busy(start: NaiveDateTime, end: NaiveDateTime) -> Occurrence {
    Occurrence {
        owner: "kek".to_string(),
        start_time: start,
        end_time: end,
        participants: BTreeSet::from(["kek".to_string()]),
    }
}

fn week_after(since: NaiveDateTime) -> NaiveDateTime {
    since + Duration::days(7)
}

#[test]
fn no_occurrences_starts_at_since() {
    let since = at(2023, 1, 1, 0, 0);
    let gap = find_gap(&[], Duration::minutes(30), since, week_after(since));
    assert_eq!(
        gap,
        Some(Interval {
            start: at(2023, 1, 1, 0, 0),
            end: at(2023, 1, 1, 0, 30),
        })
    );
}

#[test]
fn after_single_event() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [busy(at(2023, 1, 1, 0, 0), at(2023, 1, 1, 1, 0))];
    let gap = find_gap(&events, Duration::minutes(30), since, week_after(since)).unwrap();
    assert_eq!(gap.start, at(2023, 1, 1, 1, 0));
    assert_eq!(gap.end, at(2023, 1, 1, 1, 30));
}

#[test]
fn exact_fit_between_events() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 5, 23, 30)),
        busy(at(2023, 1, 6, 0, 0), at(2023, 1, 8, 0, 0)),
    ];
    let gap = find_gap(&events, Duration::minutes(30), since, week_after(since)).unwrap();
    assert_eq!(gap.start, at(2023, 1, 5, 23, 30));
    assert_eq!(gap.end, at(2023, 1, 6, 0, 0));
}

#[test]
fn gap_too_small_and_horizon_full() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 5, 23, 30)),
        busy(at(2023, 1, 6, 0, 0), at(2023, 1, 8, 0, 0)),
    ];
    assert_eq!(find_gap(&events, Duration::hours(1), since, week_after(since)), None);
}

#[test]
fn tail_gap_must_fit_before_horizon() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [busy(at(2023, 1, 1, 0, 0), at(2023, 1, 7, 23, 30))];
    assert_eq!(
        find_gap(&events, Duration::minutes(30), since, week_after(since)),
        Interval::starting_at(at(2023, 1, 7, 23, 30), Duration::minutes(30))
    );
    assert_eq!(find_gap(&events, Duration::minutes(31), since, week_after(since)), None);
}

#[test]
fn touching_events_leave_no_gap() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 1, 1, 0)),
        busy(at(2023, 1, 1, 1, 0), at(2023, 1, 1, 2, 0)),
        busy(at(2023, 1, 1, 3, 0), at(2023, 1, 1, 4, 0)),
    ];
    let gap = find_gap(&events, Duration::minutes(45), since, week_after(since)).unwrap();
    assert_eq!(gap.start, at(2023, 1, 1, 2, 0));
}

#[test]
fn nested_events_keep_coverage_open() {
    // The inner event ends at 02:00 but the outer one runs until 05:00.
    let since = at(2023, 1, 1, 0, 0);
    let events = [
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 1, 5, 0)),
        busy(at(2023, 1, 1, 1, 0), at(2023, 1, 1, 2, 0)),
        busy(at(2023, 1, 1, 6, 0), at(2023, 1, 1, 7, 0)),
    ];
    let gap = find_gap(&events, Duration::hours(1), since, week_after(since)).unwrap();
    assert_eq!(gap.start, at(2023, 1, 1, 5, 0));
    assert_eq!(gap.end, at(2023, 1, 1, 6, 0));
}

#[test]
fn input_order_does_not_matter() {
    let since = at(2023, 1, 1, 0, 0);
    let mut events = vec![
        busy(at(2023, 1, 1, 6, 0), at(2023, 1, 1, 7, 0)),
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 1, 3, 0)),
        busy(at(2023, 1, 1, 2, 0), at(2023, 1, 1, 4, 0)),
    ];
    let forward = find_gap(&events, Duration::hours(2), since, week_after(since));
    events.reverse();
    let backward = find_gap(&events, Duration::hours(2), since, week_after(since));
    assert_eq!(forward, backward);
    assert_eq!(forward.map(|g| g.start), Some(at(2023, 1, 1, 4, 0)));
}

#[test]
fn free_time_before_first_event_is_used() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [busy(at(2023, 1, 1, 5, 0), at(2023, 1, 1, 6, 0))];
    let gap = find_gap(&events, Duration::minutes(30), since, week_after(since)).unwrap();
    assert_eq!(gap.start, since);
}

#[test]
fn events_over_before_since_are_ignored() {
    let since = at(2023, 1, 1, 5, 0);
    let events = [
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 1, 1, 0)),
        busy(at(2023, 1, 1, 5, 0), at(2023, 1, 1, 6, 0)),
    ];
    let gap = find_gap(&events, Duration::minutes(30), since, week_after(since)).unwrap();
    assert_eq!(gap.start, at(2023, 1, 1, 6, 0));
}

#[test]
fn event_running_through_since_blocks_start() {
    let since = at(2023, 1, 1, 5, 0);
    let events = [busy(at(2023, 1, 1, 4, 0), at(2023, 1, 1, 8, 0))];
    let gap = find_gap(&events, Duration::minutes(30), since, week_after(since)).unwrap();
    assert_eq!(gap.start, at(2023, 1, 1, 8, 0));
}

#[test]
fn candidate_past_horizon_is_not_found() {
    let since = at(2023, 1, 1, 0, 0);
    let events = [
        busy(at(2023, 1, 1, 0, 0), at(2023, 1, 9, 0, 0)),
        busy(at(2023, 1, 10, 0, 0), at(2023, 1, 11, 0, 0)),
    ];
    assert_eq!(find_gap(&events, Duration::minutes(30), since, week_after(since)), None);
}

#[test]
fn interval_overlap_excludes_touching() {
    let gap = Interval::starting_at(at(2023, 1, 1, 1, 0), Duration::hours(1)).unwrap();
    assert!(!gap.overlaps(at(2023, 1, 1, 0, 0), at(2023, 1, 1, 1, 0)));
    assert!(!gap.overlaps(at(2023, 1, 1, 2, 0), at(2023, 1, 1, 3, 0)));
    assert!(gap.overlaps(at(2023, 1, 1, 1, 30), at(2023, 1, 1, 3, 0)));
    assert_eq!(gap.duration(), Duration::hours(1));
}

#[test]
fn slots_past_the_last_timestamp_are_not_found() {
    let since = NaiveDateTime::MAX - Duration::hours(1);
    assert_eq!(find_gap(&[], Duration::hours(2), since, NaiveDateTime::MAX), None);

    let events = [busy(since, since + Duration::minutes(30))];
    assert_eq!(find_gap(&events, Duration::hours(1), since, NaiveDateTime::MAX), None);
    assert_eq!(
        find_gap(&events, Duration::minutes(30), since, NaiveDateTime::MAX),
        Interval::starting_at(since + Duration::minutes(30), Duration::minutes(30))
    );
    assert_eq!(Interval::starting_at(NaiveDateTime::MAX, Duration::minutes(1)), None);
}
