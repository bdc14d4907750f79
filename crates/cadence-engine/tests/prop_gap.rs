//! Property-based tests for the gap sweep, checked against a brute-force search.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use cadence_engine::gap::find_gap;
use cadence_engine::Occurrence;

fn since() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn horizon_end() -> NaiveDateTime {
    since() + Duration::days(7)
}

/// Occurrences on a 15-minute grid, from a day before `since` to just past the horizon.
fn arb_occurrences() -> impl Strategy<Value = Vec<Occurrence>> {
    prop::collection::vec((-96i64..=700, 1i64..=96), 0..40).prop_map(|slots| {
        slots
            .into_iter()
            .map(|(offset, len)| {
                let start = since() + Duration::minutes(offset * 15);
                Occurrence {
                    owner: "kek".to_string(),
                    start_time: start,
                    end_time: start + Duration::minutes(len * 15),
                    participants: BTreeSet::new(),
                }
            })
            .collect()
    })
}

fn arb_gap_duration() -> impl Strategy<Value = Duration> {
    (1i64..=96).prop_map(|q| Duration::minutes(q * 15))
}

fn is_free(occurrences: &[Occurrence], start: NaiveDateTime, duration: Duration) -> bool {
    let end = start + duration;
    occurrences
        .iter()
        .all(|o| !(o.start_time < end && start < o.end_time))
}

/// Points where a free interval can begin: `since` and every end after it.
fn candidate_starts(occurrences: &[Occurrence]) -> Vec<NaiveDateTime> {
    let mut points: Vec<_> = occurrences
        .iter()
        .map(|o| o.end_time)
        .filter(|&end| end > since())
        .collect();
    points.push(since());
    points.sort();
    points.dedup();
    points
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn found_gap_is_free_and_earliest(
        occurrences in arb_occurrences(),
        duration in arb_gap_duration(),
    ) {
        if let Some(gap) = find_gap(&occurrences, duration, since(), horizon_end()) {
            prop_assert_eq!(gap.duration(), duration);
            prop_assert!(gap.start >= since());
            prop_assert!(gap.start <= horizon_end());
            prop_assert!(is_free(&occurrences, gap.start, duration), "{:?} overlaps an occurrence", gap);

            for point in candidate_starts(&occurrences) {
                if point >= gap.start {
                    break;
                }
                prop_assert!(
                    !is_free(&occurrences, point, duration),
                    "earlier free start {:?} missed in favor of {:?}",
                    point,
                    gap.start
                );
            }
        }
    }

    #[test]
    fn not_found_means_nothing_fits_in_horizon(
        occurrences in arb_occurrences(),
        duration in arb_gap_duration(),
    ) {
        if find_gap(&occurrences, duration, since(), horizon_end()).is_none() {
            for point in candidate_starts(&occurrences) {
                if point + duration > horizon_end() {
                    continue;
                }
                prop_assert!(
                    !is_free(&occurrences, point, duration),
                    "free interval at {:?} but nothing was found",
                    point
                );
            }
        }
    }

    #[test]
    fn result_does_not_depend_on_input_order(
        occurrences in arb_occurrences(),
        duration in arb_gap_duration(),
    ) {
        let mut reversed = occurrences.clone();
        reversed.reverse();
        prop_assert_eq!(
            find_gap(&occurrences, duration, since(), horizon_end()),
            find_gap(&reversed, duration, since(), horizon_end())
        );
    }
}
