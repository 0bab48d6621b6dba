use crate::allocation::domain::CourseId;
use crate::allocation::rules::{CategoryRules, RulesError};

fn rules(sc: u8, st: u8, obc: u8, ews: u8) -> CategoryRules {
    CategoryRules { sc, st, obc, ews }
}

#[test]
fn seat_split_floors_reserved_shares() {
    let split = rules(20, 0, 0, 0).seat_split(CourseId::new("CSE"), 10);

    assert_eq!(split.sc, 2);
    assert_eq!(split.st, 0);
    assert_eq!(split.general, 8);
    assert_eq!(split.available, 10);
    assert_eq!(split.counter_sum(), 10);
}

#[test]
fn general_absorbs_flooring_remainder() {
    // 15% + 7% + 27% + 10% of 7 seats floors to 1 + 0 + 1 + 0.
    let split = rules(15, 7, 27, 10).seat_split(CourseId::new("MECH"), 7);

    assert_eq!(split.sc, 1);
    assert_eq!(split.st, 0);
    assert_eq!(split.obc, 1);
    assert_eq!(split.ews, 0);
    assert_eq!(split.general, 5);
    assert_eq!(split.counter_sum(), 7);
}

#[test]
fn zero_percentages_leave_everything_general() {
    let split = rules(0, 0, 0, 0).seat_split(CourseId::new("CSE"), 30);

    assert_eq!(split.general, 30);
    assert_eq!(split.reserved_remaining(), 0);
}

#[test]
fn zero_capacity_course_splits_to_all_zero() {
    let split = rules(15, 7, 27, 10).seat_split(CourseId::new("CSE"), 0);

    assert_eq!(split.counter_sum(), 0);
    assert_eq!(split.available, 0);
}

#[test]
fn seat_split_handles_maximum_capacity() {
    let split = rules(25, 25, 25, 25).seat_split(CourseId::new("CSE"), u32::MAX);

    assert_eq!(split.sc, u32::MAX / 4);
    assert_eq!(split.counter_sum(), u32::MAX);
    assert_eq!(split.available, u32::MAX);
}

#[test]
fn validate_accepts_full_reservation() {
    assert!(rules(25, 25, 25, 25).validate().is_ok());
}

#[test]
fn validate_rejects_sum_above_hundred() {
    let error = rules(50, 30, 20, 5).validate().expect_err("rejected");
    match error {
        RulesError::ReservedExceedsWhole { sum } => assert_eq!(sum, 105),
        other => panic!("expected over-allocation error, got {other:?}"),
    }
}

#[test]
fn validate_rejects_single_percentage_above_hundred() {
    let error = rules(101, 0, 0, 0).validate().expect_err("rejected");
    assert!(matches!(
        error,
        RulesError::PercentageOutOfRange {
            category: "SC",
            value: 101
        }
    ));
}
