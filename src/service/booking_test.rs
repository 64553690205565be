use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::BookingStatus;
use crate::service::booking::{
    rental_days, rental_price, validate_transition, validate_window, windows_overlap,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn overlapping_windows_conflict() {
    // Existing booking 2024-03-01..03, candidate 2024-03-02..04.
    assert!(windows_overlap(
        date(2024, 3, 1),
        date(2024, 3, 3),
        date(2024, 3, 2),
        date(2024, 3, 4),
    ));
}

#[test]
fn same_day_return_and_pickup_conflict() {
    // Closed intervals: a return on the pickup day still blocks the slot.
    assert!(windows_overlap(
        date(2024, 3, 1),
        date(2024, 3, 3),
        date(2024, 3, 3),
        date(2024, 3, 5),
    ));
}

#[test]
fn disjoint_windows_do_not_conflict() {
    assert!(!windows_overlap(
        date(2024, 3, 1),
        date(2024, 3, 3),
        date(2024, 3, 4),
        date(2024, 3, 6),
    ));
    // Symmetric: earlier candidate against a later booking.
    assert!(!windows_overlap(
        date(2024, 3, 4),
        date(2024, 3, 6),
        date(2024, 3, 1),
        date(2024, 3, 3),
    ));
}

#[test]
fn containment_counts_as_overlap() {
    assert!(windows_overlap(
        date(2024, 3, 1),
        date(2024, 3, 10),
        date(2024, 3, 4),
        date(2024, 3, 5),
    ));
}

#[test]
fn price_is_days_times_daily_rate() {
    // Pickup 2024-01-01, return 2024-01-03, 100/day -> 200.
    assert_eq!(rental_price(100, date(2024, 1, 1), date(2024, 1, 3)), 200);
    assert_eq!(rental_days(date(2024, 1, 1), date(2024, 1, 3)), 2);
}

#[test]
fn single_day_rental_is_one_day() {
    assert_eq!(rental_price(150, date(2024, 5, 10), date(2024, 5, 11)), 150);
}

#[test]
fn price_spans_month_boundaries() {
    assert_eq!(rental_days(date(2024, 1, 30), date(2024, 2, 2)), 3);
    assert_eq!(rental_price(75, date(2024, 1, 30), date(2024, 2, 2)), 225);
}

#[test]
fn zero_length_window_is_rejected() {
    let err = validate_window(date(2024, 3, 1), date(2024, 3, 1)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn inverted_window_is_rejected() {
    let err = validate_window(date(2024, 3, 5), date(2024, 3, 1)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn well_formed_window_passes() {
    assert!(validate_window(date(2024, 3, 1), date(2024, 3, 2)).is_ok());
}

#[test]
fn pending_moves_to_either_terminal_status() {
    assert!(validate_transition(BookingStatus::Pending, BookingStatus::Confirmed).is_ok());
    assert!(validate_transition(BookingStatus::Pending, BookingStatus::Cancelled).is_ok());
}

#[test]
fn terminal_statuses_do_not_move() {
    for current in [BookingStatus::Confirmed, BookingStatus::Cancelled] {
        for requested in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            let err = validate_transition(current, requested).unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }
}

#[test]
fn pending_cannot_be_reasserted() {
    let err = validate_transition(BookingStatus::Pending, BookingStatus::Pending).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
