
use chrono::NaiveDate;
use flight_network::error::Error;
use flight_network::{Reservation, ReservationIdSequence, ReservationStatus, Route};
use network_fixture::{available_seats, leg};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
}

fn ath_skg_route(total_seats: u32) -> Route {
    Route::new(vec![leg("ATH", "SKG", total_seats, 80.0, "A3301")]).unwrap()
}

#[test]
fn test_ids_come_from_the_injected_sequence() {
    let ids = ReservationIdSequence::new();
    let other_ids = ReservationIdSequence::starting_at(5000);
    let route = ath_skg_route(150);

    let first = Reservation::new(route.clone(), 1, &ids).unwrap();
    let second = Reservation::new(route.clone(), 1, &ids).unwrap();
    let unrelated = Reservation::new(route, 1, &other_ids).unwrap();

    assert_eq!(first.id(), 1000);
    assert_eq!(second.id(), 1001);
    assert_eq!(unrelated.id(), 5000);
    assert_eq!(ids.peek(), 1002);
}

#[test]
fn test_invalid_construction_is_rejected() {
    let ids = ReservationIdSequence::new();

    assert!(matches!(Reservation::new(ath_skg_route(150), 0, &ids), Err(Error::InvalidArgument(_))));

    let names = vec!["Maria Papadopoulou".to_string(), "Nikos Georgiou".to_string()];
    assert!(matches!(Reservation::with_customer(ath_skg_route(150), 1, "maria@example.com", names, &ids), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_confirm_books_seats_once() {
    let ids = ReservationIdSequence::new();
    let route = ath_skg_route(150);
    let flight = route.flights()[0].clone();
    let mut reservation = Reservation::new(route, 2, &ids).unwrap();

    assert_eq!(reservation.status(), ReservationStatus::Pending);
    assert_eq!(reservation.total_cost(), 80.0);

    assert!(reservation.confirm());
    assert_eq!(reservation.status(), ReservationStatus::Confirmed);
    assert_eq!(available_seats(&flight), 148);

    assert!(!reservation.confirm());
    assert_eq!(available_seats(&flight), 148);
}

#[test]
fn test_confirm_fails_without_seats() {
    let ids = ReservationIdSequence::new();
    let route = ath_skg_route(3);
    let mut reservation = Reservation::new(route, 4, &ids).unwrap();

    assert!(!reservation.confirm());
    assert_eq!(reservation.status(), ReservationStatus::Pending);
    assert_eq!(available_seats(&reservation.route().flights()[0]), 3);
}

#[test]
fn test_cancel_releases_seats_only_when_confirmed() {
    let ids = ReservationIdSequence::new();
    let route = ath_skg_route(150);
    let flight = route.flights()[0].clone();

    let mut pending = Reservation::new(route.clone(), 5, &ids).unwrap();
    assert!(pending.cancel());
    assert_eq!(pending.status(), ReservationStatus::Cancelled);
    assert_eq!(available_seats(&flight), 150);

    let mut confirmed = Reservation::new(route, 5, &ids).unwrap();
    assert!(confirmed.confirm());
    assert_eq!(available_seats(&flight), 145);
    assert!(confirmed.cancel());
    assert_eq!(available_seats(&flight), 150);

    assert!(!confirmed.cancel());
    assert!(!confirmed.confirm());
    assert!(!confirmed.complete());
    assert_eq!(available_seats(&flight), 150);
}

#[test]
fn test_complete_only_from_confirmed() {
    let ids = ReservationIdSequence::new();
    let mut reservation = Reservation::new(ath_skg_route(150), 1, &ids).unwrap();

    assert!(!reservation.complete());
    assert!(reservation.confirm());
    assert!(reservation.complete());
    assert_eq!(reservation.status(), ReservationStatus::Completed);
    assert!(reservation.status().is_terminal());
    assert!(!reservation.can_modify());
    assert!(!reservation.cancel());
}

#[test]
fn test_update_passenger_count_on_confirmed_reservation() {
    let ids = ReservationIdSequence::new();
    let route = ath_skg_route(10);
    let flight = route.flights()[0].clone();
    let mut reservation = Reservation::new(route, 4, &ids).unwrap();
    assert!(reservation.confirm());

    assert!(reservation.update_passenger_count(6));
    assert_eq!(available_seats(&flight), 4);

    assert!(!reservation.update_passenger_count(11));
    assert_eq!(reservation.passenger_count(), 6);
    assert_eq!(available_seats(&flight), 4);

    assert!(reservation.update_passenger_count(2));
    assert_eq!(available_seats(&flight), 8);

    assert!(!reservation.update_passenger_count(0));
    assert_eq!(reservation.passenger_count(), 2);
}

#[test]
fn test_update_passenger_count_on_pending_reservation_touches_no_seats() {
    let ids = ReservationIdSequence::new();
    let route = ath_skg_route(10);
    let flight = route.flights()[0].clone();
    let mut reservation = Reservation::new(route, 4, &ids).unwrap();

    assert!(reservation.update_passenger_count(8));
    assert_eq!(reservation.passenger_count(), 8);
    assert_eq!(available_seats(&flight), 10);
}

#[test]
fn test_passenger_names_are_bounded_by_the_count() {
    let ids = ReservationIdSequence::new();
    let mut reservation =
        Reservation::with_customer(ath_skg_route(150), 2, "maria@example.com", vec!["Maria Papadopoulou".to_string()], &ids).unwrap();

    assert!(!reservation.add_passenger_name("   "));
    assert!(reservation.add_passenger_name("  Nikos Georgiou "));
    assert!(!reservation.add_passenger_name("Eleni Dimitriou"));
    assert_eq!(reservation.passenger_names(), ["Maria Papadopoulou", "Nikos Georgiou"]);

    assert!(!reservation.update_passenger_count(1), "Cannot drop below the number of named passengers");
    assert!(reservation.validate());
}

#[test]
fn test_refund_tiers() {
    let ids = ReservationIdSequence::new();
    let mut reservation = Reservation::new(ath_skg_route(150), 2, &ids).unwrap();
    assert!(reservation.confirm());
    let cost = reservation.total_cost();

    assert_eq!(reservation.days_until_departure(day(20)), 11);
    assert_eq!(reservation.refund_amount(day(20)), cost);
    assert_eq!(reservation.refund_amount(day(24)), cost);
    assert!((reservation.refund_amount(day(27)) - cost * 0.8).abs() < 1e-9);
    assert!((reservation.refund_amount(day(30)) - cost * 0.5).abs() < 1e-9);

    let departure = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
    assert!(!reservation.is_refundable(departure));
    assert_eq!(reservation.refund_amount(departure), 0.0);

    assert!(reservation.cancel());
    assert_eq!(reservation.refund_amount(day(20)), 0.0);
}

#[test]
fn test_summary_lists_customer_and_passengers() {
    let ids = ReservationIdSequence::new();
    let reservation =
        Reservation::with_customer(ath_skg_route(150), 1, "maria@example.com", vec!["Maria Papadopoulou".to_string()], &ids).unwrap();

    let summary = reservation.summary();

    assert!(summary.contains("Reservation ID: #1000"));
    assert!(summary.contains("Status: Pending Confirmation"));
    assert!(summary.contains("Customer Email: maria@example.com"));
    assert!(summary.contains("1. Maria Papadopoulou"));
    assert!(reservation.to_string().starts_with("Reservation #1000"));
}
