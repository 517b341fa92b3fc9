use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::domain::airport::Airport;
use crate::error::{Error, Result};

/// Occupancy at or above which a seat costs twice the base price.
pub const PEAK_OCCUPANCY: f64 = 0.90;

/// Occupancy at or below which a seat costs half the base price.
pub const LOW_OCCUPANCY: f64 = 0.10;

/// A flight shared between the graph and every route that contains it.
///
/// Seat bookings through any route are visible network-wide.
pub type FlightRef = Arc<RwLock<Flight>>;

/// Seat price for a given occupancy rate (`booked / total`).
///
/// Piecewise: `2.0 * base` from 90% occupancy, `0.5 * base` up to 10%,
/// `base * (0.5 + 1.5 * occupancy)` in between. The curve jumps at both
/// breakpoints.
pub fn price_for_occupancy(base_price: f64, occupancy_rate: f64) -> f64 {
    if occupancy_rate >= PEAK_OCCUPANCY {
        base_price * 2.0
    } else if occupancy_rate <= LOW_OCCUPANCY {
        base_price * 0.5
    } else {
        base_price * (0.5 + 1.5 * occupancy_rate)
    }
}

/// A single leg between two airports with its own seat inventory.
///
/// `0 <= available_seats <= total_seats` holds after every operation.
#[derive(Debug, Clone)]
pub struct Flight {
    origin: Airport,
    destination: Airport,
    total_seats: u32,
    available_seats: u32,
    base_price: f64,
    flight_date: NaiveDate,
    flight_number: String,
}

impl Flight {
    pub fn new(
        origin: Airport,
        destination: Airport,
        total_seats: u32,
        base_price: f64,
        flight_date: NaiveDate,
        flight_number: impl Into<String>,
    ) -> Result<Self> {
        if total_seats == 0 || base_price.is_nan() || base_price <= 0.0 {
            return Err(Error::invalid_argument("Total seats and base price must be positive"));
        }
        if origin == destination {
            return Err(Error::invalid_argument("Origin and destination cannot be the same"));
        }

        Ok(Self {
            origin,
            destination,
            total_seats,
            available_seats: total_seats,
            base_price,
            flight_date,
            flight_number: flight_number.into(),
        })
    }

    /// Wraps the flight into a shared handle.
    pub fn into_ref(self) -> FlightRef {
        Arc::new(RwLock::new(self))
    }

    /// Takes `seat_count` seats out of the inventory.
    ///
    /// # Returns
    /// `false` without touching the inventory if `seat_count` is zero or larger
    /// than the available seats.
    pub fn book_seats(&mut self, seat_count: u32) -> bool {
        if seat_count == 0 || seat_count > self.available_seats {
            return false;
        }
        self.available_seats -= seat_count;
        true
    }

    /// Puts `seat_count` seats back. A release that would exceed the total
    /// capacity is dropped.
    pub fn release_seats(&mut self, seat_count: u32) {
        if seat_count == 0 {
            return;
        }

        match self.available_seats.checked_add(seat_count) {
            Some(available) if available <= self.total_seats => self.available_seats = available,
            _ => log::warn!(
                "Dropped release of {} seats on {}: only {} of {} seats are booked.",
                seat_count,
                self.flight_number,
                self.booked_seats(),
                self.total_seats
            ),
        }
    }

    pub fn occupancy_rate(&self) -> f64 {
        self.booked_seats() as f64 / self.total_seats as f64
    }

    /// Current seat price, derived from live occupancy on every call.
    pub fn current_price(&self) -> f64 {
        price_for_occupancy(self.base_price, self.occupancy_rate())
    }

    pub fn has_available_seats(&self) -> bool {
        self.available_seats > 0
    }

    pub fn booked_seats(&self) -> u32 {
        self.total_seats - self.available_seats
    }

    pub fn origin(&self) -> &Airport {
        &self.origin
    }

    pub fn destination(&self) -> &Airport {
        &self.destination
    }

    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    pub fn available_seats(&self) -> u32 {
        self.available_seats
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    pub fn flight_date(&self) -> NaiveDate {
        self.flight_date
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} | Date: {} | Seats: {} available / {} total ({:.1}% full) | Price: {:.2} (Base: {:.2})",
            self.flight_number,
            self.origin.code(),
            self.destination.code(),
            self.flight_date,
            self.available_seats,
            self.total_seats,
            self.occupancy_rate() * 100.0,
            self.current_price(),
            self.base_price
        )
    }
}

/// Read access to a shared flight.
///
/// Every seat mutation is a single field update, so a poisoned lock still
/// guards a consistent flight and is recovered.
pub fn read_flight(flight: &FlightRef) -> RwLockReadGuard<'_, Flight> {
    flight.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access to a shared flight, see [`read_flight`].
pub fn write_flight(flight: &FlightRef) -> RwLockWriteGuard<'_, Flight> {
    flight.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn athens_to_thessaloniki(total_seats: u32) -> Flight {
        let ath = Airport::new("ATH", "Athens International Airport", "Athens, Greece").unwrap();
        let skg = Airport::new("SKG", "Thessaloniki Airport Makedonia", "Thessaloniki, Greece").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        Flight::new(ath, skg, total_seats, 80.0, date, "A3301").unwrap()
    }

    #[test]
    fn test_price_breakpoints() {
        assert_eq!(price_for_occupancy(80.0, 0.0), 40.0);
        assert_eq!(price_for_occupancy(80.0, 0.10), 40.0);
        assert_eq!(price_for_occupancy(80.0, 0.5), 100.0);
        assert_eq!(price_for_occupancy(80.0, 0.90), 160.0);
        assert_eq!(price_for_occupancy(80.0, 1.0), 160.0);
    }

    #[test]
    fn test_price_is_non_decreasing_within_each_band() {
        let mut previous = price_for_occupancy(100.0, 0.0);
        for step in 1..=100 {
            let occupancy = step as f64 / 100.0;
            let price = price_for_occupancy(100.0, occupancy);
            assert!(price >= previous, "price dropped at occupancy {}", occupancy);
            previous = price;
        }
    }

    #[test]
    fn test_fresh_flight_is_half_price() {
        let flight = athens_to_thessaloniki(150);
        assert_eq!(flight.available_seats(), 150);
        assert_eq!(flight.current_price(), 40.0);
    }

    #[test]
    fn test_flight_at_ninety_percent_is_double_price() {
        let mut flight = athens_to_thessaloniki(150);
        assert!(flight.book_seats(135));
        assert_eq!(flight.current_price(), 160.0);
    }

    #[test]
    fn test_overbooking_leaves_inventory_untouched() {
        let mut flight = athens_to_thessaloniki(150);
        assert!(!flight.book_seats(151));
        assert!(!flight.book_seats(0));
        assert_eq!(flight.available_seats(), 150);
    }

    #[test]
    fn test_release_never_exceeds_capacity() {
        let mut flight = athens_to_thessaloniki(10);
        assert!(flight.book_seats(3));

        flight.release_seats(5);
        assert_eq!(flight.available_seats(), 7);

        flight.release_seats(3);
        assert_eq!(flight.available_seats(), 10);

        flight.release_seats(u32::MAX);
        assert_eq!(flight.available_seats(), 10);
    }

    #[test]
    fn test_invalid_flights_are_rejected() {
        let ath = Airport::new("ATH", "Athens", "Greece").unwrap();
        let skg = Airport::new("SKG", "Thessaloniki", "Greece").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        assert!(Flight::new(ath.clone(), skg.clone(), 0, 80.0, date, "X").is_err());
        assert!(Flight::new(ath.clone(), skg.clone(), 10, 0.0, date, "X").is_err());
        assert!(Flight::new(ath.clone(), skg, 10, f64::NAN, date, "X").is_err());
        assert!(Flight::new(ath.clone(), ath, 10, 80.0, date, "X").is_err());
    }
}
