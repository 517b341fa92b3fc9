use std::cmp::Ordering;
use std::fmt::{self, Write as _};
use std::sync::{Arc, RwLockWriteGuard};

use chrono::NaiveDate;

use crate::domain::airport::Airport;
use crate::domain::flight::{Flight, FlightRef, read_flight, write_flight};
use crate::error::{Error, Result};

/// Minutes spent in the air per leg.
pub const LEG_DURATION_MINUTES: u32 = 120;

/// Minutes spent at each connecting airport.
pub const LAYOVER_MINUTES: u32 = 60;

/// An itinerary of one or more chained flights.
///
/// The chain (`leg[i].destination == leg[i + 1].origin`, compared with full
/// airport equality) is checked once at construction. A route failing the
/// check is kept but inert: price and duration are zero and every booking
/// call reports failure without touching any flight.
///
/// The legs are shared handles to the flights of the graph, so bookings made
/// here are visible network-wide. Booking and cancelling write-lock every
/// distinct leg in a fixed (address) order for their whole check-then-mutate
/// window, so concurrent routes over the same flights can neither oversell
/// nor deadlock.
#[derive(Debug, Clone)]
pub struct Route {
    flights: Vec<FlightRef>,
    is_valid: bool,
}

impl Route {
    /// # Returns
    /// `Error::InvalidArgument` for an empty flight list. A non-empty list that
    /// is not chain-connected yields an invalid (inert) route instead.
    pub fn new(flights: Vec<FlightRef>) -> Result<Self> {
        if flights.is_empty() {
            return Err(Error::invalid_argument("Route must contain at least one flight"));
        }

        let is_valid = Self::is_chain_connected(&flights);
        if !is_valid {
            log::debug!("Route over {} legs is not chain-connected and stays inert.", flights.len());
        }

        Ok(Self { flights, is_valid })
    }

    fn is_chain_connected(flights: &[FlightRef]) -> bool {
        flights.windows(2).all(|pair| {
            let arriving = read_flight(&pair[0]).destination().clone();
            let departing = read_flight(&pair[1]).origin().clone();
            arriving == departing
        })
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Distinct legs in lock order, each with the number of times the route traverses it.
    fn lock_order(&self) -> Vec<(&FlightRef, u32)> {
        let mut legs: Vec<(&FlightRef, u32)> = Vec::with_capacity(self.flights.len());

        for flight in &self.flights {
            match legs.iter_mut().find(|(leg, _)| Arc::ptr_eq(leg, flight)) {
                Some((_, traversals)) => *traversals += 1,
                None => legs.push((flight, 1)),
            }
        }

        legs.sort_by_key(|(leg, _)| Arc::as_ptr(leg) as usize);
        legs
    }

    /// Write-locks every distinct leg and pairs it with the seats a booking needs on it.
    fn lock_legs(&self, passenger_count: u32) -> Option<Vec<(RwLockWriteGuard<'_, Flight>, u32)>> {
        self.lock_order()
            .into_iter()
            .map(|(leg, traversals)| passenger_count.checked_mul(traversals).map(|seats| (write_flight(leg), seats)))
            .collect()
    }

    /// Books `passenger_count` seats on every leg, all or nothing.
    ///
    /// Fails without any mutation unless the route is valid, the count is
    /// positive and every leg has enough seats. If a leg still refuses after
    /// the availability pass, the legs already booked by this call are
    /// released again before reporting failure.
    ///
    /// Prices rise with the new occupancy: [`total_price`](Self::total_price)
    /// read after a successful booking is the authoritative price.
    pub fn book_route(&self, passenger_count: u32) -> bool {
        if passenger_count == 0 || !self.is_valid {
            return false;
        }

        let Some(mut legs) = self.lock_legs(passenger_count) else {
            return false;
        };

        if legs.iter().any(|(flight, seats)| flight.available_seats() < *seats) {
            drop(legs);
            log::debug!("Route {} lacks seats for {} passengers.", self.describe_path(), passenger_count);
            return false;
        }

        for booked in 0..legs.len() {
            let (flight, seats) = &mut legs[booked];
            if !flight.book_seats(*seats) {
                log::warn!("Leg {} refused {} seats after the availability check; rolling back.", flight.flight_number(), seats);
                for (flight, seats) in legs[..booked].iter_mut() {
                    flight.release_seats(*seats);
                }
                return false;
            }
        }

        drop(legs);
        log::debug!("Booked {} passengers on route {}.", passenger_count, self.describe_path());
        true
    }

    /// Releases `passenger_count` seats on every leg.
    ///
    /// Needs no availability check. Each traversal of a leg releases
    /// separately, and a release that would exceed the capacity is dropped.
    pub fn cancel_route(&self, passenger_count: u32) {
        if passenger_count == 0 || !self.is_valid {
            return;
        }

        let mut legs: Vec<(RwLockWriteGuard<'_, Flight>, u32)> =
            self.lock_order().into_iter().map(|(leg, traversals)| (write_flight(leg), traversals)).collect();

        for (flight, traversals) in legs.iter_mut() {
            for _ in 0..*traversals {
                flight.release_seats(passenger_count);
            }
        }

        drop(legs);
        log::debug!("Released {} passengers on route {}.", passenger_count, self.describe_path());
    }

    /// Non-mutating pre-flight check: valid route and enough seats on every leg.
    pub fn has_availability(&self, passenger_count: u32) -> bool {
        if passenger_count == 0 || !self.is_valid {
            return false;
        }

        self.lock_order().into_iter().all(|(leg, traversals)| {
            passenger_count.checked_mul(traversals).is_some_and(|seats| read_flight(leg).available_seats() >= seats)
        })
    }

    /// Sum of the current leg prices, or zero for an invalid route.
    pub fn total_price(&self) -> f64 {
        if !self.is_valid {
            return 0.0;
        }
        self.flights.iter().map(|leg| read_flight(leg).current_price()).sum()
    }

    /// Total minutes including layovers, or zero for an invalid route.
    pub fn total_duration(&self) -> u32 {
        if !self.is_valid {
            return 0;
        }
        let legs = self.flights.len() as u32;
        legs * LEG_DURATION_MINUTES + (legs - 1) * LAYOVER_MINUTES
    }

    pub fn formatted_duration(&self) -> String {
        let duration = self.total_duration();
        format!("{}h {}m", duration / 60, duration % 60)
    }

    pub fn origin(&self) -> Airport {
        read_flight(&self.flights[0]).origin().clone()
    }

    pub fn destination(&self) -> Airport {
        read_flight(&self.flights[self.flights.len() - 1]).destination().clone()
    }

    pub fn departure_date(&self) -> NaiveDate {
        read_flight(&self.flights[0]).flight_date()
    }

    pub fn layover_airports(&self) -> Vec<Airport> {
        self.flights[..self.flights.len() - 1].iter().map(|leg| read_flight(leg).destination().clone()).collect()
    }

    /// Copy of the leg handles; the flights themselves stay shared.
    pub fn flights(&self) -> Vec<FlightRef> {
        self.flights.clone()
    }

    pub fn is_direct(&self) -> bool {
        self.flights.len() == 1
    }

    pub fn flight_count(&self) -> usize {
        self.flights.len()
    }

    pub fn complexity_score(&self) -> f64 {
        self.flights.len() as f64 + (self.total_duration() as f64 / 60.0) * 0.1
    }

    /// Orders by price, then by duration.
    pub fn compare_by_price(a: &Route, b: &Route) -> Ordering {
        a.total_price().total_cmp(&b.total_price()).then_with(|| a.total_duration().cmp(&b.total_duration()))
    }

    /// Orders by duration, then by price.
    pub fn compare_by_duration(a: &Route, b: &Route) -> Ordering {
        a.total_duration().cmp(&b.total_duration()).then_with(|| a.total_price().total_cmp(&b.total_price()))
    }

    /// `"ATH -> SKG -> LHR"`
    pub fn describe_path(&self) -> String {
        let mut path = self.origin().code().to_string();
        for leg in &self.flights {
            path.push_str(" -> ");
            path.push_str(read_flight(leg).destination().code());
        }
        path
    }

    fn kind(&self) -> String {
        if self.is_direct() { "Direct".to_string() } else { format!("{}-Stop", self.flights.len() - 1) }
    }

    pub fn detailed_description(&self) -> String {
        if !self.is_valid {
            return "Invalid Route - Flights are not properly connected".to_string();
        }

        let mut details = String::from("=== Route Details ===\n");
        let _ = writeln!(details, "From: {}", self.origin());
        let _ = writeln!(details, "To: {}", self.destination());
        let _ = writeln!(details, "Type: {}", if self.is_direct() { "Direct Flight".to_string() } else { format!("{} Connection", self.kind()) });
        let _ = writeln!(details, "Total Price: ${:.2}", self.total_price());
        let _ = writeln!(details, "Total Duration: {}", self.formatted_duration());
        let _ = writeln!(details, "Flights: {}\n", self.flights.len());

        for (i, leg) in self.flights.iter().enumerate() {
            let flight = read_flight(leg);
            let _ = writeln!(details, "Flight {}:", i + 1);
            let _ = writeln!(details, "  {}", *flight);
            if i < self.flights.len() - 1 {
                let _ = writeln!(details, "  Layover at: {}", flight.destination());
            }
            details.push('\n');
        }

        details
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid {
            return write!(f, "Invalid Route");
        }

        writeln!(
            f,
            "Route: {} -> {} (${:.2}, {}) [{}]",
            self.origin().code(),
            self.destination().code(),
            self.total_price(),
            self.formatted_duration(),
            self.kind()
        )?;

        for (i, leg) in self.flights.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, *read_flight(leg))?;
        }

        Ok(())
    }
}
