use std::fmt::{self, Write as _};

use chrono::{DateTime, Local, NaiveDate};

use crate::domain::reservation::reservation_id::{ReservationId, ReservationIdSequence};
use crate::domain::route::Route;
use crate::error::{Error, Result};

/// Lifecycle state of a [`Reservation`].
///
/// `Pending -> Confirmed | Cancelled`, `Confirmed -> Cancelled | Completed`.
/// `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Created, no seats held yet.
    Pending,

    /// Seats are booked on every leg of the route.
    Confirmed,

    /// Withdrawn; seats (if any were held) went back to the flights.
    Cancelled,

    /// The trip took place.
    Completed,
}

impl ReservationStatus {
    pub fn description(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending Confirmation",
            ReservationStatus::Confirmed => "Confirmed",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Completed => "Completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::Completed)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A booking of a [`Route`] for a number of passengers.
///
/// Only [`confirm`](Self::confirm) takes seats from the flights, and only
/// cancelling a confirmed reservation gives them back. The cost is quoted at
/// creation and recomputed from the post-booking route price on confirmation.
#[derive(Debug, Clone)]
pub struct Reservation {
    id: ReservationId,
    route: Route,
    booking_time: DateTime<Local>,
    passenger_count: u32,
    total_cost: f64,
    status: ReservationStatus,
    customer_email: String,
    passenger_names: Vec<String>,
}

impl Reservation {
    /// Creates a pending reservation with the next id of `ids`.
    ///
    /// # Returns
    /// `Error::InvalidArgument` if `passenger_count` is zero.
    pub fn new(route: Route, passenger_count: u32, ids: &ReservationIdSequence) -> Result<Self> {
        if passenger_count == 0 {
            return Err(Error::invalid_argument("Passenger count must be positive"));
        }

        let total_cost = route.total_price() * passenger_count as f64;

        Ok(Self {
            id: ids.next_id(),
            route,
            booking_time: Local::now(),
            passenger_count,
            total_cost,
            status: ReservationStatus::Pending,
            customer_email: String::new(),
            passenger_names: Vec::new(),
        })
    }

    /// Creates a pending reservation carrying customer details.
    ///
    /// # Returns
    /// `Error::InvalidArgument` if `passenger_count` is zero or there are more
    /// names than passengers.
    pub fn with_customer(
        route: Route,
        passenger_count: u32,
        customer_email: impl Into<String>,
        passenger_names: Vec<String>,
        ids: &ReservationIdSequence,
    ) -> Result<Self> {
        if passenger_names.len() > passenger_count as usize {
            return Err(Error::invalid_argument(format!("{} passenger names given for {} passengers", passenger_names.len(), passenger_count)));
        }

        let mut reservation = Self::new(route, passenger_count, ids)?;
        reservation.customer_email = customer_email.into();
        reservation.passenger_names = passenger_names;

        Ok(reservation)
    }

    /// Books the route and moves `Pending -> Confirmed`.
    ///
    /// # Returns
    /// `false` with no state change if the reservation is not pending or the
    /// route cannot seat every passenger right now.
    pub fn confirm(&mut self) -> bool {
        if self.status != ReservationStatus::Pending {
            log::debug!("Reservation #{} cannot be confirmed from status {}.", self.id, self.status);
            return false;
        }

        if !self.route.has_availability(self.passenger_count) || !self.route.book_route(self.passenger_count) {
            log::info!("Reservation #{} could not be confirmed: insufficient seats.", self.id);
            return false;
        }

        self.status = ReservationStatus::Confirmed;
        self.total_cost = self.route.total_price() * self.passenger_count as f64;
        log::info!("Reservation #{} confirmed for {} passengers (${:.2}).", self.id, self.passenger_count, self.total_cost);

        true
    }

    /// Moves `Pending | Confirmed -> Cancelled`, releasing seats only when
    /// leaving `Confirmed`.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        if self.status == ReservationStatus::Confirmed {
            self.route.cancel_route(self.passenger_count);
        }

        self.status = ReservationStatus::Cancelled;
        log::info!("Reservation #{} cancelled.", self.id);

        true
    }

    /// Moves `Confirmed -> Completed`.
    pub fn complete(&mut self) -> bool {
        if self.status != ReservationStatus::Confirmed {
            return false;
        }

        self.status = ReservationStatus::Completed;
        log::info!("Reservation #{} completed.", self.id);

        true
    }

    pub fn can_modify(&self) -> bool {
        matches!(self.status, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    /// Changes the passenger count. A confirmed reservation books the extra
    /// seats or releases the surplus on its route.
    ///
    /// # Returns
    /// `false` without any change if the new count is zero, smaller than the
    /// number of named passengers, the reservation is terminal, or the extra
    /// seats are not available.
    pub fn update_passenger_count(&mut self, new_passenger_count: u32) -> bool {
        if new_passenger_count == 0 || !self.can_modify() || (new_passenger_count as usize) < self.passenger_names.len() {
            return false;
        }

        if self.status == ReservationStatus::Confirmed {
            if new_passenger_count > self.passenger_count {
                let additional = new_passenger_count - self.passenger_count;
                if !self.route.has_availability(additional) || !self.route.book_route(additional) {
                    return false;
                }
            } else if new_passenger_count < self.passenger_count {
                self.route.cancel_route(self.passenger_count - new_passenger_count);
            }
        }

        self.passenger_count = new_passenger_count;
        self.total_cost = self.route.total_price() * new_passenger_count as f64;

        true
    }

    /// Adds a (trimmed, non-empty) name while there are unnamed passengers.
    pub fn add_passenger_name(&mut self, passenger_name: &str) -> bool {
        let passenger_name = passenger_name.trim();
        if passenger_name.is_empty() || self.passenger_names.len() >= self.passenger_count as usize {
            return false;
        }

        self.passenger_names.push(passenger_name.to_string());
        true
    }

    /// Departure date of the first leg.
    pub fn departure_date(&self) -> NaiveDate {
        self.route.departure_date()
    }

    /// Whole days from `today` to the departure of the first leg (negative once departed).
    pub fn days_until_departure(&self, today: NaiveDate) -> i64 {
        (self.departure_date() - today).num_days()
    }

    pub fn is_refundable(&self, today: NaiveDate) -> bool {
        self.status != ReservationStatus::Cancelled && self.days_until_departure(today) >= 1
    }

    /// Refund owed if cancelled on `today`: full from 7 days out, 80% from 3,
    /// 50% from 1, nothing later or once cancelled. Informational only.
    pub fn refund_amount(&self, today: NaiveDate) -> f64 {
        if !self.is_refundable(today) {
            return 0.0;
        }

        match self.days_until_departure(today) {
            days if days >= 7 => self.total_cost,
            days if days >= 3 => self.total_cost * 0.8,
            _ => self.total_cost * 0.5,
        }
    }

    /// Structural sanity check used by network validation.
    pub fn validate(&self) -> bool {
        self.route.is_valid() && self.passenger_count > 0 && self.total_cost >= 0.0 && self.passenger_names.len() <= self.passenger_count as usize
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("=== Reservation Summary ===\n");
        let _ = writeln!(summary, "Reservation ID: #{}", self.id);
        let _ = writeln!(summary, "Status: {}", self.status);
        let _ = writeln!(summary, "Booking Date: {}", self.booking_time.date_naive());
        let _ = writeln!(summary, "Passengers: {}", self.passenger_count);
        let _ = writeln!(summary, "Total Cost: ${:.2}\n", self.total_cost);
        summary.push_str("Route Details:\n");
        summary.push_str(&self.route.detailed_description());

        if !self.customer_email.is_empty() {
            let _ = writeln!(summary, "\nCustomer Email: {}", self.customer_email);
        }

        if !self.passenger_names.is_empty() {
            summary.push_str("\nPassengers:\n");
            for (i, name) in self.passenger_names.iter().enumerate() {
                let _ = writeln!(summary, "  {}. {}", i + 1, name);
            }
        }

        summary
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn booking_time(&self) -> DateTime<Local> {
        self.booking_time
    }

    pub fn passenger_count(&self) -> u32 {
        self.passenger_count
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    pub fn set_customer_email(&mut self, customer_email: impl Into<String>) {
        self.customer_email = customer_email.into();
    }

    pub fn passenger_names(&self) -> &[String] {
        &self.passenger_names
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation #{} ({}) - {} passengers - ${:.2} - {}",
            self.id,
            self.booking_time.date_naive(),
            self.passenger_count,
            self.total_cost,
            self.status
        )
    }
}
