use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rand::Rng;

use crate::api::network_dto::FlightNetworkDto;
use crate::domain::airport::Airport;
use crate::domain::flight::{Flight, FlightRef, read_flight, write_flight};
use crate::domain::flight_graph::FlightGraph;
use crate::domain::reservation::{Reservation, ReservationId, ReservationIdSequence, ReservationStatus, ReservationStore};
use crate::domain::route::Route;
use crate::error::{Error, Result};

/// Result of [`FlightNetwork::cancel_reservation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationOutcome {
    Cancelled,
    NotFound,
    /// The reservation exists but its status does not allow cancelling.
    InvalidStatus(ReservationStatus),
}

/// Entry point of the flight network: the graph of airports and flights plus
/// every reservation made against it.
///
/// Reservation ids come from an injected [`ReservationIdSequence`], so
/// independent networks keep independent id ranges unless they are handed
/// the same sequence on purpose.
#[derive(Debug)]
pub struct FlightNetwork {
    graph: FlightGraph,
    reservations: ReservationStore,
    reservation_ids: Arc<ReservationIdSequence>,
}

impl Default for FlightNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightNetwork {
    pub fn new() -> Self {
        Self::with_id_sequence(Arc::new(ReservationIdSequence::new()))
    }

    pub fn with_id_sequence(reservation_ids: Arc<ReservationIdSequence>) -> Self {
        Self { graph: FlightGraph::new(), reservations: ReservationStore::new(), reservation_ids }
    }

    /// Builds a network from its JSON description.
    ///
    /// Airports are registered first, then every flight is resolved against
    /// them by code. `bookedSeats` are taken out of the inventory right away.
    ///
    /// # Returns
    /// `Error::ModelConstructionError` for a flight naming an unknown airport,
    /// an unparsable date or more booked seats than the flight has.
    pub fn from_dto(dto: FlightNetworkDto) -> Result<Self> {
        Self::from_dto_with_id_sequence(dto, Arc::new(ReservationIdSequence::new()))
    }

    /// [`from_dto`](Self::from_dto) drawing reservation ids from `reservation_ids`.
    pub fn from_dto_with_id_sequence(dto: FlightNetworkDto, reservation_ids: Arc<ReservationIdSequence>) -> Result<Self> {
        let mut network = Self::with_id_sequence(reservation_ids);

        for airport_dto in dto.airports {
            network.add_airport(Airport::new(airport_dto.code, airport_dto.name, airport_dto.location)?)?;
        }

        for flight_dto in dto.flights {
            let origin = network.resolve_airport(&flight_dto.origin, &flight_dto.flight_number)?;
            let destination = network.resolve_airport(&flight_dto.destination, &flight_dto.flight_number)?;

            let flight_date = NaiveDate::parse_from_str(&flight_dto.flight_date, "%Y-%m-%d").map_err(|e| {
                Error::ModelConstructionError(format!("Flight {} has an invalid date '{}': {}", flight_dto.flight_number, flight_dto.flight_date, e))
            })?;

            let mut flight = Flight::new(origin, destination, flight_dto.total_seats, flight_dto.base_price, flight_date, flight_dto.flight_number)?;

            if let Some(booked_seats) = flight_dto.booked_seats.filter(|seats| *seats > 0) {
                if !flight.book_seats(booked_seats) {
                    return Err(Error::ModelConstructionError(format!(
                        "Flight {} cannot have {} of {} seats booked",
                        flight.flight_number(),
                        booked_seats,
                        flight.total_seats()
                    )));
                }
            }

            network.add_flight(flight)?;
        }

        log::info!("Flight network built with {} airports and {} flights.", network.graph.airport_count(), network.graph.total_flights());

        Ok(network)
    }

    fn resolve_airport(&self, code: &str, flight_number: &str) -> Result<Airport> {
        self.graph
            .get_airport(code)
            .cloned()
            .ok_or_else(|| Error::ModelConstructionError(format!("Flight {} references unknown airport {}", flight_number, code)))
    }

    /// # Returns
    /// `true` if the code was not registered yet.
    pub fn add_airport(&mut self, airport: Airport) -> Result<bool> {
        self.graph.add_airport(airport)
    }

    pub fn add_airports(&mut self, airports: impl IntoIterator<Item = Airport>) -> Result<()> {
        for airport in airports {
            self.add_airport(airport)?;
        }
        Ok(())
    }

    pub fn add_flight(&mut self, flight: Flight) -> Result<FlightRef> {
        self.graph.add_flight(flight)
    }

    pub fn add_flights(&mut self, flights: impl IntoIterator<Item = Flight>) -> Result<Vec<FlightRef>> {
        flights.into_iter().map(|flight| self.add_flight(flight)).collect()
    }

    /// Direct and one-stop routes, cheapest first.
    ///
    /// # Returns
    /// `Error::AirportNotFound` if either code is not registered.
    pub fn search_routes(&self, origin_code: &str, destination_code: &str) -> Result<Vec<Route>> {
        self.graph.find_routes(origin_code, destination_code)
    }

    /// Same as [`search_routes`](Self::search_routes), keeping only routes
    /// that can seat `passenger_count` passengers right now.
    pub fn search_routes_for_passengers(&self, origin_code: &str, destination_code: &str, passenger_count: u32) -> Result<Vec<Route>> {
        if passenger_count == 0 {
            return Err(Error::invalid_argument("Passenger count must be positive"));
        }

        let routes = self.search_routes(origin_code, destination_code)?;
        Ok(routes.into_iter().filter(|route| route.has_availability(passenger_count)).collect())
    }

    /// Creates and confirms a reservation of `route`.
    ///
    /// # Returns
    /// `Ok(None)` if the seats are gone by the time the reservation is
    /// confirmed; nothing is stored in that case.
    pub fn make_reservation(&mut self, route: &Route, passenger_count: u32) -> Result<Option<ReservationId>> {
        let reservation = Reservation::new(route.clone(), passenger_count, &self.reservation_ids)?;
        Ok(self.confirm_and_store(reservation))
    }

    /// Like [`make_reservation`](Self::make_reservation), additionally
    /// indexing the reservation under `customer_email`.
    pub fn make_customer_reservation(
        &mut self,
        route: &Route,
        passenger_count: u32,
        customer_email: &str,
        passenger_names: Vec<String>,
    ) -> Result<Option<ReservationId>> {
        if customer_email.trim().is_empty() {
            return Err(Error::invalid_argument("Customer email cannot be empty"));
        }

        let reservation = Reservation::with_customer(route.clone(), passenger_count, customer_email, passenger_names, &self.reservation_ids)?;
        Ok(self.confirm_and_store(reservation))
    }

    fn confirm_and_store(&mut self, mut reservation: Reservation) -> Option<ReservationId> {
        if !reservation.confirm() {
            log::info!("Reservation failed: insufficient seats on {}.", reservation.route().describe_path());
            return None;
        }

        Some(self.reservations.add(reservation))
    }

    pub fn cancel_reservation(&mut self, reservation_id: ReservationId) -> CancellationOutcome {
        let Some(reservation) = self.reservations.get_mut(reservation_id) else {
            log::info!("Reservation not found: #{}", reservation_id);
            return CancellationOutcome::NotFound;
        };

        if reservation.cancel() {
            CancellationOutcome::Cancelled
        } else {
            log::info!("Cannot cancel reservation #{} - Status: {}", reservation_id, reservation.status());
            CancellationOutcome::InvalidStatus(reservation.status())
        }
    }

    /// # Returns
    /// `false` if the reservation is unknown or not confirmed.
    pub fn complete_reservation(&mut self, reservation_id: ReservationId) -> bool {
        self.reservations.get_mut(reservation_id).is_some_and(Reservation::complete)
    }

    /// # Returns
    /// `false` if the reservation is unknown or refuses the new count.
    pub fn update_passenger_count(&mut self, reservation_id: ReservationId, new_passenger_count: u32) -> bool {
        self.reservations.get_mut(reservation_id).is_some_and(|reservation| reservation.update_passenger_count(new_passenger_count))
    }

    pub fn reservation(&self, reservation_id: ReservationId) -> Option<&Reservation> {
        self.reservations.get(reservation_id)
    }

    pub fn reservation_mut(&mut self, reservation_id: ReservationId) -> Option<&mut Reservation> {
        self.reservations.get_mut(reservation_id)
    }

    pub fn customer_reservations(&self, customer_email: &str) -> Vec<&Reservation> {
        self.reservations.by_customer(customer_email)
    }

    /// Every stored reservation, ordered by id.
    pub fn all_reservations(&self) -> Vec<&Reservation> {
        self.reservations.all()
    }

    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }

    /// Graph integrity plus [`Reservation::validate`] for every reservation.
    pub fn validate_network(&self) -> bool {
        self.graph.validate_graph() && self.reservations.iter().all(Reservation::validate)
    }

    /// Books a random share (up to 20%) of the available seats of every flight,
    /// bypassing reservations.
    ///
    /// # Returns
    /// The total number of seats booked.
    pub fn simulate_demand<R: Rng>(&self, rng: &mut R) -> u64 {
        let mut booked = 0u64;

        for leg in self.graph.all_flights() {
            let mut flight = write_flight(&leg);
            let available_seats = flight.available_seats();
            if available_seats == 0 {
                continue;
            }

            let upper_bound = (available_seats as f64 * 0.2) as u32;
            let additional = rng.random_range(0..upper_bound.max(1));
            if flight.book_seats(additional) {
                booked += additional as u64;
            }
        }

        log::info!("Demand simulation booked {} seats.", booked);
        booked
    }

    /// Plain-text dump of every airport, flight and reservation.
    pub fn export_summary(&self) -> String {
        let mut summary = String::from("FLIGHT NETWORK SUMMARY\n");
        let _ = writeln!(summary, "Generated: {}\n", Local::now().date_naive());

        summary.push_str("AIRPORTS:\n");
        for airport in self.graph.all_airports() {
            let _ = writeln!(summary, "- {}", airport);
        }

        summary.push_str("\nFLIGHTS:\n");
        for leg in self.graph.all_flights() {
            let _ = writeln!(summary, "- {}", *read_flight(&leg));
        }

        summary.push_str("\nRESERVATIONS:\n");
        for reservation in self.reservations.all() {
            let _ = writeln!(summary, "- {}", reservation);
        }

        summary
    }

    pub fn graph(&self) -> &FlightGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut FlightGraph {
        &mut self.graph
    }

    pub fn get_airport(&self, code: &str) -> Option<&Airport> {
        self.graph.get_airport(code)
    }

    pub fn get_flights_from(&self, code: &str) -> Vec<FlightRef> {
        self.graph.get_flights_from(code)
    }

    pub fn get_flights_to(&self, code: &str) -> Vec<FlightRef> {
        self.graph.get_flights_to(code)
    }

    pub fn all_airport_codes(&self) -> Vec<String> {
        self.graph.all_airport_codes()
    }

    pub fn all_airports(&self) -> Vec<Airport> {
        self.graph.all_airports()
    }
}
