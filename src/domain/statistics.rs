use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::domain::airport::Airport;
use crate::domain::flight::{FlightRef, read_flight};
use crate::domain::flight_network::FlightNetwork;
use crate::domain::reservation::ReservationStatus;
use crate::error::Result;

/// Network-wide inventory and reservation figures.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStatistics {
    pub airports: usize,
    pub total_flights: usize,
    pub total_seats: u64,
    pub booked_seats: u64,
    /// Booked share of all seats, in percent.
    pub occupancy_rate: f64,
    pub avg_flights_per_airport: f64,
    pub total_reservations: usize,
    pub confirmed_reservations: usize,
    /// Sum of the total cost of confirmed reservations.
    pub confirmed_reservation_value: f64,
    /// Current price times booked seats, summed over all flights.
    pub estimated_revenue: f64,
}

impl NetworkStatistics {
    pub fn collect(network: &FlightNetwork) -> Self {
        let graph = network.graph().graph_statistics();
        let reservations = network.all_reservations();

        let confirmed: Vec<_> = reservations.iter().filter(|reservation| reservation.status() == ReservationStatus::Confirmed).collect();

        Self {
            airports: graph.airports,
            total_flights: graph.total_flights,
            total_seats: graph.total_seats,
            booked_seats: graph.total_seats - graph.available_seats,
            occupancy_rate: graph.occupancy_rate,
            avg_flights_per_airport: graph.avg_flights_per_airport,
            total_reservations: reservations.len(),
            confirmed_reservations: confirmed.len(),
            confirmed_reservation_value: confirmed.iter().map(|reservation| reservation.total_cost()).sum(),
            estimated_revenue: graph.estimated_revenue,
        }
    }
}

impl fmt::Display for NetworkStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(40))?;
        writeln!(f, "       NETWORK STATISTICS")?;
        writeln!(f, "{}", "=".repeat(40))?;
        writeln!(f, "Airports: {}", self.airports)?;
        writeln!(f, "Total Flights: {}", self.total_flights)?;
        writeln!(f, "Total Seats: {}", self.total_seats)?;
        writeln!(f, "Booked Seats: {}", self.booked_seats)?;
        writeln!(f, "Occupancy Rate: {:.1}%", self.occupancy_rate)?;
        writeln!(f, "Average Flights per Airport: {:.1}", self.avg_flights_per_airport)?;
        writeln!(f)?;
        writeln!(f, "Total Reservations: {}", self.total_reservations)?;
        writeln!(f, "Confirmed Reservations: {}", self.confirmed_reservations)?;
        writeln!(f, "Total Reservation Value: ${:.2}", self.confirmed_reservation_value)?;
        write!(f, "Estimated Revenue: ${:.2}", self.estimated_revenue)
    }
}

/// Seats and bookings over a set of flights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrafficSummary {
    pub flights: usize,
    pub seats: u64,
    pub booked: u64,
}

impl TrafficSummary {
    fn over(flights: &[FlightRef]) -> Self {
        flights.iter().fold(Self { flights: flights.len(), ..Self::default() }, |mut summary, leg| {
            let flight = read_flight(leg);
            summary.seats += flight.total_seats() as u64;
            summary.booked += flight.booked_seats() as u64;
            summary
        })
    }

    pub fn occupancy_rate(&self) -> f64 {
        if self.seats > 0 { self.booked as f64 / self.seats as f64 * 100.0 } else { 0.0 }
    }
}

impl fmt::Display for TrafficSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} flights, {}/{} seats ({:.1}% full)", self.flights, self.booked, self.seats, self.occupancy_rate())
    }
}

/// Outgoing and incoming traffic of one airport.
#[derive(Debug, Clone, PartialEq)]
pub struct AirportStatistics {
    pub airport: Airport,
    pub outgoing: TrafficSummary,
    pub incoming: TrafficSummary,
}

impl AirportStatistics {
    /// Statistics of the `limit` hub airports, busiest first.
    pub fn for_hubs(network: &FlightNetwork, limit: usize) -> Result<Vec<Self>> {
        let hubs = network.graph().hub_airports(limit)?;

        Ok(hubs
            .into_iter()
            .map(|airport| {
                let outgoing = TrafficSummary::over(&network.get_flights_from(airport.code()));
                let incoming = TrafficSummary::over(&network.get_flights_to(airport.code()));
                Self { airport, outgoing, incoming }
            })
            .collect())
    }
}

impl fmt::Display for AirportStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.airport.name(), self.airport.code())?;
        writeln!(f, "  Outgoing: {}", self.outgoing)?;
        write!(f, "  Incoming: {}", self.incoming)
    }
}

/// Origin/destination pair with its number of bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularRoute {
    pub origin: String,
    pub destination: String,
    pub bookings: usize,
}

impl fmt::Display for PopularRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({} bookings)", self.origin, self.destination, self.bookings)
    }
}

/// The `limit` most booked origin/destination pairs.
///
/// Only confirmed and completed reservations count. Equal counts are ordered
/// by origin, then destination code.
pub fn popular_routes(network: &FlightNetwork, limit: usize) -> Vec<PopularRoute> {
    let mut bookings: BTreeMap<(String, String), usize> = BTreeMap::new();

    for reservation in network.all_reservations() {
        if matches!(reservation.status(), ReservationStatus::Confirmed | ReservationStatus::Completed) {
            let route = reservation.route();
            *bookings.entry((route.origin().code().to_string(), route.destination().code().to_string())).or_default() += 1;
        }
    }

    let mut popular: Vec<PopularRoute> =
        bookings.into_iter().map(|((origin, destination), bookings)| PopularRoute { origin, destination, bookings }).collect();

    popular.sort_by(|a, b| b.bookings.cmp(&a.bookings));
    popular.truncate(limit);
    popular
}

/// Price spread of the routes currently offered between two airports.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingAnalysis {
    pub origin: String,
    pub destination: String,
    pub options: usize,
    pub cheapest: f64,
    pub most_expensive: f64,
    pub average: f64,
}

impl PricingAnalysis {
    /// # Returns
    /// `Ok(None)` if no route is on offer, `Error::AirportNotFound` for an
    /// unregistered code.
    pub fn analyze(network: &FlightNetwork, origin_code: &str, destination_code: &str) -> Result<Option<Self>> {
        let prices: Vec<f64> = network.search_routes(origin_code, destination_code)?.iter().map(|route| route.total_price()).collect();

        if prices.is_empty() {
            return Ok(None);
        }

        let cheapest = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let most_expensive = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = prices.iter().sum::<f64>() / prices.len() as f64;

        Ok(Some(Self {
            origin: origin_code.to_string(),
            destination: destination_code.to_string(),
            options: prices.len(),
            cheapest,
            most_expensive,
            average,
        }))
    }

    pub fn price_range(&self) -> f64 {
        self.most_expensive - self.cheapest
    }
}

impl fmt::Display for PricingAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PRICING ANALYSIS: {} -> {} ({} options)", self.origin, self.destination, self.options)?;
        writeln!(f, "  Cheapest: ${:.2}", self.cheapest)?;
        writeln!(f, "  Most Expensive: ${:.2}", self.most_expensive)?;
        writeln!(f, "  Average: ${:.2}", self.average)?;
        write!(f, "  Price Range: ${:.2}", self.price_range())
    }
}

#[derive(Debug, Serialize)]
struct FlightReportRow {
    flight_number: String,
    origin: String,
    destination: String,
    flight_date: String,
    total_seats: u32,
    available_seats: u32,
    occupancy_percent: String,
    base_price: String,
    current_price: String,
}

/// Writes one `;`-separated CSV row per flight, with a header row.
///
/// # Returns
/// The number of flights written.
pub fn export_flights_csv<W: Write>(network: &FlightNetwork, writer: W) -> Result<usize> {
    let mut csv_wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    let mut rows = 0;

    for leg in network.graph().all_flights() {
        let flight = read_flight(&leg);
        csv_wtr.serialize(FlightReportRow {
            flight_number: flight.flight_number().to_string(),
            origin: flight.origin().code().to_string(),
            destination: flight.destination().code().to_string(),
            flight_date: flight.flight_date().to_string(),
            total_seats: flight.total_seats(),
            available_seats: flight.available_seats(),
            occupancy_percent: format!("{:.1}", flight.occupancy_rate() * 100.0),
            base_price: format!("{:.2}", flight.base_price()),
            current_price: format!("{:.2}", flight.current_price()),
        })?;
        rows += 1;
    }

    csv_wtr.flush()?;
    log::info!("Exported {} flights to CSV.", rows);

    Ok(rows)
}
