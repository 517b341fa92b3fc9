use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::domain::airport::Airport;
use crate::domain::flight::{Flight, FlightRef, read_flight};
use crate::domain::keyed_directory::{DirectoryStatistics, KeyedDirectory};
use crate::domain::route::Route;
use crate::error::{Endpoint, Error, Result};

/// Aggregate inventory figures over every flight of a [`FlightGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStatistics {
    pub airports: usize,
    pub total_flights: usize,
    pub total_seats: u64,
    pub available_seats: u64,
    /// Booked share of all seats, in percent.
    pub occupancy_rate: f64,
    /// Current price times booked seats, summed over all flights.
    pub estimated_revenue: f64,
    pub avg_flights_per_airport: f64,
}

impl fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Flight Network Statistics ===")?;
        writeln!(f, "Airports: {}", self.airports)?;
        writeln!(f, "Total Flights: {}", self.total_flights)?;
        writeln!(f, "Total Seats: {}", self.total_seats)?;
        writeln!(f, "Available Seats: {}", self.available_seats)?;
        writeln!(f, "Occupancy Rate: {:.1}%", self.occupancy_rate)?;
        writeln!(f, "Estimated Revenue: ${:.2}", self.estimated_revenue)?;
        write!(f, "Average Flights per Airport: {:.1}", self.avg_flights_per_airport)
    }
}

/// Directed graph of airports (vertices) and flights (edges).
///
/// Airports are registered by code, first registration wins. Each flight is
/// stored once, on the adjacency list of its origin. There is no reverse
/// index, so [`get_flights_to`](Self::get_flights_to) scans every list.
#[derive(Debug, Default)]
pub struct FlightGraph {
    airports: KeyedDirectory<String, Airport>,
    adjacency: KeyedDirectory<String, Vec<FlightRef>>,
    total_flights: usize,
}

impl FlightGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `airport` under its code.
    ///
    /// # Returns
    /// `true` if the code was new. A known code is left untouched, including
    /// the name and location stored for it.
    pub fn add_airport(&mut self, airport: Airport) -> Result<bool> {
        if self.airports.contains_key(airport.code()) {
            log::debug!("Airport {} is already registered; keeping the first registration.", airport.code());
            return Ok(false);
        }

        let code = airport.code().to_string();
        self.airports.put(code.clone(), airport)?;
        self.adjacency.put(code, Vec::new())?;

        Ok(true)
    }

    /// Adds `flight` to its origin's adjacency list, registering both
    /// endpoints first if needed.
    ///
    /// # Returns
    /// The shared handle under which the graph keeps the flight.
    pub fn add_flight(&mut self, flight: Flight) -> Result<FlightRef> {
        let origin_code = flight.origin().code().to_string();

        self.add_airport(flight.origin().clone())?;
        self.add_airport(flight.destination().clone())?;

        let flight = flight.into_ref();
        self.adjacency
            .get_mut(origin_code.as_str())
            .ok_or_else(|| Error::ModelConstructionError(format!("No adjacency list for airport {}", origin_code)))?
            .push(flight.clone());
        self.total_flights += 1;

        Ok(flight)
    }

    /// Cheapest direct flight with a free seat, if any.
    pub fn find_direct_flight(&self, origin_code: &str, destination_code: &str) -> Option<FlightRef> {
        self.find_all_direct_flights(origin_code, destination_code).into_iter().next()
    }

    /// Every direct flight with at least one free seat, cheapest first.
    ///
    /// Flights with equal prices keep their adjacency-list order.
    pub fn find_all_direct_flights(&self, origin_code: &str, destination_code: &str) -> Vec<FlightRef> {
        let Some(flights) = self.adjacency.get(origin_code) else {
            return Vec::new();
        };

        let mut priced: Vec<(f64, FlightRef)> = flights
            .iter()
            .filter_map(|leg| {
                let flight = read_flight(leg);
                (flight.destination().code() == destination_code && flight.has_available_seats()).then(|| (flight.current_price(), leg.clone()))
            })
            .collect();

        priced.sort_by(|a, b| a.0.total_cmp(&b.0));
        priced.into_iter().map(|(_, leg)| leg).collect()
    }

    fn ensure_registered(&self, origin_code: &str, destination_code: &str) -> Result<()> {
        if !self.has_airport(origin_code) {
            return Err(Error::AirportNotFound { endpoint: Endpoint::Origin, code: origin_code.to_string() });
        }
        if !self.has_airport(destination_code) {
            return Err(Error::AirportNotFound { endpoint: Endpoint::Destination, code: destination_code.to_string() });
        }
        Ok(())
    }

    fn direct_routes(&self, origin_code: &str, destination_code: &str) -> Result<Vec<Route>> {
        let mut routes = Vec::new();
        for flight in self.find_all_direct_flights(origin_code, destination_code) {
            let route = Route::new(vec![flight])?;
            if route.is_valid() {
                routes.push(route);
            }
        }
        Ok(routes)
    }

    fn one_stop_routes(&self, origin_code: &str, destination_code: &str) -> Result<Vec<Route>> {
        let mut routes = Vec::new();
        let Some(first_legs) = self.adjacency.get(origin_code) else {
            return Ok(routes);
        };

        for first_leg in first_legs {
            let intermediate_code = {
                let flight = read_flight(first_leg);
                if !flight.has_available_seats() || flight.destination().code() == destination_code {
                    continue;
                }
                flight.destination().code().to_string()
            };

            for second_leg in self.find_all_direct_flights(&intermediate_code, destination_code) {
                let route = Route::new(vec![first_leg.clone(), second_leg])?;
                if route.is_valid() {
                    routes.push(route);
                }
            }
        }

        Ok(routes)
    }

    /// Direct and one-stop routes between two registered airports.
    ///
    /// Every leg of every returned route has a free seat at call time.
    /// Sorted by price, then duration.
    ///
    /// # Returns
    /// `Error::AirportNotFound` naming the first unregistered code.
    pub fn find_routes(&self, origin_code: &str, destination_code: &str) -> Result<Vec<Route>> {
        self.ensure_registered(origin_code, destination_code)?;

        let mut routes = self.direct_routes(origin_code, destination_code)?;
        routes.extend(self.one_stop_routes(origin_code, destination_code)?);

        routes.sort_by(Route::compare_by_price);
        log::debug!("Found {} routes {} -> {}.", routes.len(), origin_code, destination_code);

        Ok(routes)
    }

    /// `max_stops == 0` restricts the search to direct flights. Anything
    /// above is served by [`find_routes`](Self::find_routes), which stops at one connection.
    pub fn find_routes_with_max_stops(&self, origin_code: &str, destination_code: &str, max_stops: u32) -> Result<Vec<Route>> {
        if max_stops == 0 {
            self.ensure_registered(origin_code, destination_code)?;
            return self.direct_routes(origin_code, destination_code);
        }
        self.find_routes(origin_code, destination_code)
    }

    pub fn get_airport(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn has_airport(&self, code: &str) -> bool {
        self.airports.contains_key(code)
    }

    pub fn get_flights_from(&self, code: &str) -> Vec<FlightRef> {
        self.adjacency.get(code).cloned().unwrap_or_default()
    }

    /// Incoming flights of `code`. Scans every adjacency list.
    pub fn get_flights_to(&self, code: &str) -> Vec<FlightRef> {
        self.adjacency
            .iter()
            .flat_map(|(_, flights)| flights.iter())
            .filter(|leg| read_flight(leg).destination().code() == code)
            .cloned()
            .collect()
    }

    /// Every flight of the graph, grouped by origin.
    pub fn all_flights(&self) -> Vec<FlightRef> {
        self.adjacency.iter().flat_map(|(_, flights)| flights.iter().cloned()).collect()
    }

    pub fn all_airport_codes(&self) -> Vec<String> {
        self.airports.key_set()
    }

    pub fn all_airports(&self) -> Vec<Airport> {
        self.airports.values()
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }

    pub fn total_flights(&self) -> usize {
        self.total_flights
    }

    /// Removes an airport together with its outgoing and incoming flights.
    ///
    /// # Returns
    /// `false` if the code was not registered.
    pub fn remove_airport(&mut self, code: &str) -> bool {
        if !self.has_airport(code) {
            return false;
        }

        if let Some(outgoing) = self.adjacency.remove(code) {
            self.total_flights -= outgoing.len();
        }

        for origin_code in self.adjacency.key_set() {
            if let Some(flights) = self.adjacency.get_mut(origin_code.as_str()) {
                let before = flights.len();
                flights.retain(|leg| read_flight(leg).destination().code() != code);
                self.total_flights -= before - flights.len();
            }
        }

        self.airports.remove(code);
        log::info!("Removed airport {} and its flights.", code);

        true
    }

    pub fn graph_statistics(&self) -> GraphStatistics {
        let airports = self.airports.len();
        let mut total_seats = 0u64;
        let mut available_seats = 0u64;
        let mut estimated_revenue = 0.0;

        for leg in self.all_flights() {
            let flight = read_flight(&leg);
            total_seats += flight.total_seats() as u64;
            available_seats += flight.available_seats() as u64;
            estimated_revenue += flight.current_price() * flight.booked_seats() as f64;
        }

        let occupancy_rate = if total_seats > 0 { (total_seats - available_seats) as f64 / total_seats as f64 * 100.0 } else { 0.0 };
        let avg_flights_per_airport = if airports > 0 { self.total_flights as f64 / airports as f64 } else { 0.0 };

        GraphStatistics {
            airports,
            total_flights: self.total_flights,
            total_seats,
            available_seats,
            occupancy_rate,
            estimated_revenue,
            avg_flights_per_airport,
        }
    }

    /// The `limit` airports with the most outgoing flights, busiest first.
    ///
    /// # Returns
    /// `Error::InvalidArgument` if `limit` is zero.
    pub fn hub_airports(&self, limit: usize) -> Result<Vec<Airport>> {
        if limit == 0 {
            return Err(Error::invalid_argument("Limit must be positive"));
        }

        let mut airports: Vec<(usize, Airport)> = self
            .airports
            .iter()
            .map(|(code, airport)| (self.adjacency.get(code.as_str()).map_or(0, Vec::len), airport.clone()))
            .collect();

        airports.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(airports.into_iter().take(limit).map(|(_, airport)| airport).collect())
    }

    /// Checks that both endpoints of every flight are registered.
    pub fn validate_graph(&self) -> bool {
        self.all_flights().iter().all(|leg| {
            let flight = read_flight(leg);
            self.has_airport(flight.origin().code()) && self.has_airport(flight.destination().code())
        })
    }

    /// Fewest-hops airport path over flights that still have a free seat.
    ///
    /// Unbounded number of hops and no pricing; meant for connectivity
    /// diagnostics. Empty if either code is unknown or no path exists,
    /// `[origin]` if both codes are equal.
    pub fn shortest_path(&self, origin_code: &str, destination_code: &str) -> Vec<String> {
        if !self.has_airport(origin_code) || !self.has_airport(destination_code) {
            return Vec::new();
        }

        if origin_code == destination_code {
            return vec![origin_code.to_string()];
        }

        let mut queue: VecDeque<String> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut parent: HashMap<String, String> = HashMap::new();

        queue.push_back(origin_code.to_string());
        visited.insert(origin_code.to_string());

        while let Some(current) = queue.pop_front() {
            if current == destination_code {
                let mut path = vec![current];
                while let Some(previous) = parent.get(&path[path.len() - 1]) {
                    path.push(previous.clone());
                }
                path.reverse();
                return path;
            }

            for leg in self.adjacency.get(current.as_str()).into_iter().flatten() {
                let flight = read_flight(leg);
                let neighbor = flight.destination().code();
                if flight.has_available_seats() && !visited.contains(neighbor) {
                    visited.insert(neighbor.to_string());
                    parent.insert(neighbor.to_string(), current.clone());
                    queue.push_back(neighbor.to_string());
                }
            }
        }

        log::debug!("NoPathFound: {} => {}", origin_code, destination_code);
        Vec::new()
    }

    pub fn airport_directory_statistics(&self) -> DirectoryStatistics {
        self.airports.statistics()
    }

    pub fn adjacency_directory_statistics(&self) -> DirectoryStatistics {
        self.adjacency.statistics()
    }
}
