
use std::cmp::Ordering;

use flight_network::error::{Endpoint, Error};
use flight_network::{Airport, FlightGraph, Route};
use network_fixture::{airport, available_seats, flight, flight_by_number, small_network};

#[test]
fn test_first_airport_registration_wins() {
    let mut graph = FlightGraph::new();

    assert!(graph.add_airport(Airport::new("ATH", "Athens International Airport", "Athens, Greece").unwrap()).unwrap());
    assert!(!graph.add_airport(Airport::new("ATH", "Ellinikon", "Athens").unwrap()).unwrap());

    assert_eq!(graph.airport_count(), 1);
    assert_eq!(graph.get_airport("ATH").unwrap().name(), "Athens International Airport");
}

#[test]
fn test_airports_with_same_code_are_still_unequal() {
    let first = Airport::new("ATH", "Athens International Airport", "Athens, Greece").unwrap();
    let second = Airport::new("ATH", "Ellinikon", "Athens, Greece").unwrap();

    assert_ne!(first, second);
    assert_eq!(first, first.clone());
}

#[test]
fn test_add_flight_registers_unknown_endpoints() {
    let mut graph = FlightGraph::new();
    graph.add_flight(flight("ATH", "SKG", 150, 80.0, "A3301")).unwrap();

    assert!(graph.has_airport("ATH"));
    assert!(graph.has_airport("SKG"));
    assert_eq!(graph.total_flights(), 1);
    assert_eq!(graph.get_flights_from("ATH").len(), 1);
    assert!(graph.get_flights_from("SKG").is_empty());
    assert!(graph.validate_graph());
}

#[test]
fn test_direct_flights_sorted_by_price_with_stable_ties() {
    let mut graph = FlightGraph::new();
    graph.add_flight(flight("ATH", "LHR", 200, 300.0, "A3801")).unwrap();
    graph.add_flight(flight("ATH", "LHR", 200, 280.0, "A3401")).unwrap();
    graph.add_flight(flight("ATH", "LHR", 100, 280.0, "A3405")).unwrap();

    let numbers: Vec<String> =
        graph.find_all_direct_flights("ATH", "LHR").iter().map(|leg| leg.read().unwrap().flight_number().to_string()).collect();

    assert_eq!(numbers, vec!["A3401", "A3405", "A3801"]);
    assert_eq!(graph.find_direct_flight("ATH", "LHR").unwrap().read().unwrap().flight_number(), "A3401");
    assert!(graph.find_direct_flight("LHR", "ATH").is_none());
}

#[test]
fn test_sold_out_direct_flights_are_skipped() {
    let mut graph = FlightGraph::new();
    let sold_out = graph.add_flight(flight("ATH", "SKG", 10, 50.0, "A3301")).unwrap();
    graph.add_flight(flight("ATH", "SKG", 150, 80.0, "A3303")).unwrap();

    assert!(sold_out.write().unwrap().book_seats(10));

    let direct = graph.find_all_direct_flights("ATH", "SKG");
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].read().unwrap().flight_number(), "A3303");
}

#[test]
fn test_find_routes_returns_direct_and_one_stop_cheapest_first() {
    let network = small_network();
    let routes = network.graph().find_routes("ATH", "LHR").unwrap();

    let paths: Vec<String> = routes.iter().map(|route| route.describe_path()).collect();
    assert_eq!(paths, vec!["ATH -> LHR", "ATH -> SKG -> LHR", "ATH -> CDG -> LHR"]);

    let prices: Vec<f64> = routes.iter().map(|route| route.total_price()).collect();
    assert_eq!(prices, vec![140.0, 200.0, 222.5]);

    for route in &routes {
        assert!(route.is_valid());
        assert_eq!(route.origin().code(), "ATH");
        assert_eq!(route.destination().code(), "LHR");
        for leg in route.flights() {
            assert!(available_seats(&leg) > 0);
        }
    }
}

#[test]
fn test_find_routes_skips_connections_over_sold_out_legs() {
    let network = small_network();
    let skg_lhr = flight_by_number(&network, "A3501");
    assert!(skg_lhr.write().unwrap().book_seats(180));

    let routes = network.graph().find_routes("ATH", "LHR").unwrap();

    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|route| route.describe_path() != "ATH -> SKG -> LHR"));
}

#[test]
fn test_find_routes_names_the_missing_airport() {
    let network = small_network();

    match network.graph().find_routes("XXX", "LHR") {
        Err(Error::AirportNotFound { endpoint, code }) => {
            assert_eq!(endpoint, Endpoint::Origin);
            assert_eq!(code, "XXX");
        }
        other => panic!("Expected AirportNotFound, got {:?}", other),
    }

    let error = network.graph().find_routes("ATH", "YYY").unwrap_err();
    assert_eq!(error.to_string(), "Destination airport not found: YYY");
}

#[test]
fn test_max_stops_zero_restricts_to_direct_flights() {
    let network = small_network();

    let direct = network.graph().find_routes_with_max_stops("ATH", "LHR", 0).unwrap();
    assert_eq!(direct.len(), 1);
    assert!(direct[0].is_direct());

    assert_eq!(network.graph().find_routes_with_max_stops("ATH", "LHR", 3).unwrap().len(), 3);
    assert!(network.graph().find_routes_with_max_stops("ATH", "XXX", 0).is_err());
}

#[test]
fn test_flights_to_scans_every_origin() {
    let network = small_network();

    let mut incoming: Vec<String> = network.graph().get_flights_to("LHR").iter().map(|leg| leg.read().unwrap().flight_number().to_string()).collect();
    incoming.sort();

    assert_eq!(incoming, vec!["A3401", "A3501", "AF1234"]);
    assert!(network.graph().get_flights_to("XXX").is_empty());
}

#[test]
fn test_shortest_path_uses_only_flights_with_free_seats() {
    let network = small_network();
    let graph = network.graph();

    assert_eq!(graph.shortest_path("ATH", "LHR"), vec!["ATH", "LHR"]);
    assert_eq!(graph.shortest_path("SKG", "CDG"), vec!["SKG", "ATH", "CDG"]);
    assert_eq!(graph.shortest_path("ATH", "ATH"), vec!["ATH"]);
    assert!(graph.shortest_path("LHR", "ATH").is_empty());
    assert!(graph.shortest_path("ATH", "XXX").is_empty());

    let ath_lhr = flight_by_number(&network, "A3401");
    assert!(ath_lhr.write().unwrap().book_seats(200));

    assert_eq!(graph.shortest_path("ATH", "LHR"), vec!["ATH", "SKG", "LHR"]);
}

#[test]
fn test_remove_airport_drops_incident_flights() {
    let mut network = small_network();
    let graph = network.graph_mut();
    assert_eq!(graph.total_flights(), 6);

    assert!(graph.remove_airport("SKG"));
    assert!(!graph.remove_airport("SKG"));

    assert!(!graph.has_airport("SKG"));
    assert_eq!(graph.total_flights(), 3);
    assert_eq!(graph.all_flights().len(), 3);
    assert_eq!(graph.get_flights_from("ATH").len(), 2);
    assert!(graph.validate_graph());
}

#[test]
fn test_hub_airports_ranks_by_outgoing_flights() {
    let network = small_network();

    let hubs = network.graph().hub_airports(2).unwrap();
    assert_eq!(hubs.len(), 2);
    assert_eq!(hubs[0].code(), "ATH");
    assert_eq!(hubs[1].code(), "SKG");

    assert!(matches!(network.graph().hub_airports(0), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_graph_statistics_reflect_bookings() {
    let network = small_network();
    assert!(flight_by_number(&network, "A3301").write().unwrap().book_seats(75));

    let statistics = network.graph().graph_statistics();

    assert_eq!(statistics.airports, 4);
    assert_eq!(statistics.total_flights, 6);
    assert_eq!(statistics.total_seats, 1160);
    assert_eq!(statistics.available_seats, 1085);
    // 75 booked at 50% occupancy: 80 * (0.5 + 0.75) = 100
    assert_eq!(statistics.estimated_revenue, 7500.0);
    assert_eq!(statistics.avg_flights_per_airport, 1.5);
}

#[test]
fn test_directory_statistics_track_registered_airports() {
    let network = small_network();
    let airports = network.graph().airport_directory_statistics();
    let adjacency = network.graph().adjacency_directory_statistics();

    assert_eq!(airports.size, 4);
    assert_eq!(adjacency.size, 4);
    assert_eq!(airports.capacity, 16);
    assert!(network.graph().all_airport_codes().contains(&"CDG".to_string()));
    assert_eq!(network.graph().all_airports().len(), 4);
    assert_eq!(airport("CDG"), network.graph().get_airport("CDG").unwrap().clone());
}

#[test]
fn test_equal_prices_fall_back_to_shorter_duration() {
    let mut graph = FlightGraph::new();
    graph.add_flight(flight("ATH", "SKG", 150, 50.0, "A3301")).unwrap();
    graph.add_flight(flight("SKG", "LHR", 180, 50.0, "A3501")).unwrap();
    graph.add_flight(flight("ATH", "LHR", 200, 100.0, "A3401")).unwrap();

    let routes = graph.find_routes("ATH", "LHR").unwrap();

    let summary: Vec<(String, f64, u32)> = routes.iter().map(|route| (route.describe_path(), route.total_price(), route.total_duration())).collect();
    assert_eq!(summary, vec![("ATH -> LHR".to_string(), 50.0, 120), ("ATH -> SKG -> LHR".to_string(), 50.0, 300)]);

    let (direct, one_stop) = (&routes[0], &routes[1]);
    assert_eq!(Route::compare_by_price(direct, one_stop), Ordering::Less);
    assert_eq!(Route::compare_by_price(one_stop, direct), Ordering::Greater);

    let mut reversed = vec![one_stop.clone(), direct.clone()];
    reversed.sort_by(Route::compare_by_price);
    assert!(reversed[0].is_direct(), "Equal-price routes must be ordered by duration");
}
