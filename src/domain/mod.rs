pub mod airport;
pub mod flight;
pub mod flight_graph;
pub mod flight_network;
pub mod keyed_directory;
pub mod reservation;
pub mod route;
pub mod statistics;
