use std::sync::Arc;

use crate::api::network_dto::FlightNetworkDto;
use crate::domain::flight_network::FlightNetwork;
use crate::error::Result;
use crate::loader::parser::parse_json_file;

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

pub use crate::domain::airport::Airport;
pub use crate::domain::flight::{Flight, FlightRef};
pub use crate::domain::flight_graph::FlightGraph;
pub use crate::domain::flight_network::CancellationOutcome;
pub use crate::domain::keyed_directory::KeyedDirectory;
pub use crate::domain::reservation::{Reservation, ReservationId, ReservationIdSequence, ReservationStatus};
pub use crate::domain::route::Route;

/// Builds a [`FlightNetwork`] from the JSON description at `file_path`.
pub fn load_flight_network(file_path: &str) -> Result<FlightNetwork> {
    load_flight_network_with_id_sequence(file_path, Arc::new(ReservationIdSequence::new()))
}

/// Like [`load_flight_network`], with reservation ids drawn from `reservation_ids`.
pub fn load_flight_network_with_id_sequence(file_path: &str, reservation_ids: Arc<ReservationIdSequence>) -> Result<FlightNetwork> {
    let network_dto: FlightNetworkDto = parse_json_file::<FlightNetworkDto>(file_path)?;
    log::info!("Network file '{}' parsed successfully.", file_path);

    let network = FlightNetwork::from_dto_with_id_sequence(network_dto, reservation_ids)?;
    log::info!("Flight network constructed successfully.");

    Ok(network)
}
