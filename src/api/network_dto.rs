use serde::{Deserialize, Serialize};

/// Root of a flight network description file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlightNetworkDto {
    pub airports: Vec<AirportDto>,

    #[serde(default)]
    pub flights: Vec<FlightDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirportDto {
    pub code: String,
    pub name: String,

    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDto {
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub total_seats: u32,
    pub base_price: f64,

    /// `YYYY-MM-DD`
    pub flight_date: String,

    /// Seats already sold when the network is loaded.
    #[serde(default)]
    pub booked_seats: Option<u32>,
}
