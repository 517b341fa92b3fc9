use std::fs::File;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use flight_network::domain::statistics::{AirportStatistics, NetworkStatistics, PricingAnalysis, export_flights_csv};
use flight_network::{load_flight_network, logger};

const SAMPLE_NETWORK: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/data/sample_network.json");

/// Loads a flight network and reports on it.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON network description.
    #[arg(long, default_value = SAMPLE_NETWORK)]
    network: String,

    /// Origin airport code of a route search.
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Destination airport code of a route search.
    #[arg(long, requires = "from")]
    to: Option<String>,

    #[arg(long, default_value_t = 1)]
    passengers: u32,

    /// Write a CSV report of every flight to this path.
    #[arg(long)]
    csv: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init();

    let network = load_flight_network(&args.network).with_context(|| format!("loading network from '{}'", args.network))?;

    println!("{}", NetworkStatistics::collect(&network));
    for airport in AirportStatistics::for_hubs(&network, 5)? {
        println!("{}", airport);
    }

    if let (Some(origin), Some(destination)) = (args.from.as_deref(), args.to.as_deref()) {
        let routes = network.search_routes_for_passengers(origin, destination, args.passengers)?;

        if routes.is_empty() {
            println!("{}", format!("No routes found between {} and {}.", origin, destination).yellow());
        } else {
            println!("{}", format!("{} routes {} -> {} for {} passengers:", routes.len(), origin, destination, args.passengers).green().bold());
            for (i, route) in routes.iter().enumerate() {
                print!("{}. {}", i + 1, route);
            }
        }

        if let Some(analysis) = PricingAnalysis::analyze(&network, origin, destination)? {
            println!("{}", analysis);
        }
    }

    if let Some(path) = args.csv.as_deref() {
        let file = File::create(path).with_context(|| format!("creating '{}'", path))?;
        let rows = export_flights_csv(&network, file)?;
        log::info!("Wrote {} flights to '{}'.", rows, path);
    }

    Ok(())
}
