use std::process::ExitCode;

use next_departures::transitland::{TransitClient, TransitConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(operator), Some(from), Some(to)) = (args.next(), args.next(), args.next()) else {
        eprintln!("usage: next-departures <operator> <from-stop> <to-stop>");
        eprintln!();
        eprintln!("example: next-departures patco haddonfield ashland");
        return ExitCode::FAILURE;
    };

    let mut config = TransitConfig::default();
    if let Ok(base_url) = std::env::var("TRANSITLAND_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    let client = TransitClient::new(config).expect("Failed to create transit.land client");

    match client.find_next_departures(&operator, &from, &to).await {
        Ok(legs) if legs.is_empty() => {
            println!("No departures found for {operator}: {from} -> {to}");
            ExitCode::SUCCESS
        }
        Ok(legs) => {
            for leg in legs {
                println!("{leg}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
