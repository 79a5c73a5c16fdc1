mod effects;
mod location;
mod output;

use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use hhfind_pipeline::{PublishStub, WorkflowEngine};
use hhfind_places::{PlacesSettings, VenueDiscovery};
use tracing_subscriber::EnvFilter;

use crate::effects::{open_map, SoundPlayer};
use crate::location::{LocationRequest, LocationResolver};

/// Exit code when the search origin cannot be determined.
const EXIT_LOCATION_FAILED: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "hhfind", version)]
#[command(about = "Find happy hour deals near you")]
#[command(group(ArgGroup::new("location").args(["auto", "address", "coords"])))]
struct Cli {
    /// Detect your location from your public IP address
    #[arg(long)]
    auto: bool,

    /// Search near an address or city name
    #[arg(long, value_name = "ADDR")]
    address: Option<String>,

    /// Search near explicit coordinates, e.g. "34.0522,-118.2437"
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    coords: Option<String>,

    /// Play the notification sound and exit
    #[arg(long)]
    test_sound: bool,

    /// Search radius in kilometres (overrides HHFIND_SEARCH_RADIUS_KM)
    #[arg(long, value_name = "KM", value_parser = parse_radius)]
    radius_km: Option<f64>,

    /// Do not open the searched location in a browser
    #[arg(long)]
    no_map: bool,
}

impl Cli {
    fn location_request(&self) -> LocationRequest {
        if self.auto {
            LocationRequest::Auto
        } else if let Some(address) = &self.address {
            LocationRequest::Address(address.clone())
        } else if let Some(coords) = &self.coords {
            LocationRequest::Coords(coords.clone())
        } else {
            LocationRequest::Interactive
        }
    }
}

fn parse_radius(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err("radius must be greater than 0".to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = hhfind_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?config, "configuration loaded");

    let sound = SoundPlayer::from_config(&config);
    if cli.test_sound {
        println!("Attempting to play notification sound...");
        match sound.play().await {
            Ok(()) => println!("Sound test complete."),
            Err(e) => println!("Could not play sound: {e}"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    let resolver = LocationResolver::new(&config, !cli.no_map)?;
    let origin = match resolver.resolve(cli.location_request()).await {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!(error = %e, "could not resolve location");
            eprintln!("{e}. Exiting.");
            return Ok(ExitCode::from(EXIT_LOCATION_FAILED));
        }
    };

    let radius_km = cli.radius_km.unwrap_or(config.search_radius_km);
    println!(
        "\nStarting happy hour search for {} ({}) within {radius_km} km...",
        origin.label, origin.coordinate
    );

    let discovery = VenueDiscovery::new(
        config.places_api_key.clone(),
        PlacesSettings::from_app_config(&config),
    )?;
    let publisher = PublishStub::new().with_notifier(sound);
    let engine = WorkflowEngine::new(discovery, publisher, radius_km);

    let outcome = engine.run(origin.coordinate, &origin.label).await;
    println!("\n{}", output::render_outcome(&outcome)?);

    if !cli.no_map {
        open_map(origin.coordinate);
    }

    Ok(ExitCode::from(output::exit_code(outcome.stage)))
}
