//! Check command handler
//!
//! Tells whether a pin could be dropped at a location.

use crate::cli::open_tracker;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::Result;
use clap::Args;

/// Check command arguments
#[derive(Args)]
pub struct CheckArgs {
    /// Latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    /// Radius of the prospective geofence; also rejects spots whose circle
    /// would cover another pin
    #[arg(long, short = 'r')]
    pub radius: Option<u32>,

    /// Pin ID (or prefix) to ignore, e.g. one about to be moved
    #[arg(long, short = 'x')]
    pub exclude: Option<String>,
}

/// Run the check command
pub async fn run(args: CheckArgs) -> Result<()> {
    let config = Config::load()?;
    let tracker = open_tracker(&config)?;

    let candidate = Coordinates::new(args.lat, args.lng);
    candidate.validate()?;

    let exclude = args
        .exclude
        .as_deref()
        .map(|prefix| tracker.resolve_id(prefix))
        .transpose()?;

    let allowed = match args.radius {
        Some(radius) => tracker.can_place_geofence(candidate, radius, exclude.as_ref()),
        None => tracker.can_place_pin(candidate, exclude.as_ref()),
    };

    if allowed {
        println!("OK: a pin can be placed at {}", candidate);
        return Ok(());
    }

    println!("Blocked: {} overlaps an existing geofence", candidate);
    for pin in tracker.pins() {
        if exclude.as_ref() == Some(&pin.id) {
            continue;
        }
        let distance = pin.distance_to(candidate);
        let covered = pin.contains(candidate)
            || args.radius.is_some_and(|r| distance <= f64::from(r));
        if covered {
            println!(
                "  {} ({}) is {:.0}m away, radius {}m",
                pin.name, pin.id, distance, pin.alert_distance
            );
        }
    }
    std::process::exit(1);
}
