//! Route command handler
//!
//! Searches around a point, then routes to the chosen store.

use crate::cli::{emit, http_driver, init_logging, load_config, route_to, search_at};
use crate::error::{Error, Result};
use crate::format::Report;
use crate::geo::GeoPoint;
use clap::Args;

/// Route command arguments
#[derive(Args)]
pub struct RouteArgs {
    /// Latitude of the origin (defaults to the configured map center)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the origin (defaults to the configured map center)
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Store number, as listed by `find` (starting at 1)
    #[arg(long, short = 't')]
    pub to: usize,

    /// Backend base URL
    #[arg(long, short = 'b')]
    pub backend: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}

/// Run the route command
pub async fn run(args: RouteArgs) -> Result<()> {
    let index = args
        .to
        .checked_sub(1)
        .ok_or_else(|| Error::Config("Store numbers start at 1".to_string()))?;

    init_logging("warn");
    let config = load_config(args.backend)?;

    let center = config.map.center();
    let origin = GeoPoint::new(args.lat.unwrap_or(center.lat), args.lng.unwrap_or(center.lng));
    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());

    let mut driver = http_driver(&config)?;
    search_at(&mut driver, origin).await?;
    route_to(&mut driver, index).await?;

    let report = Report::from_session(driver.controller().session());
    emit(&report, &format, args.output.as_deref())
}
