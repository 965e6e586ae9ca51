//! Find command handler
//!
//! Runs one nearby search and prints the stores found.

use crate::cli::{emit, http_driver, init_logging, list_formats, load_config, search_at};
use crate::error::Result;
use crate::format::Report;
use crate::geo::GeoPoint;
use clap::Args;

/// Find command arguments
#[derive(Args)]
pub struct FindArgs {
    /// Latitude (defaults to the configured map center)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (defaults to the configured map center)
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Backend base URL
    #[arg(long, short = 'b')]
    pub backend: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the find command
pub async fn run(args: FindArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    init_logging("warn");
    let config = load_config(args.backend)?;

    let center = config.map.center();
    let origin = GeoPoint::new(args.lat.unwrap_or(center.lat), args.lng.unwrap_or(center.lng));
    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());

    let mut driver = http_driver(&config)?;
    search_at(&mut driver, origin).await?;

    let report = Report::from_session(driver.controller().session());
    emit(&report, &format, args.output.as_deref())
}
