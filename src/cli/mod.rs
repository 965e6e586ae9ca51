//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod explore;
pub mod find;
pub mod route;
pub mod serve;

use crate::config::Config;
use crate::controller::driver::{Driver, Event};
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, status, Report};
use crate::geo::GeoPoint;
use crate::query::{get_pipeline, QueryPipeline};
use crate::surface::recording::{RecordingPanel, RecordingSurface};
use crate::surface::{InfoPanel, MapSurface, ViewSettings};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Find convenience stores near a point and route to them
#[derive(Parser)]
#[command(name = "store-finder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session: click the map, pick a store, get a route
    Explore(explore::ExploreArgs),

    /// List stores around a point
    Find(find::FindArgs),

    /// Route from a point to one of the stores around it
    Route(route::RouteArgs),

    /// Start the backend server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Explore(args) => explore::run(args).await,
        Commands::Find(args) => find::run(args).await,
        Commands::Route(args) => route::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize logging; `RUST_LOG` overrides `default`
pub(crate) fn init_logging(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load config and apply a `--backend` override
pub(crate) fn load_config(backend: Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = backend {
        config.backend.base_url = url;
    }
    Ok(config)
}

/// Headless driver for the one-shot commands
pub(crate) type OneShotDriver<Q> = Driver<Q, RecordingSurface, RecordingPanel>;

pub(crate) fn one_shot_driver<Q: QueryPipeline + 'static>(
    pipeline: Q,
    settings: ViewSettings,
) -> OneShotDriver<Q> {
    let controller = Controller::with_settings(
        RecordingSurface::new(),
        RecordingPanel::new(),
        settings,
    );
    Driver::new(controller, Arc::new(pipeline))
}

pub(crate) fn http_driver(config: &Config) -> Result<OneShotDriver<crate::query::http::HttpQueryPipeline>> {
    Ok(one_shot_driver(get_pipeline(config)?, ViewSettings::from(&config.map)))
}

/// Click at `origin` and wait for the search
///
/// A failed search becomes `Error::SearchFailed` with the backend's reason,
/// since there is no panel to show it on.
pub(crate) async fn search_at<Q, M, P>(driver: &mut Driver<Q, M, P>, origin: GeoPoint) -> Result<()>
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    driver.dispatch(Event::MapClicked(origin))?;
    driver.settle().await;
    fail_on_status(driver, status::search_failure_reason, Error::SearchFailed)
}

/// Select the result at `index` and wait for the route
pub(crate) async fn route_to<Q, M, P>(driver: &mut Driver<Q, M, P>, index: usize) -> Result<()>
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    driver.dispatch(Event::ResultClicked(index))?;
    driver.settle().await;
    fail_on_status(driver, status::route_failure_reason, Error::RouteFailed)
}

fn fail_on_status<Q, M, P>(
    driver: &Driver<Q, M, P>,
    reason: fn(&str) -> Option<&str>,
    err: fn(String) -> Error,
) -> Result<()>
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    match reason(driver.controller().session().status()) {
        Some(reason) => Err(err(reason.to_string())),
        None => Ok(()),
    }
}

/// Format a report and print it or write it to `output`
pub(crate) fn emit(report: &Report, format: &str, output: Option<&str>) -> Result<()> {
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    let text = formatter.format(report)?;

    if let Some(path) = output {
        std::fs::write(path, &text)?;
        eprintln!("Output written to {}", path);
    } else {
        print!("{}", text);
    }
    Ok(())
}

/// Print available output formats
pub(crate) fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:<6} - {}", format.name, format.description);
    }
}
