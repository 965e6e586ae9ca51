//! Explore command handler
//!
//! Line-driven stand-in for the map page: each command is a click on the
//! map or on the result list, and map changes are printed as they happen.
//! Responses are applied as they arrive while the prompt stays live.

use crate::cli::{init_logging, load_config};
use crate::controller::driver::{Driver, Event};
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::query::{get_pipeline, QueryPipeline};
use crate::surface::console::{ConsolePanel, ConsoleSurface};
use crate::surface::{InfoPanel, MapSurface, ViewSettings};
use clap::Args;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Explore command arguments
#[derive(Args)]
pub struct ExploreArgs {
    /// Backend base URL
    #[arg(long, short = 'b')]
    pub backend: Option<String>,
}

/// One line of input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Click the map here
    Click(GeoPoint),
    /// Click the result list entry at this index
    Select(usize),
    /// Wait for outstanding responses
    Wait,
    Status,
    Help,
    Quit,
}

/// Parse one input line; blank lines yield None
pub fn parse_command(line: &str) -> std::result::Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (name.to_lowercase().as_str(), rest.as_slice()) {
        ("click" | "c", [lat, lng]) => {
            let lat: f64 = lat.parse().map_err(|_| format!("Invalid latitude: {}", lat))?;
            let lng: f64 = lng.parse().map_err(|_| format!("Invalid longitude: {}", lng))?;
            Command::Click(GeoPoint::new(lat, lng))
        }
        ("click" | "c", _) => return Err("Usage: click <lat> <lng>".to_string()),
        ("select" | "s", [n]) => {
            let n: usize = n.parse().map_err(|_| format!("Invalid store number: {}", n))?;
            let index = n
                .checked_sub(1)
                .ok_or_else(|| "Store numbers start at 1".to_string())?;
            Command::Select(index)
        }
        ("select" | "s", _) => return Err("Usage: select <n>".to_string()),
        ("wait" | "w", []) => Command::Wait,
        ("status", []) => Command::Status,
        ("help" | "?", []) => Command::Help,
        ("quit" | "q" | "exit", []) => Command::Quit,
        _ => return Err(format!("Unknown command: {} (try `help`)", line.trim())),
    };
    Ok(Some(command))
}

fn print_help() {
    println!("Commands:");
    println!("  click <lat> <lng>   pick an origin and search around it");
    println!("  select <n>          route to store number n");
    println!("  wait                wait for pending responses");
    println!("  status              show the current session");
    println!("  help                show this help");
    println!("  quit                exit");
}

fn print_status<Q, M, P>(driver: &Driver<Q, M, P>)
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    let session = driver.controller().session();
    println!("State: {}", session.view_state());
    if let Some(origin) = session.origin() {
        println!("Origin: {}", origin);
    }
    println!("Stores: {}", session.results().len());
    if let Some(active) = session.active_route() {
        println!("Route to store {}", active.target + 1);
    }
    if !session.status().is_empty() {
        println!("Status: {}", session.status());
    }
    if driver.in_flight() > 0 {
        println!("Pending: {}", driver.in_flight());
    }
}

/// Handle one command; returns false to stop
pub async fn handle<Q, M, P>(driver: &mut Driver<Q, M, P>, command: Command) -> bool
where
    Q: QueryPipeline + 'static,
    M: MapSurface,
    P: InfoPanel,
{
    let outcome = match command {
        Command::Click(p) => driver.dispatch(Event::MapClicked(p)),
        Command::Select(index) => driver.dispatch(Event::ResultClicked(index)),
        Command::Wait => {
            driver.settle().await;
            Ok(())
        }
        Command::Status => {
            print_status(driver);
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Quit => return false,
    };

    // Invalid clicks and missing origins were already shown as warnings
    if let Err(e @ Error::NoSuchResult(_)) = outcome {
        println!("Warning: {}", e);
    }
    true
}

/// Run the explore command
pub async fn run(args: ExploreArgs) -> Result<()> {
    init_logging("warn");
    let config = load_config(args.backend)?;

    let controller = Controller::with_settings(
        ConsoleSurface::stdout(),
        ConsolePanel::stdout(),
        ViewSettings::from(&config.map),
    );
    let mut driver = Driver::new(controller, Arc::new(get_pipeline(&config)?));

    println!(
        "Map centered on {} at zoom {} (backend {})",
        config.map.center(),
        config.map.zoom,
        config.backend.base_url
    );
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // Input closed: let pending responses land first
                    driver.settle().await;
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if !handle(&mut driver, command).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => println!("{}", msg),
                }
            }
            Some(completion) = driver.next_completion(), if driver.in_flight() > 0 => {
                driver.apply(completion);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PointOfInterest, ResultSet, RouteResult};
    use crate::surface::recording::{RecordingPanel, RecordingSurface};

    struct OneStore;

    impl QueryPipeline for OneStore {
        async fn search_nearby(&self, origin: GeoPoint, _radius: u32) -> Result<ResultSet> {
            Ok(vec![PointOfInterest {
                id: "0".to_string(),
                position: GeoPoint::new(origin.lat + 0.001, origin.lng),
                name: "Circle K".to_string(),
                address: String::new(),
            }])
        }

        async fn fetch_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult> {
            Ok(RouteResult {
                geometry: vec![start, end],
                distance_meters: 111.0,
                duration_seconds: 30.0,
            })
        }
    }

    fn driver() -> Driver<OneStore, RecordingSurface, RecordingPanel> {
        let controller = Controller::new(RecordingSurface::new(), RecordingPanel::new());
        Driver::new(controller, Arc::new(OneStore))
    }

    #[test]
    fn test_parse_click() {
        assert_eq!(
            parse_command("click 21.02 105.84").unwrap(),
            Some(Command::Click(GeoPoint::new(21.02, 105.84)))
        );
        assert_eq!(
            parse_command("  c -33.9 18.4 ").unwrap(),
            Some(Command::Click(GeoPoint::new(-33.9, 18.4)))
        );
        assert!(parse_command("click 21.02").is_err());
        assert!(parse_command("click north 105").unwrap_err().contains("Invalid latitude"));
    }

    #[test]
    fn test_parse_select_is_one_based() {
        assert_eq!(parse_command("select 1").unwrap(), Some(Command::Select(0)));
        assert_eq!(parse_command("s 12").unwrap(), Some(Command::Select(11)));
        assert!(parse_command("select 0").is_err());
        assert!(parse_command("select -1").is_err());
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("QUIT").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("help").unwrap(), Some(Command::Help));
        assert_eq!(parse_command("wait").unwrap(), Some(Command::Wait));
        assert_eq!(parse_command("status").unwrap(), Some(Command::Status));
        assert!(parse_command("dance").unwrap_err().contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_click_wait_select() {
        let mut driver = driver();

        assert!(handle(&mut driver, Command::Click(GeoPoint::new(21.02, 105.84))).await);
        assert!(handle(&mut driver, Command::Wait).await);
        assert_eq!(driver.controller().session().results().len(), 1);

        assert!(handle(&mut driver, Command::Select(0)).await);
        assert!(handle(&mut driver, Command::Wait).await);
        assert_eq!(driver.in_flight(), 0);
        assert_eq!(
            driver.controller().session().status(),
            "Distance: 0.11 km, ETA: 1 min"
        );
    }

    #[tokio::test]
    async fn test_select_before_click_warns() {
        let mut driver = driver();

        assert!(handle(&mut driver, Command::Select(0)).await);
        assert_eq!(driver.in_flight(), 0);
        assert_eq!(
            driver.controller().panel().warnings(),
            ["Click the map to pick an origin first."]
        );
    }

    #[tokio::test]
    async fn test_quit_stops() {
        let mut driver = driver();
        assert!(!handle(&mut driver, Command::Quit).await);
    }
}
