//! store-finder: nearby convenience stores and driving routes
//!
//! A library and CLI tool that finds convenience stores around a picked
//! point and routes to the one the user selects.
//!
//! ## Features
//!
//! - Interaction controller with stale-response handling
//! - Nearby search and routing through an HTTP backend
//! - Backend proxy to Overpass and OSRM
//! - Interactive and one-shot CLI front-ends
//!
//! ## Quick Start
//!
//! ```rust
//! use store_finder::controller::Controller;
//! use store_finder::query::PointOfInterest;
//! use store_finder::surface::recording::{RecordingPanel, RecordingSurface};
//! use store_finder::GeoPoint;
//!
//! let mut controller = Controller::new(RecordingSurface::new(), RecordingPanel::new());
//!
//! // Click the map, then hand the search result back
//! let ticket = controller.map_clicked(GeoPoint::new(21.0277644, 105.8341598)).unwrap();
//! let store = PointOfInterest {
//!     id: "node/1".to_string(),
//!     position: GeoPoint::new(21.03, 105.84),
//!     name: "Circle K".to_string(),
//!     address: String::new(),
//! };
//! controller.search_completed(&ticket, Ok(vec![store]));
//!
//! // Click the first result to request a route
//! let route = controller.result_clicked(0).unwrap();
//! assert_eq!(route.end, GeoPoint::new(21.03, 105.84));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod format;
pub mod geo;
pub mod query;
pub mod server;
pub mod surface;

// Re-export commonly used types
pub use config::Config;
pub use controller::Controller;
pub use error::{Error, Result};
pub use geo::GeoPoint;
