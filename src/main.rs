//! store-finder CLI entry point
//!
//! Convenience store finder - CLI + backend server

use store_finder::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
