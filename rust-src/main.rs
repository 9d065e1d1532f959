//! nftd - NFT marketplace analytics dashboard renderer.
//!
//! Decodes the mint and sales payloads a backend hands over and draws
//! them as a dashboard page, chart images or a terminal view.

mod cli;
mod commands;
mod config;
mod data;
mod logging;
mod models;
mod visualization;


fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
