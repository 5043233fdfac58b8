//! Pokedex CLI - explore the Pokemon world from your terminal
//!
//! An interactive prompt that browses PokeAPI locations, explores areas and
//! catches pokemon. API responses are kept in an expiring in-memory cache.

use std::io;
use std::process;

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use pokedex::api::PokeApiClient;
use pokedex::cache::Cache;
use pokedex::cli::{Cli, StartupConfig};
use pokedex::commands::Session;
use pokedex::{logging, repl};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    logging::init(config.verbose)?;

    let cache = Cache::new(config.cache_interval);
    info!(
        base_url = %config.base_url,
        cache_interval = ?cache.interval(),
        page_size = config.page_size,
        "starting pokedex"
    );

    let client = PokeApiClient::new(config.base_url, cache);
    let mut session = Session::new(client, config.page_size);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    repl::run(&mut session, stdin, &mut stdout).await?;

    // Stop the cache sweeper before the runtime shuts down
    session.shutdown().await;

    Ok(())
}
