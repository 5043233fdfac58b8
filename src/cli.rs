//! Command-line interface parsing for the Pokedex
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the validated settings the REPL starts with.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;

/// Default number of seconds a cached response is kept
pub const DEFAULT_CACHE_INTERVAL_SECS: u64 = 60;

/// Default number of locations shown per `map` page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// Page size must be positive
    #[error("Invalid page size: {0}. Page size must be at least 1")]
    InvalidPageSize(usize),

    /// Base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

/// Pokedex - explore the Pokemon world from your terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "An interactive Pokedex backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// Seconds a cached API response is kept before the sweeper evicts it
    ///
    /// A value of 0 falls back to the cache's 5 second default.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_CACHE_INTERVAL_SECS)]
    pub cache_interval: u64,

    /// Number of locations shown by each `map` / `mapb` command
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// PokeAPI base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// TTL and sweep period of the response cache
    pub cache_interval: Duration,
    /// Locations per map page
    pub page_size: usize,
    /// API base URL
    pub base_url: String,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            cache_interval: Duration::from_secs(DEFAULT_CACHE_INTERVAL_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            base_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the page size or base URL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.page_size == 0 {
            return Err(CliError::InvalidPageSize(cli.page_size));
        }

        if !(cli.base_url.starts_with("http://") || cli.base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            cache_interval: Duration::from_secs(cli.cache_interval),
            page_size: cli.page_size,
            base_url: cli.base_url.clone(),
            verbose: cli.verbose,
        })
    }
}
