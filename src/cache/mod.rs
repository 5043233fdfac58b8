//! In-memory response cache with time-based expiry
//!
//! This module provides an expiring cache that stores raw API response bodies
//! keyed by request URL. A background sweeper owned by the cache periodically
//! evicts entries older than the configured interval. Entries are never expired
//! on read; only the sweeper removes them.

mod expiring;

pub use expiring::{Cache, DEFAULT_INTERVAL};
