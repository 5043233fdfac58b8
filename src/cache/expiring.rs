//! Expiring key/value store with a background sweeper
//!
//! Provides a `Cache` that holds opaque byte payloads with their insertion time,
//! and a sweeper task that runs on a fixed interval and evicts stale entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Interval used when the cache is constructed with a zero interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// A single stored response
#[derive(Debug, Clone)]
struct CacheEntry {
    /// When the entry was inserted
    created_at: Instant,
    /// The raw payload, never interpreted by the cache
    value: Vec<u8>,
}

type Entries = Arc<Mutex<HashMap<String, CacheEntry>>>;

/// Thread-safe store of raw payloads keyed by request identifier
///
/// The cache owns a sweeper task spawned on the current tokio runtime. Every
/// `interval` the sweeper removes entries whose age exceeds `interval`, so the
/// same duration controls both how often eviction runs and how old an entry may
/// get. `get` never checks age: an entry inserted just after a sweep can be
/// returned for up to roughly twice the interval.
///
/// Dropping the cache closes its shutdown channel, which stops the sweeper.
/// Use [`Cache::shutdown`] to also wait for the task to exit.
#[derive(Debug)]
pub struct Cache {
    /// Sweep period and maximum entry age
    interval: Duration,
    /// Shared with the sweeper task
    entries: Entries,
    /// Closing or signalling this stops the sweeper
    shutdown_tx: mpsc::Sender<()>,
    /// Handle to the sweeper task
    sweeper: JoinHandle<()>,
}

impl Cache {
    /// Creates a new cache and starts its background sweeper
    ///
    /// A zero `interval` is replaced with [`DEFAULT_INTERVAL`].
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_INTERVAL
        } else {
            interval
        };

        let entries: Entries = Arc::new(Mutex::new(HashMap::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let sweeper = tokio::spawn(sweep_loop(Arc::clone(&entries), interval, shutdown_rx));

        Self {
            interval,
            entries,
            shutdown_tx,
            sweeper,
        }
    }

    /// Returns the effective sweep interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Inserts or overwrites the entry for `key`, stamping it with the current time
    pub fn add(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let entry = CacheEntry {
            created_at: Instant::now(),
            value: value.into(),
        };
        lock(&self.entries).insert(key.into(), entry);
    }

    /// Returns a copy of the payload stored under `key`
    ///
    /// Returns `None` if the key was never added or has been swept.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        lock(&self.entries)
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// Number of entries currently held, including ones awaiting the next sweep
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stops the sweeper and waits for it to finish
    pub async fn shutdown(self) {
        let Cache {
            shutdown_tx,
            sweeper,
            ..
        } = self;

        let _ = shutdown_tx.send(()).await;
        drop(shutdown_tx);

        if let Err(e) = sweeper.await {
            debug!(error = %e, "cache sweeper ended abnormally");
        }
    }
}

/// Acquires the store lock, recovering the map if a holder panicked
fn lock(entries: &Mutex<HashMap<String, CacheEntry>>) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes every entry whose `created_at + interval` is strictly before `now`
///
/// Holds the lock for the whole pass. Returns the number of evicted entries.
fn sweep(entries: &Mutex<HashMap<String, CacheEntry>>, interval: Duration, now: Instant) -> usize {
    let mut entries = lock(entries);
    let before = entries.len();
    entries.retain(|_, entry| entry.created_at + interval >= now);
    before - entries.len()
}

/// Runs sweeps every `interval` until the shutdown channel fires or closes
async fn sweep_loop(entries: Entries, interval: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first tick (immediate)
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let evicted = sweep(&entries, interval, Instant::now());
                if evicted > 0 {
                    debug!(evicted, "swept expired cache entries");
                }
            }
            _ = shutdown_rx.recv() => {
                debug!("cache sweeper stopped");
                break;
            }
        }
    }
}
