//! Per-source request pacing.
//!
//! Conservative inter-request spacing keeps batch runs under upstream burst
//! limits. Each source type is throttled independently; the throttle must be
//! consulted immediately before every outbound attempt, retries included, so
//! backoff and pacing compose instead of racing.

use crate::SourceType;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Minimum delay applied when a source has no explicit override.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(600);

/// Enforces a minimum delay between consecutive requests to the same source.
///
/// The last-request timestamps are the only shared mutable state in the
/// pipeline; they live for one run and are owned explicitly rather than
/// sitting in module-level state. Each source has its own lock, so one
/// source waiting out its delay never blocks another.
pub struct Throttle {
    min_delays: HashMap<SourceType, Duration>,
    last_request: HashMap<SourceType, Mutex<Option<Instant>>>,
}

impl Throttle {
    /// Throttle with the production per-source delays.
    pub fn new() -> Self {
        let mut min_delays = HashMap::new();
        min_delays.insert(SourceType::Fred, Duration::from_millis(600));
        min_delays.insert(SourceType::Bls, Duration::from_millis(800));
        min_delays.insert(SourceType::Coingecko, Duration::from_millis(1600));
        min_delays.insert(SourceType::Oecd, Duration::from_millis(1200));
        min_delays.insert(SourceType::Ecb, Duration::from_millis(800));
        min_delays.insert(SourceType::Census, Duration::from_millis(800));
        min_delays.insert(SourceType::Imf, Duration::from_millis(1000));

        let last_request = SourceType::ALL
            .into_iter()
            .map(|source| (source, Mutex::new(None)))
            .collect();

        Self {
            min_delays,
            last_request,
        }
    }

    /// Override the delay for one source (tests use millisecond delays).
    pub fn with_min_delay(mut self, source_type: SourceType, delay: Duration) -> Self {
        self.min_delays.insert(source_type, delay);
        self
    }

    /// Minimum spacing for a source.
    pub fn min_delay(&self, source_type: SourceType) -> Duration {
        self.min_delays
            .get(&source_type)
            .copied()
            .unwrap_or(DEFAULT_MIN_DELAY)
    }

    /// Block until at least `min_delay(source_type)` has elapsed since the
    /// previous call for the same source, then record "now" as the last
    /// request time. Sources never delay each other.
    ///
    /// The per-source lock is held across the sleep so concurrent callers
    /// for the same source serialize correctly instead of both reading a
    /// stale timestamp; callers for other sources take different locks.
    pub async fn wait_turn(&self, source_type: SourceType) {
        // Seeded with every source type at construction.
        let Some(slot) = self.last_request.get(&source_type) else {
            return;
        };
        let mut last = slot.lock().await;

        if let Some(prev) = *last {
            let min_delay = self.min_delay(source_type);
            let elapsed = prev.elapsed();
            if elapsed < min_delay {
                sleep(min_delay - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}
