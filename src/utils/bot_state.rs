//! Session statistics shared between the control loop and the shutdown path

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub ticks: u64,
    pub rounds: u64,
    pub casts: u64,
    pub clicks: u64,
    pub capture_failures: u64,
    pub injection_failures: u64,
}

#[derive(Debug)]
struct Counters {
    started: DateTime<Local>,
    ticks: AtomicU64,
    rounds: AtomicU64,
    casts: AtomicU64,
    clicks: AtomicU64,
    capture_failures: AtomicU64,
    injection_failures: AtomicU64,
}

/// Lock-free session counters. Cloning shares the same counters.
#[derive(Debug, Clone)]
pub struct SessionStats {
    inner: Arc<Counters>,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Counters {
                started: Local::now(),
                ticks: AtomicU64::new(0),
                rounds: AtomicU64::new(0),
                casts: AtomicU64::new(0),
                clicks: AtomicU64::new(0),
                capture_failures: AtomicU64::new(0),
                injection_failures: AtomicU64::new(0),
            }),
        }
    }

    pub fn record_tick(&self) {
        self.inner.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Minigame bar appeared
    pub fn record_round(&self) {
        self.inner.rounds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cast(&self) {
        self.inner.casts.fetch_add(1, Ordering::Relaxed);
    }

    /// Bite click
    pub fn record_click(&self) {
        self.inner.clicks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_capture_failure(&self) {
        self.inner.capture_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_injection_failure(&self) {
        self.inner.injection_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn started(&self) -> DateTime<Local> {
        self.inner.started
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let c = &self.inner;
        StatsSnapshot {
            ticks: c.ticks.load(Ordering::Relaxed),
            rounds: c.rounds.load(Ordering::Relaxed),
            casts: c.casts.load(Ordering::Relaxed),
            clicks: c.clicks.load(Ordering::Relaxed),
            capture_failures: c.capture_failures.load(Ordering::Relaxed),
            injection_failures: c.injection_failures.load(Ordering::Relaxed),
        }
    }

    /// Get stats as JSON string for the log
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "started": self.started().to_rfc3339(),
            "stats": self.snapshot(),
        })
        .to_string()
    }

    /// One-line human summary for the end of a session
    pub fn summary(&self) -> String {
        let s = self.snapshot();
        let minutes = (Local::now() - self.started()).num_minutes();
        format!(
            "Session: {} min, {} rounds, {} casts, {} bite clicks, {} capture errors, {} input errors",
            minutes, s.rounds, s.casts, s.clicks, s.capture_failures, s.injection_failures
        )
    }
}
