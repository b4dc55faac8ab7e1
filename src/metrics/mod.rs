//! Per-client outcome and throughput counters.
//!
//! Each client owns one `WorkerCounters` set and is its only writer. The
//! interrupted-completion path sums all sets from another task while clients
//! may still be mutating them, so counters are relaxed atomics and any total
//! taken that way is an advisory snapshot, not a linearizable read. Within a
//! single client the attempt counter is bumped before the outcome is
//! classified into exactly one bucket, so at every observation point
//! `requests == success + network_failed + bad_failed`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};


#[derive(Debug)]
pub struct WorkerCounters {
    requests: AtomicU64,
    success: AtomicU64,
    network_failed: AtomicU64,
    bad_failed: AtomicU64,
    read_bytes: AtomicU64,
    write_bytes: AtomicU64,
}

impl WorkerCounters {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            success: AtomicU64::new(0),
            network_failed: AtomicU64::new(0),
            bad_failed: AtomicU64::new(0),
            read_bytes: AtomicU64::new(0),
            write_bytes: AtomicU64::new(0),
        }
    }

    pub fn record_attempt(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_failure(&self) {
        self.network_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bad_status(&self) {
        self.bad_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_read_bytes(&self, bytes: u64) {
        self.read_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn add_write_bytes(&self, bytes: u64) {
        self.write_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            network_failed: self.network_failed.load(Ordering::Relaxed),
            bad_failed: self.bad_failed.load(Ordering::Relaxed),
            read_bytes: self.read_bytes.load(Ordering::Relaxed),
            write_bytes: self.write_bytes.load(Ordering::Relaxed),
        }
    }
}

impl Default for WorkerCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountersSnapshot {
    pub requests: u64,
    pub success: u64,
    pub network_failed: u64,
    pub bad_failed: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

impl CountersSnapshot {
    fn accumulate(&mut self, other: &CountersSnapshot) {
        self.requests = self.requests.saturating_add(other.requests);
        self.success = self.success.saturating_add(other.success);
        self.network_failed = self.network_failed.saturating_add(other.network_failed);
        self.bad_failed = self.bad_failed.saturating_add(other.bad_failed);
        self.read_bytes = self.read_bytes.saturating_add(other.read_bytes);
        self.write_bytes = self.write_bytes.saturating_add(other.write_bytes);
    }
}

/// Best-effort sum over all clients' counters.
#[must_use]
pub fn aggregate(workers: &[Arc<WorkerCounters>]) -> CountersSnapshot {
    let mut totals = CountersSnapshot::default();
    for counters in workers {
        totals.accumulate(&counters.snapshot());
    }
    totals
}
