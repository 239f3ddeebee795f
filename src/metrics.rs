//! Hook outcome counters
//!
//! Lock-free counters updated on every security-checked read. Cheap enough
//! for the hot path; snapshots are serialisable for the CLI and host status
//! pages.

use crate::access_control::Predicate;
use crate::hook::HookOutcome;
use crate::templates::CacheStats;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Security hook metrics collector
#[derive(Debug)]
pub struct GuardMetrics {
    start_time: Instant,
    total_reads: AtomicU64,
    structural: AtomicU64,
    not_applicable: AtomicU64,
    authorized: AtomicU64,
    hidden: AtomicU64,
    /// Indexed by predicate evaluation order
    denied_by: [AtomicU64; 3],
    lookup_failures: AtomicU64,
}

/// Denials per failing predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DenialCounts {
    pub scope: u64,
    pub department: u64,
    pub roles: u64,
}

/// Point-in-time metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_reads: u64,
    pub structural: u64,
    pub not_applicable: u64,
    pub authorized: u64,
    pub hidden: u64,
    pub denials: DenialCounts,
    /// Denials caused by unavailable principal data rather than a refusal
    pub lookup_failures: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

impl GuardMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_reads: AtomicU64::new(0),
            structural: AtomicU64::new(0),
            not_applicable: AtomicU64::new(0),
            authorized: AtomicU64::new(0),
            hidden: AtomicU64::new(0),
            denied_by: Default::default(),
            lookup_failures: AtomicU64::new(0),
        }
    }

    /// Record the outcome of one hook evaluation
    pub fn record(&self, outcome: &HookOutcome) {
        self.total_reads.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome {
            HookOutcome::Structural => &self.structural,
            HookOutcome::NotApplicable(_) => &self.not_applicable,
            HookOutcome::Authorized => &self.authorized,
            HookOutcome::Denied(reason) => {
                self.denied_by[predicate_index(reason.predicate)].fetch_add(1, Ordering::Relaxed);
                if matches!(
                    reason.cause,
                    crate::access_control::DenialCause::LookupFailed(_)
                ) {
                    self.lookup_failures.fetch_add(1, Ordering::Relaxed);
                }
                &self.hidden
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, cache: Option<CacheStats>) -> MetricsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_reads: load(&self.total_reads),
            structural: load(&self.structural),
            not_applicable: load(&self.not_applicable),
            authorized: load(&self.authorized),
            hidden: load(&self.hidden),
            denials: DenialCounts {
                scope: load(&self.denied_by[predicate_index(Predicate::Scope)]),
                department: load(&self.denied_by[predicate_index(Predicate::Department)]),
                roles: load(&self.denied_by[predicate_index(Predicate::Roles)]),
            },
            lookup_failures: load(&self.lookup_failures),
            cache,
        }
    }
}

impl Default for GuardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

const fn predicate_index(predicate: Predicate) -> usize {
    match predicate {
        Predicate::Scope => 0,
        Predicate::Department => 1,
        Predicate::Roles => 2,
    }
}
