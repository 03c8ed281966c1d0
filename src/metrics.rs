use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub resources_created: Arc<AtomicU64>,
    pub resources_updated: Arc<AtomicU64>,
    pub resources_deleted: Arc<AtomicU64>,
    pub validation_failures: Arc<AtomicU64>,
    pub search_queries: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            resources_created: Arc::new(AtomicU64::new(0)),
            resources_updated: Arc::new(AtomicU64::new(0)),
            resources_deleted: Arc::new(AtomicU64::new(0)),
            validation_failures: Arc::new(AtomicU64::new(0)),
            search_queries: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_created(&self) {
        self.resources_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_updated(&self) {
        self.resources_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_deleted(&self) {
        self.resources_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_validation_failures(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_search_queries(&self) {
        self.search_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            resources_created: self.resources_created.load(Ordering::Relaxed),
            resources_updated: self.resources_updated.load(Ordering::Relaxed),
            resources_deleted: self.resources_deleted.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            search_queries: self.search_queries.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub resources_created: u64,
    pub resources_updated: u64,
    pub resources_deleted: u64,
    pub validation_failures: u64,
    pub search_queries: u64,
    pub uptime_seconds: u64,
}
