//! Metrics for the matching engine: counts of orders and trades, and
//! submit-call latency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// For production-grade percentile tracking, reach for the `metrics`
/// crate instead - this is deliberately coarse (count/avg/max only).
#[derive(Debug, Default)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    max: AtomicU64,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, value_us: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_us, Ordering::Relaxed);
        self.max.fetch_max(value_us, Ordering::Relaxed);
    }

    pub fn stats(&self) -> HistogramStats {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);
        HistogramStats {
            count,
            avg_us: if count > 0 { sum / count } else { 0 },
            max_us: self.max.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub avg_us: u64,
    pub max_us: u64,
}

#[derive(Debug, Default)]
pub struct EngineMetrics {
    pub orders_received: Counter,
    pub orders_rejected: Counter,
    pub trades_executed: Counter,
    pub submit_latency: Histogram,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_latency(&self, duration: Duration) {
        self.submit_latency.record(duration.as_micros() as u64);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency = self.submit_latency.stats();
        MetricsSnapshot {
            orders_received: self.orders_received.get(),
            orders_rejected: self.orders_rejected.get(),
            trades_executed: self.trades_executed.get(),
            submit_latency_avg_us: latency.avg_us,
            submit_latency_max_us: latency.max_us,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub orders_received: u64,
    pub orders_rejected: u64,
    pub trades_executed: u64,
    pub submit_latency_avg_us: u64,
    pub submit_latency_max_us: u64,
}
