//! Webhook outcome metrics
//!
//! Counts deliveries by outcome and exposes them in the Prometheus text format.
//!
//! # Metrics
//! - `branch_guard_webhook_deliveries_total{outcome}` (Counter)
//!
//! `outcome` is `protected`, `ignored` or the error code of a failed delivery.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;

/// Outcome label for deliveries that protected a branch.
pub const OUTCOME_PROTECTED: &str = "protected";

/// Outcome label for deliveries that were skipped.
pub const OUTCOME_IGNORED: &str = "ignored";

/// Prometheus metrics collector for webhook deliveries.
pub struct WebhookMetrics {
    registry: Registry,
    deliveries: IntCounterVec,
}

impl WebhookMetrics {
    /// Creates the collector with its own registry.
    ///
    /// # Errors
    /// Returns an error if the metrics cannot be registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let deliveries = IntCounterVec::new(
            Opts::new(
                "branch_guard_webhook_deliveries_total",
                "Webhook deliveries handled, by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(deliveries.clone()))?;

        Ok(Self {
            registry,
            deliveries,
        })
    }

    /// Counts one delivery with the given outcome.
    pub fn record(&self, outcome: &str) {
        self.deliveries.with_label_values(&[outcome]).inc();
    }

    /// Number of deliveries recorded with the given outcome.
    pub fn count(&self, outcome: &str) -> u64 {
        self.deliveries.with_label_values(&[outcome]).get()
    }

    /// Renders all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
