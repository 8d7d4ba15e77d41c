//! Prometheus metrics for the HTTP server.
//!
//! [`ServerMetrics`] owns a dedicated [`Registry`] that `GET /metrics`
//! encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};

pub struct ServerMetrics {
    pub registry: Registry,

    /// `POST /simulate` requests received.
    pub simulate_requests: IntCounter,
    /// Simulations that ended in an error, including transport faults.
    pub simulate_failures: IntCounter,
    /// `GET /api/proposals` requests received.
    pub proposal_requests: IntCounter,
    /// Wall time of each simulation round trip, in milliseconds.
    pub simulate_latency_ms: Histogram,
}

impl ServerMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let simulate_requests = register_int_counter_with_registry!(
            Opts::new(
                "ballot_simulate_requests_total",
                "Total simulate requests received"
            ),
            registry
        )?;

        let simulate_failures = register_int_counter_with_registry!(
            Opts::new(
                "ballot_simulate_failures_total",
                "Total simulate requests that failed"
            ),
            registry
        )?;

        let proposal_requests = register_int_counter_with_registry!(
            Opts::new(
                "ballot_proposal_requests_total",
                "Total proposal list requests received"
            ),
            registry
        )?;

        let simulate_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "ballot_simulate_latency_ms",
                "Simulation round-trip time in milliseconds"
            )
            .buckets(vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0]),
            registry
        )?;

        Ok(Self {
            registry,
            simulate_requests,
            simulate_failures,
            proposal_requests,
            simulate_latency_ms,
        })
    }

    /// Encode every registered metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
