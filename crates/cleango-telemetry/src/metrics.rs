//! Prometheus-backed metrics for the dashboard controller.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Label values are plain strings so this crate stays ignorant of controller types.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Outcome label recorded for a successful poll or clean.
pub const OUTCOME_SUCCESS: &str = "success";
/// Outcome label recorded for a failed poll or clean.
pub const OUTCOME_FAILURE: &str = "failure";

/// Prometheus-backed metrics registry.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    polls_total: IntCounterVec,
    polls_skipped_total: IntCounterVec,
    clean_actions_total: IntCounterVec,
    service_connected: IntGauge,
}

impl Metrics {
    /// Construct a registry with the dashboard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let polls_total = IntCounterVec::new(
            Opts::new("dashboard_polls_total", "Completed poll firings by outcome"),
            &["task", "outcome"],
        )
        .map_err(collector_error("dashboard_polls_total"))?;
        let polls_skipped_total = IntCounterVec::new(
            Opts::new(
                "dashboard_polls_skipped_total",
                "Poll firings skipped because the previous firing was still in flight",
            ),
            &["task"],
        )
        .map_err(collector_error("dashboard_polls_skipped_total"))?;
        let clean_actions_total = IntCounterVec::new(
            Opts::new(
                "dashboard_clean_actions_total",
                "Operator-triggered clean passes by outcome",
            ),
            &["outcome"],
        )
        .map_err(collector_error("dashboard_clean_actions_total"))?;
        let service_connected = IntGauge::with_opts(Opts::new(
            "dashboard_service_connected",
            "1 when the cleanup service last reported a connected torrent client",
        ))
        .map_err(collector_error("dashboard_service_connected"))?;

        registry
            .register(Box::new(polls_total.clone()))
            .map_err(collector_error("dashboard_polls_total"))?;
        registry
            .register(Box::new(polls_skipped_total.clone()))
            .map_err(collector_error("dashboard_polls_skipped_total"))?;
        registry
            .register(Box::new(clean_actions_total.clone()))
            .map_err(collector_error("dashboard_clean_actions_total"))?;
        registry
            .register(Box::new(service_connected.clone()))
            .map_err(collector_error("dashboard_service_connected"))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                polls_total,
                polls_skipped_total,
                clean_actions_total,
                service_connected,
            }),
        })
    }

    /// Count a completed poll firing.
    pub fn record_poll(&self, task: &str, success: bool) {
        self.inner
            .polls_total
            .with_label_values(&[task, outcome_label(success)])
            .inc();
    }

    /// Count a poll firing coalesced into one still in flight.
    pub fn record_poll_skipped(&self, task: &str) {
        self.inner
            .polls_skipped_total
            .with_label_values(&[task])
            .inc();
    }

    /// Count a finished clean action.
    pub fn record_clean(&self, success: bool) {
        self.inner
            .clean_actions_total
            .with_label_values(&[outcome_label(success)])
            .inc();
    }

    /// Track the last known connection state.
    pub fn set_service_connected(&self, connected: bool) {
        self.inner.service_connected.set(i64::from(connected));
    }

    /// Completed poll firings for the task and outcome.
    #[must_use]
    pub fn poll_count(&self, task: &str, success: bool) -> u64 {
        self.inner
            .polls_total
            .with_label_values(&[task, outcome_label(success)])
            .get()
    }

    /// Skipped poll firings for the task.
    #[must_use]
    pub fn skipped_count(&self, task: &str) -> u64 {
        self.inner
            .polls_skipped_total
            .with_label_values(&[task])
            .get()
    }

    /// Finished clean actions with the given outcome.
    #[must_use]
    pub fn clean_count(&self, success: bool) -> u64 {
        self.inner
            .clean_actions_total
            .with_label_values(&[outcome_label(success)])
            .get()
    }

    /// Whether the service was connected at the last status poll.
    #[must_use]
    pub fn service_connected(&self) -> bool {
        self.inner.service_connected.get() == 1
    }

    /// Render the registry in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding fails or produces invalid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }
}

const fn outcome_label(success: bool) -> &'static str {
    if success {
        OUTCOME_SUCCESS
    } else {
        OUTCOME_FAILURE
    }
}

fn collector_error(name: &'static str) -> impl Fn(prometheus::Error) -> TelemetryError {
    move |source| TelemetryError::MetricsCollector { name, source }
}
