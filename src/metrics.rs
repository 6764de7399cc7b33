// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the endpoint composition pipeline.
//!
//! All metrics use the namespace prefix `endpoint_composer_`.
//!
//! # Metrics Categories
//!
//! - **Assembly Metrics** - Which optional stages a pipeline was built with
//! - **Pull Metrics** - Outcome and duration of end-to-end pulls
//! - **Endpoint Metrics** - Endpoints dropped or synthesized by each stage
//!
//! # Example
//!
//! ```rust,no_run
//! use endpoint_composer::metrics::{gather_metrics, record_pull_success};
//!
//! record_pull_success(std::time::Duration::from_millis(20));
//! println!("{}", gather_metrics().unwrap());
//! ```

use prometheus::{
    CounterVec, Encoder, GaugeVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all pipeline metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "endpoint_composer";

const REGISTER_FAILED: &str = "metric should register exactly once";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Assembly Metrics
// ============================================================================

/// Optional stages the pipeline was assembled with
///
/// Labels:
/// - `stage`: Stage name (`nat64`, `target_filter`)
pub static PIPELINE_STAGE_ENABLED: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_pipeline_stage_enabled"),
        "Optional pipeline stages enabled at assembly (1 = enabled)",
    );
    let gauge = GaugeVec::new(opts, &["stage"]).expect("valid stage gauge options");
    METRICS_REGISTRY
        .register(Box::new(gauge.clone()))
        .expect(REGISTER_FAILED);
    gauge
});

// ============================================================================
// Pull Metrics
// ============================================================================

/// Total number of end-to-end pulls by outcome
///
/// Labels:
/// - `status`: Outcome (`success`, `error`)
pub static PIPELINE_PULLS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_pipeline_pulls_total"),
        "Total number of pipeline pulls by status",
    );
    let counter = CounterVec::new(opts, &["status"]).expect("valid pull counter options");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect(REGISTER_FAILED);
    counter
});

/// Duration of end-to-end pulls in seconds
pub static PIPELINE_PULL_DURATION_SECONDS: LazyLock<Histogram> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_pipeline_pull_duration_seconds"),
        "Duration of pipeline pulls in seconds",
    )
    .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0]);
    let histogram = Histogram::with_opts(opts).expect("valid pull histogram options");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect(REGISTER_FAILED);
    histogram
});

// ============================================================================
// Endpoint Metrics
// ============================================================================

/// Total number of endpoints dropped by a stage
///
/// Labels:
/// - `stage`: Stage that dropped the endpoint (`dedup`, `target_filter`)
/// - `reason`: `invalid_record`, `unsupported_alias`, `duplicate`, `no_matching_targets`
pub static ENDPOINTS_DROPPED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_endpoints_dropped_total"),
        "Total number of endpoints dropped by stage and reason",
    );
    let counter =
        CounterVec::new(opts, &["stage", "reason"]).expect("valid dropped counter options");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect(REGISTER_FAILED);
    counter
});

/// Total number of endpoints synthesized by a stage
///
/// Labels:
/// - `stage`: Stage that created the endpoint (`multi_source`, `nat64`)
pub static ENDPOINTS_SYNTHESIZED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_endpoints_synthesized_total"),
        "Total number of endpoints synthesized by stage",
    );
    let counter =
        CounterVec::new(opts, &["stage"]).expect("valid synthesized counter options");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect(REGISTER_FAILED);
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Mark an optional stage as part of the assembled pipeline
pub fn record_stage_enabled(stage: &str) {
    PIPELINE_STAGE_ENABLED.with_label_values(&[stage]).set(1.0);
}

/// Record a successful pull
///
/// # Arguments
/// * `duration` - Time taken by the whole chain
pub fn record_pull_success(duration: Duration) {
    PIPELINE_PULLS_TOTAL.with_label_values(&["success"]).inc();
    PIPELINE_PULL_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record a failed pull
pub fn record_pull_error(duration: Duration) {
    PIPELINE_PULLS_TOTAL.with_label_values(&["error"]).inc();
    PIPELINE_PULL_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// Record an endpoint dropped by a stage
///
/// # Arguments
/// * `stage` - Stage name, one of the `STAGE_*` constants
/// * `reason` - Drop reason, one of the `DROP_REASON_*` constants
pub fn record_endpoint_dropped(stage: &str, reason: &str) {
    ENDPOINTS_DROPPED_TOTAL
        .with_label_values(&[stage, reason])
        .inc();
}

/// Record endpoints synthesized by a stage
#[allow(clippy::cast_precision_loss)]
pub fn record_endpoints_synthesized(stage: &str, count: usize) {
    if count == 0 {
        return;
    }
    ENDPOINTS_SYNTHESIZED_TOTAL
        .with_label_values(&[stage])
        .inc_by(count as f64);
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_pull_success() {
        let before = PIPELINE_PULLS_TOTAL.with_label_values(&["success"]).get();
        let samples = PIPELINE_PULL_DURATION_SECONDS.get_sample_count();

        record_pull_success(Duration::from_millis(5));

        assert!(PIPELINE_PULLS_TOTAL.with_label_values(&["success"]).get() > before);
        assert!(PIPELINE_PULL_DURATION_SECONDS.get_sample_count() > samples);
    }

    #[test]
    fn test_record_endpoint_dropped() {
        record_endpoint_dropped("metrics_test_stage", "duplicate");

        let counter = ENDPOINTS_DROPPED_TOTAL.with_label_values(&["metrics_test_stage", "duplicate"]);
        assert!(counter.get() >= 1.0);
    }

    #[test]
    fn test_record_endpoints_synthesized_ignores_zero() {
        record_endpoints_synthesized("metrics_test_zero", 0);
        record_endpoints_synthesized("metrics_test_three", 3);

        let zero = ENDPOINTS_SYNTHESIZED_TOTAL.with_label_values(&["metrics_test_zero"]);
        assert!(zero.get().abs() < f64::EPSILON);
        let three = ENDPOINTS_SYNTHESIZED_TOTAL.with_label_values(&["metrics_test_three"]);
        assert!((three.get() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gather_metrics() {
        record_stage_enabled("metrics_test_gather");

        let result = gather_metrics();
        assert!(result.is_ok(), "Gathering metrics should succeed");

        let metrics_text = result.unwrap();
        assert!(
            metrics_text.contains("endpoint_composer_pipeline_stage_enabled"),
            "Metrics should contain the stage gauge"
        );
    }
}
