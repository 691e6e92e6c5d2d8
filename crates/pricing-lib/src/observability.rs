//! Observability infrastructure for the price predictor
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction/rejection counters, model status)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for end-to-end prediction latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PricingMetricsInner> = OnceLock::new();

struct PricingMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions: IntCounter,
    adjusted_predictions: IntCounter,
    validation_rejections: IntCounter,
    prediction_failures: IntCounterVec,
    model_loaded: IntGauge,
}

impl PricingMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "bike_price_prediction_latency_seconds",
                "Time spent validating, predicting and adjusting a single request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions: register_int_counter!(
                "bike_price_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            adjusted_predictions: register_int_counter!(
                "bike_price_adjusted_predictions_total",
                "Predictions that had heuristic adjustments applied"
            )
            .expect("Failed to register adjusted_predictions_total"),

            validation_rejections: register_int_counter!(
                "bike_price_validation_rejections_total",
                "Requests rejected because of invalid input"
            )
            .expect("Failed to register validation_rejections_total"),

            prediction_failures: register_int_counter_vec!(
                "bike_price_prediction_failures_total",
                "Predictions that failed after validation",
                &["kind"]
            )
            .expect("Failed to register prediction_failures_total"),

            model_loaded: register_int_gauge!(
                "bike_price_model_loaded",
                "1 if the regression model loaded at startup, 0 otherwise"
            )
            .expect("Failed to register model_loaded"),
        }
    }
}

/// Lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PricingMetrics {
    _private: (),
}

impl Default for PricingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PricingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PricingMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, adjusted: bool) {
        self.inner().predictions.inc();
        if adjusted {
            self.inner().adjusted_predictions.inc();
        }
    }

    pub fn inc_validation_rejections(&self) {
        self.inner().validation_rejections.inc();
    }

    pub fn inc_prediction_failures(&self, kind: &str) {
        self.inner()
            .prediction_failures
            .with_label_values(&[kind])
            .inc();
    }

    pub fn set_model_loaded(&self, loaded: bool) {
        self.inner().model_loaded.set(i64::from(loaded));
    }
}

/// Structured logger for predictor events
///
/// Every record carries an `event` field so logs can be filtered without
/// parsing messages.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, model_path: &str, model_loaded: bool) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            model_path = %model_path,
            model_loaded = model_loaded,
            "Price predictor started"
        );
    }

    pub fn log_model_loaded(&self, model_path: &str) {
        info!(
            event = "model_loaded",
            service = %self.service,
            model_path = %model_path,
            "Regression model loaded"
        );
    }

    /// Load failures are permanent; predictions stay disabled until restart
    pub fn log_model_load_failed(&self, model_path: &str, error: &str) {
        warn!(
            event = "model_load_failed",
            service = %self.service,
            model_path = %model_path,
            error = %error,
            "Regression model not loaded, predictions disabled"
        );
    }

    pub fn log_prediction(
        &self,
        year: i32,
        km_driven: f64,
        base_prediction: f64,
        adjusted_prediction: f64,
        total_multiplier: Option<f64>,
    ) {
        info!(
            event = "prediction_generated",
            service = %self.service,
            year = year,
            km_driven = km_driven,
            base_prediction = base_prediction,
            adjusted_prediction = adjusted_prediction,
            total_multiplier = ?total_multiplier,
            "Generated price prediction"
        );
    }

    pub fn log_rejection(&self, reason: &str) {
        info!(
            event = "prediction_rejected",
            service = %self.service,
            reason = %reason,
            "Rejected prediction request"
        );
    }

    pub fn log_failure(&self, kind: &str, error: &str) {
        error!(
            event = "prediction_failed",
            service = %self.service,
            kind = %kind,
            error = %error,
            "Prediction failed"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Price predictor shutting down"
        );
    }
}
