//! Controller metrics
//!
//! Visibility resolution counters, formatted on `/metrics` scrape.

use common::Visibility;
use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Controller metrics registry
    pub static ref CONTROLLER_METRICS_REGISTRY: Registry = Registry::new();

    /// Visibility resolution duration (placeholder listing + merge)
    static ref VISIBILITY_RESOLUTION_DURATION: HistogramVec = {
        let opts = HistogramOpts::new(
            "route_visibility_resolution_duration_seconds",
            "Route visibility resolution duration in seconds",
        );
        let histogram = HistogramVec::new(opts, &["route", "namespace"])
            .expect("Failed to create histogram");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(histogram.clone()))
            .expect("Failed to register histogram");
        histogram
    };

    /// Visibility resolutions total
    static ref VISIBILITY_RESOLUTIONS_TOTAL: IntCounterVec = {
        let opts = Opts::new(
            "route_visibility_resolutions_total",
            "Total number of route visibility resolutions",
        );
        let counter = IntCounterVec::new(opts, &["route", "namespace", "result"])
            .expect("Failed to create counter");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(counter.clone()))
            .expect("Failed to register counter");
        counter
    };

    /// Traffic targets resolved, by resulting visibility
    static ref RESOLVED_TRAFFIC_TARGETS_TOTAL: IntCounterVec = {
        let opts = Opts::new(
            "route_traffic_targets_resolved_total",
            "Total number of traffic targets assigned a visibility",
        );
        let counter = IntCounterVec::new(opts, &["visibility"])
            .expect("Failed to create counter");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(counter.clone()))
            .expect("Failed to register counter");
        counter
    };
}

/// Record one visibility resolution for a route
pub fn record_visibility_resolution(route: &str, namespace: &str, duration_secs: f64, result: &str) {
    VISIBILITY_RESOLUTION_DURATION
        .with_label_values(&[route, namespace])
        .observe(duration_secs);

    VISIBILITY_RESOLUTIONS_TOTAL
        .with_label_values(&[route, namespace, result])
        .inc();
}

/// Record the visibility assigned to a single traffic target
pub fn record_resolved_target(visibility: Visibility) {
    RESOLVED_TRAFFIC_TARGETS_TOTAL
        .with_label_values(&[visibility.as_str()])
        .inc();
}

/// Gather controller metrics
pub fn gather_controller_metrics() -> Result<String, String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = CONTROLLER_METRICS_REGISTRY.gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Failed to encode metrics: {}", e))?;

    String::from_utf8(buffer).map_err(|e| format!("Failed to convert to UTF-8: {}", e))
}
